//! 2D point type shared by the CPU and GPU paths

use bytemuck::{Pod, Zeroable};

/// A point in normalized field space
///
/// Layout matches a WGSL `vec2<f32>` so captured output can be cast
/// straight out of a GPU buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new Point2
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// True if both components are finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_point2_size() {
        // Two floats, no padding: matches vec2<f32> array stride
        assert_eq!(size_of::<Point2>(), 8);
        assert_eq!(std::mem::align_of::<Point2>(), 4);
    }

    #[test]
    fn test_lerp() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 4.0);
        assert_eq!(a.lerp(b, 0.5), Point2::new(1.0, 2.0));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_is_finite() {
        assert!(Point2::new(0.25, 0.75).is_finite());
        assert!(!Point2::new(f32::NAN, 0.0).is_finite());
        assert!(!Point2::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_cast_slice() {
        let points = [Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)];
        let floats: &[f32] = bytemuck::cast_slice(&points);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
