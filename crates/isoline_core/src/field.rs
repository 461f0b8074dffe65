//! Scalar field container
//!
//! A row-major 2D array of samples. The generators only read from it;
//! whoever produces the field owns its lifecycle.

use crate::{IsolineError, Point2};

/// A 2D scalar field sampled on a regular grid
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    nx: u32,
    ny: u32,
    values: Vec<f32>,
}

impl ScalarField {
    /// Wrap row-major samples (`values[y * nx + x]`)
    pub fn new(nx: u32, ny: u32, values: Vec<f32>) -> Result<Self, IsolineError> {
        let expected = nx as usize * ny as usize;
        if values.len() != expected {
            return Err(IsolineError::SampleCount {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { nx, ny, values })
    }

    /// Build a field by evaluating `f(x, y)` at every grid sample
    pub fn from_fn<F>(nx: u32, ny: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> f32,
    {
        let mut values = Vec::with_capacity(nx as usize * ny as usize);
        for y in 0..ny {
            for x in 0..nx {
                values.push(f(x, y));
            }
        }
        Self { nx, ny, values }
    }

    /// A field with the same value everywhere
    pub fn constant(nx: u32, ny: u32, value: f32) -> Self {
        Self {
            nx,
            ny,
            values: vec![value; nx as usize * ny as usize],
        }
    }

    /// Dimensions `(nx, ny)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.nx, self.ny)
    }

    /// Raw row-major samples
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Mutable access for in-place field updates between generator calls
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Sample at grid coordinate `(x, y)`
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.nx as usize + x as usize]
    }

    /// Sample at a normalized coordinate
    ///
    /// Sample `(x, y)` sits at `(x / nx, y / ny)`; the nearest sample is
    /// returned, clamped to the grid.
    #[inline]
    pub fn sample(&self, p: Point2) -> f32 {
        let x = (p.x * self.nx as f32).round().clamp(0.0, self.nx.saturating_sub(1) as f32) as u32;
        let y = (p.y * self.ny as f32).round().clamp(0.0, self.ny.saturating_sub(1) as f32) as u32;
        self.value(x, y)
    }

    /// Smallest and largest finite sample, if any
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(ScalarField::new(3, 3, vec![0.0; 9]).is_ok());
        let err = ScalarField::new(3, 3, vec![0.0; 8]).unwrap_err();
        assert!(matches!(err, IsolineError::SampleCount { expected: 9, actual: 8 }));
    }

    #[test]
    fn test_from_fn_row_major() {
        let field = ScalarField::from_fn(3, 2, |x, y| (y * 10 + x) as f32);
        assert_eq!(field.values(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(field.value(2, 1), 12.0);
    }

    #[test]
    fn test_sample_normalized() {
        let field = ScalarField::from_fn(4, 4, |x, y| (y * 4 + x) as f32);
        assert_eq!(field.sample(Point2::new(0.0, 0.0)), 0.0);
        assert_eq!(field.sample(Point2::new(0.25, 0.0)), 1.0);
        assert_eq!(field.sample(Point2::new(0.5, 0.75)), 14.0);
    }

    #[test]
    fn test_sample_clamps() {
        let field = ScalarField::from_fn(2, 2, |x, y| (y * 2 + x) as f32);
        assert_eq!(field.sample(Point2::new(5.0, 5.0)), 3.0);
        assert_eq!(field.sample(Point2::new(-1.0, -1.0)), 0.0);
    }

    #[test]
    fn test_min_max_skips_nan() {
        let field = ScalarField::new(2, 2, vec![1.0, f32::NAN, -2.0, 4.0]).unwrap();
        assert_eq!(field.min_max(), Some((-2.0, 4.0)));
        let empty = ScalarField::new(1, 1, vec![f32::NAN]).unwrap();
        assert_eq!(empty.min_max(), None);
    }
}
