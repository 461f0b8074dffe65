//! Cell classification
//!
//! Turns four corner samples and an iso threshold into a case code and
//! resolves the two saddle cases with the bilinear center value.
//! A corner is inside when `value >= iso`.
//!
//! Case codes follow the case diagram numbering (top-left is 8, bottom-left
//! is 1), not `1 << corner_index`.

use bitflags::bitflags;

use crate::lookup_tables::{is_saddle, CORNER_BITS, SEGMENT_TABLE};

bitflags! {
    /// Marching-squares case code
    ///
    /// One bit per cell corner that lies on the inside of the contour.
    /// `bits()` is the 0..=15 index into the segment table.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CaseCode: u8 {
        const TOP_LEFT = 1 << 3;
        const TOP_RIGHT = 1 << 2;
        const BOTTOM_RIGHT = 1 << 1;
        const BOTTOM_LEFT = 1 << 0;
    }
}

impl CaseCode {
    /// Index into the segment table
    #[inline]
    pub fn index(self) -> usize {
        self.bits() as usize
    }

    /// No corner or every corner inside: the contour misses the cell
    #[inline]
    pub fn is_uniform(self) -> bool {
        self.is_empty() || self.is_all()
    }

    /// Diagonal corners disagree in an X pattern (cases 5 and 10)
    #[inline]
    pub fn is_saddle(self) -> bool {
        is_saddle(self.index())
    }
}

/// Classify a cell from its corners `[c0, c1, c2, c3]`
#[inline]
pub fn classify(corners: [f32; 4], iso: f32) -> CaseCode {
    let mut bits = 0u8;
    for (value, bit) in corners.iter().zip(CORNER_BITS) {
        if *value >= iso {
            bits |= bit;
        }
    }
    CaseCode::from_bits_truncate(bits)
}

/// Whether the bilinear value at the cell center is inside
///
/// At the center every corner weighs 1/4, so this is the corner mean.
#[inline]
pub fn center_is_inside(corners: [f32; 4], iso: f32) -> bool {
    let center = 0.25 * (corners[0] + corners[1] + corners[2] + corners[3]);
    center >= iso
}

/// Edge pairs to connect for a classified cell
///
/// Non-saddle cases map straight to their table row. A saddle whose
/// center is inside joins its inside corners through the middle, which
/// is the complementary case's row.
#[inline]
pub fn resolve_topology(code: CaseCode, corners: [f32; 4], iso: f32) -> &'static [i8; 4] {
    if code.is_saddle() && center_is_inside(corners, iso) {
        &SEGMENT_TABLE[15 - code.index()]
    } else {
        &SEGMENT_TABLE[code.index()]
    }
}

/// Crossing parameter along an edge from `v0` to `v1`
///
/// Clamped to `[0, 1]`. A zero delta or a non-finite result yields the
/// edge midpoint.
#[inline]
pub fn interpolate_edge(v0: f32, v1: f32, iso: f32) -> f32 {
    let delta = v1 - v0;
    if delta == 0.0 {
        return 0.5;
    }
    let t = (iso - v0) / delta;
    if t.is_finite() {
        t.clamp(0.0, 1.0)
    } else {
        0.5
    }
}
