//! Segment emission
//!
//! The per-cell kernel: recover the four corners from a cell center,
//! classify, interpolate the crossed edges and write 0, 1 or 2 segments.

use crate::classify::{classify, interpolate_edge, resolve_topology};
use crate::grid::MAX_POINTS_PER_CELL;
use crate::lookup_tables::{CORNER_OFFSETS, EDGE_CORNERS};
use crate::{Point2, ScalarField};

/// Fixed-capacity output of one parallel work item
#[derive(Clone, Copy, Debug)]
pub struct Emission<T, const N: usize> {
    items: [T; N],
    len: usize,
}

impl<T: Copy + Default, const N: usize> Emission<T, N> {
    /// An emission with nothing written
    #[inline]
    pub fn empty() -> Self {
        Self {
            items: [T::default(); N],
            len: 0,
        }
    }

    /// Append an item
    ///
    /// # Panics
    /// Panics if the emission is already full.
    #[inline]
    pub fn push(&mut self, item: T) {
        assert!(self.len < N, "emission capacity {} exceeded", N);
        self.items[self.len] = item;
        self.len += 1;
    }

    /// Items written so far
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Copy + Default, const N: usize> Default for Emission<T, N> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Points emitted by a single cell
pub type CellEmission = Emission<Point2, MAX_POINTS_PER_CELL>;

/// Corner positions of the cell around `center`, in `[c0, c1, c2, c3]` order
#[inline]
pub fn cell_corners(center: Point2, cell_size: [f32; 2]) -> [Point2; 4] {
    let half = [0.5 * cell_size[0], 0.5 * cell_size[1]];
    CORNER_OFFSETS.map(|o| Point2::new(center.x + o[0] * half[0], center.y + o[1] * half[1]))
}

/// Emit the segments of one cell from its corner positions and values
pub fn emit_segments(positions: [Point2; 4], values: [f32; 4], iso: f32) -> CellEmission {
    let mut out = CellEmission::empty();

    let code = classify(values, iso);
    if code.is_uniform() {
        return out;
    }

    for &edge in resolve_topology(code, values, iso).iter().take_while(|&&e| e >= 0) {
        let [a, b] = EDGE_CORNERS[edge as usize];
        let t = interpolate_edge(values[a], values[b], iso);
        out.push(positions[a].lerp(positions[b], t));
    }

    out
}

/// Run the full per-cell kernel for the cell centered at `center`
///
/// Cells with a non-finite corner sample emit nothing.
pub fn march_cell(field: &ScalarField, center: Point2, cell_size: [f32; 2], iso: f32) -> CellEmission {
    let positions = cell_corners(center, cell_size);
    let values = positions.map(|p| field.sample(p));

    if values.iter().any(|v| !v.is_finite()) {
        return CellEmission::empty();
    }

    emit_segments(positions, values, iso)
}
