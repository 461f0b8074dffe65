//! Grid geometry
//!
//! Derives the cell size and the fixed set of cell-center sample points
//! for an `nx` x `ny` sample grid. The row-major order of the centers is
//! the dispatch-index-to-cell mapping used everywhere else.

use crate::Point2;

/// Points a single cell can emit (two segments)
pub const MAX_POINTS_PER_CELL: usize = 4;

/// Immutable grid description for a generator's lifetime
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    nx: u32,
    ny: u32,
    cell_size: [f32; 2],
}

impl GridGeometry {
    /// Create the geometry for an `nx` x `ny` sample grid
    ///
    /// Grids smaller than 2x2 have no cells; `cell_count` saturates at zero.
    pub fn new(nx: u32, ny: u32) -> Self {
        Self {
            nx,
            ny,
            cell_size: [1.0 / nx.max(1) as f32, 1.0 / ny.max(1) as f32],
        }
    }

    /// Sample count along x
    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Sample count along y
    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Cell size in normalized field space, `(1/nx, 1/ny)`
    #[inline]
    pub fn cell_size(&self) -> [f32; 2] {
        self.cell_size
    }

    /// Cells along x
    #[inline]
    pub fn cells_x(&self) -> u32 {
        self.nx.saturating_sub(1)
    }

    /// Cells along y
    #[inline]
    pub fn cells_y(&self) -> u32 {
        self.ny.saturating_sub(1)
    }

    /// Number of cells, `(nx - 1) * (ny - 1)`
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells_x() as usize * self.cells_y() as usize
    }

    /// Worst-case output size in points (every cell emits two segments)
    #[inline]
    pub fn max_points(&self) -> usize {
        self.cell_count() * MAX_POINTS_PER_CELL
    }

    /// Grid coordinates of the cell at a dispatch index
    #[inline]
    pub fn cell_coords(&self, index: usize) -> (u32, u32) {
        let cells_x = self.cells_x().max(1) as usize;
        ((index % cells_x) as u32, (index / cells_x) as u32)
    }

    /// Normalized center of the cell at grid coordinates `(x, y)`
    #[inline]
    pub fn cell_center(&self, x: u32, y: u32) -> Point2 {
        Point2::new(
            (x as f32 + 0.5) * self.cell_size[0],
            (y as f32 + 0.5) * self.cell_size[1],
        )
    }

    /// All cell centers in row-major dispatch order
    pub fn cell_centers(&self) -> Vec<Point2> {
        (0..self.cell_count())
            .map(|index| {
                let (x, y) = self.cell_coords(index);
                self.cell_center(x, y)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cell_count() {
        assert_eq!(GridGeometry::new(3, 3).cell_count(), 4);
        assert_eq!(GridGeometry::new(5, 3).cell_count(), 8);
        assert_eq!(GridGeometry::new(2, 2).cell_count(), 1);
    }

    #[test]
    fn test_degenerate_grid_has_no_cells() {
        assert_eq!(GridGeometry::new(1, 10).cell_count(), 0);
        assert_eq!(GridGeometry::new(0, 0).cell_count(), 0);
        assert!(GridGeometry::new(1, 1).cell_centers().is_empty());
    }

    #[test]
    fn test_cell_size() {
        let grid = GridGeometry::new(4, 8);
        assert_relative_eq!(grid.cell_size()[0], 0.25);
        assert_relative_eq!(grid.cell_size()[1], 0.125);
    }

    #[test]
    fn test_centers_row_major() {
        let grid = GridGeometry::new(3, 3);
        let centers = grid.cell_centers();
        assert_eq!(centers.len(), 4);

        let step = 1.0 / 3.0;
        let expected = [
            (0.5 * step, 0.5 * step),
            (1.5 * step, 0.5 * step),
            (0.5 * step, 1.5 * step),
            (1.5 * step, 1.5 * step),
        ];
        for (c, (ex, ey)) in centers.iter().zip(expected) {
            assert_relative_eq!(c.x, ex);
            assert_relative_eq!(c.y, ey);
        }
    }

    #[test]
    fn test_cell_coords_match_centers() {
        let grid = GridGeometry::new(6, 4);
        for (i, center) in grid.cell_centers().iter().enumerate() {
            let (x, y) = grid.cell_coords(i);
            assert_eq!(*center, grid.cell_center(x, y));
        }
    }

    #[test]
    fn test_centers_deterministic() {
        let a = GridGeometry::new(17, 9).cell_centers();
        let b = GridGeometry::new(17, 9).cell_centers();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_points() {
        assert_eq!(GridGeometry::new(3, 3).max_points(), 16);
    }
}
