//! CPU isoline generator
//!
//! Owns a dedicated rayon pool and the per-cell center buffer for one grid
//! resolution. Each update fans out one work item per cell and captures
//! the emitted points with an exact count.

use crate::capture::{parallel_emit, PointBuffer};
use crate::emit::march_cell;
use crate::{GridGeometry, IsolineError, Point2, ScalarField};

/// Lifecycle state of a generator
///
/// There is no uninitialized state: construction either yields a `Ready`
/// generator or an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorState {
    /// Resources allocated, no pass in flight
    Ready,
    /// A pass is running
    Updating,
    /// Resources released; further updates fail
    Destroyed,
}

/// Marching-squares generator running on a CPU thread pool
pub struct CpuIsolineGenerator {
    grid: GridGeometry,
    /// Cell centers in dispatch order, uploaded once
    cell_centers: Option<Vec<Point2>>,
    pool: Option<rayon::ThreadPool>,
    /// Segments written by the last pass
    primitives_written: u32,
    state: GeneratorState,
}

impl CpuIsolineGenerator {
    /// Create a generator for an `nx` x `ny` grid using all available cores
    pub fn new(nx: u32, ny: u32) -> Result<Self, IsolineError> {
        Self::with_threads(nx, ny, 0)
    }

    /// Create a generator with a fixed worker count (0 picks the core count)
    pub fn with_threads(nx: u32, ny: u32, threads: usize) -> Result<Self, IsolineError> {
        if nx < 2 || ny < 2 {
            return Err(IsolineError::InvalidGrid { nx, ny });
        }

        let grid = GridGeometry::new(nx, ny);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("isoline-worker-{}", i))
            .build()
            .map_err(|e| IsolineError::ThreadPool(e.to_string()))?;

        log::info!(
            "CPU isoline generator: {}x{} grid, {} cells, {} workers",
            nx,
            ny,
            grid.cell_count(),
            pool.current_num_threads()
        );

        Ok(Self {
            grid,
            cell_centers: Some(grid.cell_centers()),
            pool: Some(pool),
            primitives_written: 0,
            state: GeneratorState::Ready,
        })
    }

    /// Grid this generator was built for
    #[inline]
    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    #[inline]
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Segments written by the most recent update
    #[inline]
    pub fn primitives_written(&self) -> u32 {
        self.primitives_written
    }

    /// Extract the `iso` contour of `field` into `output`
    ///
    /// Grows `output` to the worst-case size if needed and returns the
    /// number of points written (always even). Only `output.valid(count)`
    /// is meaningful afterwards.
    pub fn update(
        &mut self,
        field: &ScalarField,
        output: &mut PointBuffer,
        iso: f32,
    ) -> Result<u32, IsolineError> {
        let expected = (self.grid.nx(), self.grid.ny());
        if field.dimensions() != expected {
            return Err(IsolineError::FieldMismatch {
                expected,
                actual: field.dimensions(),
            });
        }

        let (Some(pool), Some(centers)) = (self.pool.as_ref(), self.cell_centers.as_ref()) else {
            return Err(IsolineError::Destroyed);
        };

        output.ensure_capacity(self.grid.max_points());
        self.primitives_written = 0;
        self.state = GeneratorState::Updating;

        let cell_size = self.grid.cell_size();
        let result = pool.install(|| {
            parallel_emit(centers.len(), output.as_mut_slice(), |i| {
                march_cell(field, centers[i], cell_size, iso)
            })
        });

        self.state = GeneratorState::Ready;
        let points = result?;
        self.primitives_written = (points / 2) as u32;

        log::debug!("iso {}: {} segments", iso, self.primitives_written);
        Ok(points as u32)
    }

    /// Release the pool and center buffer; safe to call more than once
    pub fn destroy(&mut self) {
        if self.state == GeneratorState::Destroyed {
            return;
        }
        self.pool = None;
        self.cell_centers = None;
        self.state = GeneratorState::Destroyed;
        log::trace!("CPU isoline generator destroyed");
    }
}

impl Drop for CpuIsolineGenerator {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak_field() -> ScalarField {
        ScalarField::from_fn(3, 3, |x, y| if x == 1 && y == 1 { 1.0 } else { 0.0 })
    }

    #[test]
    fn test_rejects_small_grid() {
        assert!(matches!(
            CpuIsolineGenerator::new(1, 4),
            Err(IsolineError::InvalidGrid { nx: 1, ny: 4 })
        ));
    }

    #[test]
    fn test_peak_diamond() {
        let mut generator = CpuIsolineGenerator::with_threads(3, 3, 2).unwrap();
        let mut output = PointBuffer::new();
        let count = generator.update(&peak_field(), &mut output, 0.5).unwrap();
        assert_eq!(count, 8);
        assert_eq!(generator.primitives_written(), 4);
        assert_eq!(output.capacity(), 16);
    }

    #[test]
    fn test_field_mismatch() {
        let mut generator = CpuIsolineGenerator::new(4, 4).unwrap();
        let mut output = PointBuffer::new();
        let err = generator.update(&peak_field(), &mut output, 0.5).unwrap_err();
        assert_eq!(
            err,
            IsolineError::FieldMismatch { expected: (4, 4), actual: (3, 3) }
        );
        assert_eq!(generator.state(), GeneratorState::Ready);
    }

    #[test]
    fn test_destroy_idempotent() {
        let mut generator = CpuIsolineGenerator::new(3, 3).unwrap();
        assert_eq!(generator.state(), GeneratorState::Ready);
        generator.destroy();
        generator.destroy();
        assert_eq!(generator.state(), GeneratorState::Destroyed);

        let mut output = PointBuffer::new();
        let err = generator.update(&peak_field(), &mut output, 0.5).unwrap_err();
        assert_eq!(err, IsolineError::Destroyed);
    }

    #[test]
    fn test_state_returns_to_ready() {
        let mut generator = CpuIsolineGenerator::new(3, 3).unwrap();
        let mut output = PointBuffer::new();
        generator.update(&peak_field(), &mut output, 0.5).unwrap();
        assert_eq!(generator.state(), GeneratorState::Ready);
    }
}
