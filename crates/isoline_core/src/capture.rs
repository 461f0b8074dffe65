//! Feedback capture for variable-output parallel passes
//!
//! [`parallel_emit`] runs one work item per index on the current rayon
//! pool. Each item produces a small fixed-capacity [`Emission`]; an
//! exclusive prefix scan over the per-item counts hands every item its own
//! disjoint region of the output, which is then filled in parallel. The
//! returned total is exact regardless of scheduling.

use rayon::prelude::*;

use crate::emit::Emission;
use crate::Point2;

/// Capture error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The pass produced more items than the destination can hold
    Overflow { required: usize, capacity: usize },
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Overflow { required, capacity } => write!(
                f,
                "Capture overflow: {} items emitted, capacity {}",
                required, capacity
            ),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Parallel map with variable output and an exact count
///
/// Calls `emit(i)` for every `i in 0..n`, writes all emitted items into the
/// front of `out` and returns how many were written. Items of one index
/// stay contiguous and in emission order. On overflow nothing is written.
pub fn parallel_emit<T, F, const N: usize>(
    n: usize,
    out: &mut [T],
    emit: F,
) -> Result<usize, CaptureError>
where
    T: Copy + Default + Send + Sync,
    F: Fn(usize) -> Emission<T, N> + Send + Sync,
{
    let emissions: Vec<Emission<T, N>> = (0..n).into_par_iter().map(&emit).collect();

    let total: usize = emissions.par_iter().map(Emission::len).sum();
    if total > out.len() {
        return Err(CaptureError::Overflow {
            required: total,
            capacity: out.len(),
        });
    }

    // Exclusive scan: carve the written prefix into one region per item
    let mut regions: Vec<&mut [T]> = Vec::with_capacity(n);
    let mut rest = &mut out[..total];
    for emission in &emissions {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(emission.len());
        regions.push(head);
        rest = tail;
    }

    regions
        .into_par_iter()
        .zip(emissions.par_iter())
        .for_each(|(region, emission)| region.copy_from_slice(emission.as_slice()));

    Ok(total)
}

/// Growable destination for captured points
///
/// Only the prefix reported by the last update is meaningful; the tail
/// keeps whatever earlier passes left there.
#[derive(Clone, Debug, Default)]
pub struct PointBuffer {
    points: Vec<Point2>,
}

impl PointBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer already sized for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: vec![Point2::ZERO; capacity],
        }
    }

    /// Grow to hold at least `capacity` points; never shrinks
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.points.len() < capacity {
            self.points.resize(capacity, Point2::ZERO);
        }
    }

    /// Points the buffer can hold
    #[inline]
    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Whole backing storage, including stale data
    #[inline]
    pub fn as_slice(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Point2] {
        &mut self.points
    }

    /// The first `count` points, as returned by an update
    #[inline]
    pub fn valid(&self, count: u32) -> &[Point2] {
        &self.points[..(count as usize).min(self.points.len())]
    }

    /// The first `count` points paired up as segments
    pub fn segments(&self, count: u32) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.valid(count).chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}
