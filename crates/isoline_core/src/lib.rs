//! Marching-squares isoline extraction
//!
//! This crate provides the backend-independent pieces of the isoline
//! pipeline and a CPU generator built on them.
//!
//! ## Core Types
//!
//! - [`GridGeometry`] - Cell size and cell-center dispatch order for a grid
//! - [`ScalarField`] - Row-major 2D samples
//! - [`CaseCode`] - 4-bit corner classification of a cell
//! - [`Point2`] - Output point in normalized field space
//!
//! ## Pipeline
//!
//! - [`classify`] / [`resolve_topology`] - Case code and saddle resolution
//! - [`march_cell`] - Per-cell kernel emitting 0, 1 or 2 segments
//! - [`parallel_emit`] - Parallel variable-output capture with an exact count
//! - [`CpuIsolineGenerator`] - Generator lifecycle on a rayon pool

mod types;
mod error;
mod field;
pub mod grid;
pub mod lookup_tables;
pub mod classify;
pub mod emit;
pub mod capture;
pub mod generator;

pub use types::Point2;
pub use error::IsolineError;
pub use field::ScalarField;
pub use grid::{GridGeometry, MAX_POINTS_PER_CELL};
pub use classify::{classify, center_is_inside, interpolate_edge, resolve_topology, CaseCode};
pub use emit::{cell_corners, emit_segments, march_cell, CellEmission, Emission};
pub use capture::{parallel_emit, CaptureError, PointBuffer};
pub use generator::{CpuIsolineGenerator, GeneratorState};
