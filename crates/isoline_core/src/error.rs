//! Isoline error types

use std::fmt;

use crate::capture::CaptureError;

/// Error type for generator construction and updates
#[derive(Debug, Clone, PartialEq)]
pub enum IsolineError {
    /// Grid smaller than 2x2 samples
    InvalidGrid { nx: u32, ny: u32 },
    /// Sample vector length does not match the requested dimensions
    SampleCount { expected: usize, actual: usize },
    /// Field dimensions differ from the generator's grid
    FieldMismatch { expected: (u32, u32), actual: (u32, u32) },
    /// Output destination cannot hold the worst-case point count
    OutputTooSmall { required: usize, actual: usize },
    /// The generator was destroyed
    Destroyed,
    /// The parallel capture failed
    Capture(CaptureError),
    /// Worker pool could not be created
    ThreadPool(String),
}

impl fmt::Display for IsolineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsolineError::InvalidGrid { nx, ny } => {
                write!(f, "Invalid grid {}x{}: at least 2x2 samples required", nx, ny)
            }
            IsolineError::SampleCount { expected, actual } => {
                write!(f, "Expected {} field samples, got {}", expected, actual)
            }
            IsolineError::FieldMismatch { expected, actual } => write!(
                f,
                "Field is {}x{}, generator grid is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            IsolineError::OutputTooSmall { required, actual } => write!(
                f,
                "Output holds {} points, {} required",
                actual, required
            ),
            IsolineError::Destroyed => write!(f, "Generator has been destroyed"),
            IsolineError::Capture(err) => write!(f, "{}", err),
            IsolineError::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for IsolineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IsolineError::Capture(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CaptureError> for IsolineError {
    fn from(err: CaptureError) -> Self {
        IsolineError::Capture(err)
    }
}
