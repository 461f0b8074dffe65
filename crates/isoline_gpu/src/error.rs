//! GPU backend error types

use std::fmt;
use std::io;

use isoline_core::IsolineError;

/// Error type for GPU context setup, generator construction and updates
#[derive(Debug)]
pub enum GpuError {
    /// Grid, field or output error shared with the CPU path
    Isoline(IsolineError),
    /// No compatible adapter found
    NoAdapter,
    /// Device request failed
    DeviceCreation(String),
    /// Program text could not be read
    ShaderLoad(io::Error),
    /// Shader module or compute pipeline failed validation
    PipelineCreation(String),
    /// Output buffer lacks a usage the pass needs
    InvalidOutput(String),
    /// Readback mapping failed
    BufferMapping(String),
    /// Grid wider or taller than the device's 2D texture limit
    TextureTooLarge { nx: u32, ny: u32, max: u32 },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::Isoline(err) => write!(f, "{}", err),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter"),
            GpuError::DeviceCreation(msg) => write!(f, "GPU device creation failed: {}", msg),
            GpuError::ShaderLoad(err) => write!(f, "Shader load error: {}", err),
            GpuError::PipelineCreation(msg) => write!(f, "Pipeline creation failed: {}", msg),
            GpuError::InvalidOutput(msg) => write!(f, "Invalid output buffer: {}", msg),
            GpuError::BufferMapping(msg) => write!(f, "Buffer mapping failed: {}", msg),
            GpuError::TextureTooLarge { nx, ny, max } => write!(
                f,
                "Field {}x{} exceeds the device texture limit of {}",
                nx, ny, max
            ),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::Isoline(err) => Some(err),
            GpuError::ShaderLoad(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IsolineError> for GpuError {
    fn from(err: IsolineError) -> Self {
        GpuError::Isoline(err)
    }
}

impl From<io::Error> for GpuError {
    fn from(err: io::Error) -> Self {
        GpuError::ShaderLoad(err)
    }
}
