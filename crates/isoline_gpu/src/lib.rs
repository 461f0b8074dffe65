//! wgpu compute backend for isoline extraction
//!
//! Runs the marching-squares kernel from `isoline_core` as a single
//! compute pass. Points are captured into a caller-owned storage buffer
//! through an atomic segment counter, and the counter is read back so the
//! caller knows exactly how many points are valid.
//!
//! ## Usage
//!
//! ```ignore
//! let ctx = create_gpu_context_blocking()?;
//! let mut generator = IsolineGenerator::new(&ctx, 256, 256)?;
//! let field = FieldTexture::from_field(ctx.device(), ctx.queue(), &samples)?;
//! let output = generator.create_output_buffer();
//! let count = generator.update(&field, &output, 0.5)?;
//! ```

mod context;
mod error;
mod field_texture;
mod generator;
pub mod types;

pub use context::{create_gpu_context_blocking, GpuContext};
pub use error::GpuError;
pub use field_texture::FieldTexture;
pub use generator::{IsolineGenerator, ISOLINE_SHADER};
pub use types::{dispatch_size, AtomicCounter, IsolineParams, WORKGROUP_SIZE};
