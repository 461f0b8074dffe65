//! Generator backend selection
//!
//! `auto` tries the GPU and falls back to the CPU generator with a warning;
//! `gpu` makes any GPU failure fatal; `cpu` never touches wgpu.

use std::fmt;

use isoline_core::{CpuIsolineGenerator, IsolineError, Point2, PointBuffer, ScalarField};
use isoline_gpu::{FieldTexture, GpuContext, GpuError, IsolineGenerator};

use crate::config::{BackendConfig, BackendKind};

/// GPU generator with the context and buffers it runs against
pub struct GpuBackend {
    generator: IsolineGenerator,
    texture: FieldTexture,
    output: wgpu::Buffer,
    context: GpuContext,
}

impl GpuBackend {
    /// Create a context and generator for an `nx` x `ny` grid
    pub fn new(config: &BackendConfig, nx: u32, ny: u32) -> Result<Self, GpuError> {
        let context = pollster::block_on(GpuContext::with_power_preference(
            config.power_preference.into(),
        ))?;
        let generator = match &config.shader_path {
            Some(path) => IsolineGenerator::from_shader_file(&context, nx, ny, path)?,
            None => IsolineGenerator::new(&context, nx, ny)?,
        };
        let texture = FieldTexture::new(context.device(), nx, ny)?;
        let output = generator.create_output_buffer();

        Ok(Self {
            generator,
            texture,
            output,
            context,
        })
    }

    /// Upload `field`, extract the `iso` contour and read the points back
    pub fn contour(&mut self, field: &ScalarField, iso: f32) -> Result<Vec<Point2>, GpuError> {
        self.texture.upload(self.context.queue(), field)?;
        let count = self.generator.update(&self.texture, &self.output, iso)?;
        self.generator.read_points(&self.output, count)
    }

    #[inline]
    pub fn context(&self) -> &GpuContext {
        &self.context
    }
}

/// CPU generator with its reusable output buffer
pub struct CpuBackend {
    generator: CpuIsolineGenerator,
    output: PointBuffer,
}

impl CpuBackend {
    pub fn new(config: &BackendConfig, nx: u32, ny: u32) -> Result<Self, IsolineError> {
        let generator = CpuIsolineGenerator::with_threads(nx, ny, config.threads)?;
        let output = PointBuffer::with_capacity(generator.grid().max_points());
        Ok(Self { generator, output })
    }

    pub fn contour(&mut self, field: &ScalarField, iso: f32) -> Result<Vec<Point2>, IsolineError> {
        let count = self.generator.update(field, &mut self.output, iso)?;
        Ok(self.output.valid(count).to_vec())
    }
}

/// Isoline generator on either backend
pub enum Backend {
    /// Boxed to keep the enum small
    Gpu(Box<GpuBackend>),
    Cpu(CpuBackend),
}

impl Backend {
    /// Build the backend `config.kind` asks for
    pub fn from_config(config: &BackendConfig, nx: u32, ny: u32) -> Result<Self, BackendError> {
        match config.kind {
            BackendKind::Cpu => Ok(Self::Cpu(CpuBackend::new(config, nx, ny)?)),
            BackendKind::Gpu => Ok(Self::Gpu(Box::new(GpuBackend::new(config, nx, ny)?))),
            BackendKind::Auto => match GpuBackend::new(config, nx, ny) {
                Ok(gpu) => {
                    log::info!(
                        "Using GPU isoline generator on {}",
                        gpu.context().adapter_info().name
                    );
                    Ok(Self::Gpu(Box::new(gpu)))
                }
                // Grid errors are the caller's fault, not the GPU's
                Err(GpuError::Isoline(e)) => Err(e.into()),
                Err(e) => {
                    log::warn!("GPU isoline generator unavailable, falling back to CPU: {}", e);
                    Ok(Self::Cpu(CpuBackend::new(config, nx, ny)?))
                }
            },
        }
    }

    /// Extract the `iso` contour of `field` as a flat line list
    pub fn contour(&mut self, field: &ScalarField, iso: f32) -> Result<Vec<Point2>, BackendError> {
        match self {
            Self::Gpu(backend) => Ok(backend.contour(field, iso)?),
            Self::Cpu(backend) => Ok(backend.contour(field, iso)?),
        }
    }

    /// Check if using GPU backend
    #[must_use]
    pub fn is_gpu(&self) -> bool {
        matches!(self, Self::Gpu(_))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gpu(_) => "gpu",
            Self::Cpu(_) => "cpu",
        }
    }
}

/// Error from either backend
#[derive(Debug)]
pub enum BackendError {
    Gpu(GpuError),
    Isoline(IsolineError),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Gpu(err) => write!(f, "GPU backend: {}", err),
            BackendError::Isoline(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Gpu(err) => Some(err),
            BackendError::Isoline(err) => Some(err),
        }
    }
}

impl From<GpuError> for BackendError {
    fn from(err: GpuError) -> Self {
        BackendError::Gpu(err)
    }
}

impl From<IsolineError> for BackendError {
    fn from(err: IsolineError) -> Self {
        BackendError::Isoline(err)
    }
}
