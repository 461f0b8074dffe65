//! Scalar field as a GPU texture
//!
//! `R32Float` is not filterable, so the shader reads samples with
//! `textureLoad` at integer grid coordinates.

use isoline_core::{IsolineError, ScalarField};

use crate::GpuError;

/// Reject dimensions the device cannot hold in one 2D texture
pub(crate) fn check_dimensions(limits: &wgpu::Limits, nx: u32, ny: u32) -> Result<(), GpuError> {
    if nx == 0 || ny == 0 {
        return Err(IsolineError::InvalidGrid { nx, ny }.into());
    }
    let max = limits.max_texture_dimension_2d;
    if nx > max || ny > max {
        return Err(GpuError::TextureTooLarge { nx, ny, max });
    }
    Ok(())
}

/// A single-channel float texture holding one field sample per texel
pub struct FieldTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    nx: u32,
    ny: u32,
}

impl FieldTexture {
    /// Allocate an `nx` x `ny` field texture
    pub fn new(device: &wgpu::Device, nx: u32, ny: u32) -> Result<Self, GpuError> {
        check_dimensions(&device.limits(), nx, ny)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scalar Field Texture"),
            size: wgpu::Extent3d {
                width: nx,
                height: ny,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self { texture, view, nx, ny })
    }

    /// Allocate a texture sized for `field` and upload it
    pub fn from_field(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        field: &ScalarField,
    ) -> Result<Self, GpuError> {
        let (nx, ny) = field.dimensions();
        let texture = Self::new(device, nx, ny)?;
        texture.write(queue, field);
        Ok(texture)
    }

    /// Re-upload samples; dimensions must match
    pub fn upload(&self, queue: &wgpu::Queue, field: &ScalarField) -> Result<(), IsolineError> {
        if field.dimensions() != self.dimensions() {
            return Err(IsolineError::FieldMismatch {
                expected: self.dimensions(),
                actual: field.dimensions(),
            });
        }
        self.write(queue, field);
        Ok(())
    }

    fn write(&self, queue: &wgpu::Queue, field: &ScalarField) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(field.values()),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.nx * std::mem::size_of::<f32>() as u32),
                rows_per_image: Some(self.ny),
            },
            wgpu::Extent3d {
                width: self.nx,
                height: self.ny,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Dimensions `(nx, ny)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.nx, self.ny)
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimensions() {
        let limits = wgpu::Limits::default();
        let max = limits.max_texture_dimension_2d;
        assert!(check_dimensions(&limits, 2, 2).is_ok());
        assert!(check_dimensions(&limits, max, max).is_ok());
        assert!(matches!(
            check_dimensions(&limits, max + 1, 2),
            Err(GpuError::TextureTooLarge { ny: 2, .. })
        ));
        assert!(matches!(
            check_dimensions(&limits, 2, max + 1),
            Err(GpuError::TextureTooLarge { nx: 2, .. })
        ));
        assert!(matches!(
            check_dimensions(&limits, 0, 4),
            Err(GpuError::Isoline(IsolineError::InvalidGrid { nx: 0, ny: 4 }))
        ));
    }
}
