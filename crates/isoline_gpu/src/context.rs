//! GPU context management
//!
//! Adapter, device and queue for headless compute work. Generators hold
//! shared handles to the device and queue; nothing here is global.

use std::sync::Arc;

use crate::GpuError;

/// Headless wgpu device and queue
pub struct GpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Create a context on the highest-performance adapter
    pub async fn new() -> Result<Self, GpuError> {
        Self::with_power_preference(wgpu::PowerPreference::HighPerformance).await
    }

    /// Create a context with a specific power preference
    pub async fn with_power_preference(
        power_preference: wgpu::PowerPreference,
    ) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        log::info!(
            "GPU adapter selected: {} ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Isoline Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| GpuError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Shared device handle
    #[inline]
    pub fn device_handle(&self) -> Arc<wgpu::Device> {
        Arc::clone(&self.device)
    }

    /// Shared queue handle
    #[inline]
    pub fn queue_handle(&self) -> Arc<wgpu::Queue> {
        Arc::clone(&self.queue)
    }

    /// Adapter information
    #[inline]
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Largest width or height of a 2D texture
    #[inline]
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Whether a storage buffer of `bytes` fits the device limits
    pub fn fits_storage_buffer(&self, bytes: u64) -> bool {
        let limits = self.device.limits();
        bytes <= limits.max_buffer_size && bytes <= u64::from(limits.max_storage_buffer_binding_size)
    }
}

/// Blocking wrapper for creating a GPU context
///
/// Suitable for non-async callers such as the CLI and tests.
pub fn create_gpu_context_blocking() -> Result<GpuContext, GpuError> {
    pollster::block_on(GpuContext::new())
}
