//! GPU isoline generator
//!
//! Owns every GPU resource for one grid resolution: the cell-center
//! buffer, the compute pipeline, the atomic segment counter with its
//! staging buffer, and the params uniform. An update binds the field and
//! the caller's output buffer, runs one invocation per cell and blocks
//! until the segment count has been read back.

use std::path::Path;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use isoline_core::{GeneratorState, GridGeometry, IsolineError, Point2};

use crate::field_texture::check_dimensions;
use crate::types::{dispatch_size, AtomicCounter, IsolineParams};
use crate::{FieldTexture, GpuContext, GpuError};

/// Built-in classify + emit program
pub const ISOLINE_SHADER: &str = include_str!("shaders/isolines.wgsl");

/// Resources released by `destroy`
struct GpuResources {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    /// Cell centers in dispatch order, uploaded once
    center_buffer: wgpu::Buffer,
    /// Segments written by the current pass
    counter_buffer: wgpu::Buffer,
    /// Staging buffer for reading the counter back to the CPU
    counter_staging_buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,
}

impl GpuResources {
    fn release(self) {
        self.center_buffer.destroy();
        self.counter_buffer.destroy();
        self.counter_staging_buffer.destroy();
        self.params_buffer.destroy();
    }
}

/// Marching-squares generator running as a wgpu compute pass
pub struct IsolineGenerator {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    grid: GridGeometry,
    resources: Option<GpuResources>,
    /// Segments written by the last pass
    primitives_written: u32,
    state: GeneratorState,
}

impl IsolineGenerator {
    /// Create a generator for an `nx` x `ny` grid with the built-in program
    pub fn new(context: &GpuContext, nx: u32, ny: u32) -> Result<Self, GpuError> {
        Self::with_shader_source(context, nx, ny, ISOLINE_SHADER)
    }

    /// Create a generator with program text read from `path`
    pub fn from_shader_file<P: AsRef<Path>>(
        context: &GpuContext,
        nx: u32,
        ny: u32,
        path: P,
    ) -> Result<Self, GpuError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded isoline program from {}", path.as_ref().display());
        Self::with_shader_source(context, nx, ny, &source)
    }

    /// Create a generator from WGSL program text
    ///
    /// The program must expose a `main` compute entry point with the
    /// bindings of the built-in shader.
    pub fn with_shader_source(
        context: &GpuContext,
        nx: u32,
        ny: u32,
        source: &str,
    ) -> Result<Self, GpuError> {
        if nx < 2 || ny < 2 {
            return Err(IsolineError::InvalidGrid { nx, ny }.into());
        }

        check_dimensions(&context.device().limits(), nx, ny)?;

        let device = context.device_handle();
        let queue = context.queue_handle();
        let grid = GridGeometry::new(nx, ny);

        let output_bytes = (grid.max_points() * std::mem::size_of::<Point2>()) as u64;
        if !context.fits_storage_buffer(output_bytes) {
            return Err(GpuError::InvalidOutput(format!(
                "{}x{} grid needs a {} byte output buffer, over device limits",
                nx, ny, output_bytes
            )));
        }

        let (pipeline, bind_group_layout) = Self::create_pipeline(&device, source)?;

        let centers = grid.cell_centers();
        let center_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Isoline Cell Center Buffer"),
            contents: bytemuck::cast_slice(&centers),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let counter_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Isoline Counter Buffer"),
            size: std::mem::size_of::<AtomicCounter>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let counter_staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Isoline Counter Staging Buffer"),
            size: std::mem::size_of::<AtomicCounter>() as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Isoline Params Buffer"),
            size: std::mem::size_of::<IsolineParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "GPU isoline generator: {}x{} grid, {} cells, {} point capacity",
            nx,
            ny,
            grid.cell_count(),
            grid.max_points()
        );

        Ok(Self {
            device,
            queue,
            grid,
            resources: Some(GpuResources {
                pipeline,
                bind_group_layout,
                center_buffer,
                counter_buffer,
                counter_staging_buffer,
                params_buffer,
            }),
            primitives_written: 0,
            state: GeneratorState::Ready,
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        source: &str,
    ) -> Result<(wgpu::ComputePipeline, wgpu::BindGroupLayout), GpuError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Isoline Bind Group Layout"),
            entries: &[
                // Cell centers (read-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Scalar field - R32Float is not filterable
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Output points (read-write storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Atomic segment counter
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Params uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Isoline Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Isoline Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Isoline Compute Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::PipelineCreation(err.to_string()));
        }

        Ok((pipeline, bind_group_layout))
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

    /// Bytes an output buffer needs for the worst case
    #[inline]
    pub fn output_size(&self) -> u64 {
        (self.grid.max_points() * std::mem::size_of::<Point2>()) as u64
    }

    /// Create an output buffer sized for the worst case
    ///
    /// Usable as a vertex buffer for drawing the captured line list.
    pub fn create_output_buffer(&self) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Isoline Output Buffer"),
            size: self.output_size(),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        })
    }

    /// Extract the `iso` contour of `field` into `output`
    ///
    /// Blocks until the pass completes and returns the number of points
    /// written (always even). Only the first `count` points of `output`
    /// are meaningful.
    pub fn update(
        &mut self,
        field: &FieldTexture,
        output: &wgpu::Buffer,
        iso: f32,
    ) -> Result<u32, GpuError> {
        let Some(resources) = self.resources.as_ref() else {
            return Err(IsolineError::Destroyed.into());
        };

        let expected = (self.grid.nx(), self.grid.ny());
        if field.dimensions() != expected {
            return Err(IsolineError::FieldMismatch {
                expected,
                actual: field.dimensions(),
            }
            .into());
        }
        if output.size() < self.output_size() {
            return Err(IsolineError::OutputTooSmall {
                required: self.grid.max_points(),
                actual: (output.size() / std::mem::size_of::<Point2>() as u64) as usize,
            }
            .into());
        }
        if !output.usage().contains(wgpu::BufferUsages::STORAGE) {
            return Err(GpuError::InvalidOutput("missing STORAGE usage".to_string()));
        }

        self.primitives_written = 0;
        self.state = GeneratorState::Updating;

        let cell_count = self.grid.cell_count() as u32;
        let params = IsolineParams {
            cell_size: self.grid.cell_size(),
            iso_threshold: iso,
            cell_count,
            grid_size: [self.grid.nx(), self.grid.ny()],
            _padding: [0; 2],
        };
        self.queue.write_buffer(&resources.params_buffer, 0, bytemuck::bytes_of(&params));

        // Reset the counter before the pass
        let zero = AtomicCounter { count: 0 };
        self.queue.write_buffer(&resources.counter_buffer, 0, bytemuck::bytes_of(&zero));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Isoline Bind Group"),
            layout: &resources.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: resources.center_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(field.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: output.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: resources.counter_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: resources.params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Isoline Encoder"),
        });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Isoline Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&resources.pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);

            let (groups_x, groups_y) = dispatch_size(cell_count);
            compute_pass.dispatch_workgroups(groups_x, groups_y, 1);
        }

        encoder.copy_buffer_to_buffer(
            &resources.counter_buffer,
            0,
            &resources.counter_staging_buffer,
            0,
            std::mem::size_of::<AtomicCounter>() as u64,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let segments = read_u32(&self.device, &resources.counter_staging_buffer);
        self.state = GeneratorState::Ready;
        let segments = segments?;
        self.primitives_written = segments;

        log::debug!("iso {}: {} segments", iso, segments);
        Ok(segments * 2)
    }

    /// Copy the first `count` points of `output` back to the CPU
    ///
    /// `output` needs `COPY_SRC` usage, as created by
    /// [`create_output_buffer`](Self::create_output_buffer).
    pub fn read_points(&self, output: &wgpu::Buffer, count: u32) -> Result<Vec<Point2>, GpuError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if !output.usage().contains(wgpu::BufferUsages::COPY_SRC) {
            return Err(GpuError::InvalidOutput("missing COPY_SRC usage".to_string()));
        }

        let size = u64::from(count) * std::mem::size_of::<Point2>() as u64;
        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Isoline Points Readback Buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Isoline Points Copy Encoder"),
        });
        encoder.copy_buffer_to_buffer(output, 0, &staging_buffer, 0, size);
        self.queue.submit(std::iter::once(encoder.finish()));

        map_read(&self.device, &staging_buffer)?;
        let data = staging_buffer.slice(..).get_mapped_range();
        let points = bytemuck::cast_slice::<u8, Point2>(&data).to_vec();
        drop(data);
        staging_buffer.unmap();
        staging_buffer.destroy();

        Ok(points)
    }

    /// Release all GPU resources; safe to call more than once
    pub fn destroy(&mut self) {
        if let Some(resources) = self.resources.take() {
            resources.release();
            log::trace!("GPU isoline generator destroyed");
        }
        self.state = GeneratorState::Destroyed;
    }
}

impl Drop for IsolineGenerator {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Map a `MAP_READ` buffer and block until it is ready
fn map_read(device: &wgpu::Device, buffer: &wgpu::Buffer) -> Result<(), GpuError> {
    let slice = buffer.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        sender.send(result).ok();
    });

    let _ = device.poll(wgpu::Maintain::Wait);

    receiver
        .recv()
        .map_err(|e| GpuError::BufferMapping(format!("Channel error: {}", e)))?
        .map_err(|e| GpuError::BufferMapping(format!("Map error: {:?}", e)))
}

/// Read a single u32 from a staging buffer
fn read_u32(device: &wgpu::Device, staging: &wgpu::Buffer) -> Result<u32, GpuError> {
    map_read(device, staging)?;
    let data = staging.slice(..).get_mapped_range();
    let value = bytemuck::cast_slice::<u8, u32>(&data)[0];
    drop(data);
    staging.unmap();
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shader_declares_interface() {
        assert!(ISOLINE_SHADER.contains("fn main"));
        assert!(ISOLINE_SHADER.contains("iso_threshold"));
        assert!(ISOLINE_SHADER.contains("cell_size"));
        assert!(ISOLINE_SHADER.contains("atomicAdd"));
    }

    #[test]
    fn test_shader_segment_table_matches_core() {
        // The WGSL table rows must match the CPU lookup table
        for (code, row) in isoline_core::lookup_tables::SEGMENT_TABLE.iter().enumerate() {
            let wgsl_row = format!("vec4<i32>({}, {}, {}, {})", row[0], row[1], row[2], row[3]);
            let table = ISOLINE_SHADER
                .split("SEGMENT_TABLE: array<vec4<i32>, 16> = array<vec4<i32>, 16>(")
                .nth(1)
                .unwrap();
            let line = table.lines().filter(|l| l.contains("vec4<i32>(")).nth(code).unwrap();
            assert!(line.contains(&wgsl_row), "row {} mismatch: {}", code, line);
        }
    }
}
