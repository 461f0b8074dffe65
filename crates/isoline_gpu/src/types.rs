//! GPU-compatible data types for the isoline compute pass
//!
//! These types match the layouts declared in `isolines.wgsl`.

use bytemuck::{Pod, Zeroable};

/// Per-update parameters for the isoline compute shader
/// Layout: 32 bytes (uniform structs round up to 16-byte multiples)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct IsolineParams {
    /// Cell size in normalized field space
    pub cell_size: [f32; 2],
    /// Iso threshold; samples `>=` this value are inside
    pub iso_threshold: f32,
    /// Number of cells to process
    pub cell_count: u32,
    /// Field dimensions in samples
    pub grid_size: [u32; 2],
    /// Padding for 16-byte alignment
    pub _padding: [u32; 2],
}

/// Atomic counter for segments written by the compute pass
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AtomicCounter {
    pub count: u32,
}

/// Invocations per workgroup (must match `@workgroup_size` in the shader)
pub const WORKGROUP_SIZE: u32 = 64;

/// Default `max_compute_workgroups_per_dimension`
pub const MAX_WORKGROUPS_PER_DIMENSION: u32 = 65_535;

/// Workgroup grid covering `cell_count` invocations
///
/// Large grids spill into the y dimension; the shader flattens the
/// invocation id back into a cell index.
pub fn dispatch_size(cell_count: u32) -> (u32, u32) {
    let groups = cell_count.div_ceil(WORKGROUP_SIZE);
    if groups <= MAX_WORKGROUPS_PER_DIMENSION {
        (groups, 1)
    } else {
        (MAX_WORKGROUPS_PER_DIMENSION, groups.div_ceil(MAX_WORKGROUPS_PER_DIMENSION))
    }
}
