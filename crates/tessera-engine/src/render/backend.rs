//! Device abstraction used by the shape render buffer.
//!
//! The render buffer only needs a handful of device operations: buffer
//! create/write/release, a pipeline, a uniform write and an indexed draw. The
//! wgpu implementation lives in `wgpu_backend`; tests drive the buffer through
//! a recording backend instead of a GPU.

use tessera_shapes::TriangulationMode;

use crate::paint::Paint;

/// Associated resource types of a rendering backend.
pub trait Backend: 'static {
    type Buffer: Send;
    type Pipeline: Send;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// Width of the integers stored in index buffers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    #[default]
    U16,
    U32,
}

impl IndexWidth {
    #[inline]
    pub const fn bytes(self) -> u64 {
        match self {
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }
}

/// Per-vertex attributes produced by a vertex generator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// `pos: [f32; 2]`
    Position,
    /// `pos: [f32; 2], uv: [f32; 2]`
    PositionUv,
}

impl VertexLayout {
    #[inline]
    pub const fn stride(self) -> u64 {
        match self {
            VertexLayout::Position => 8,
            VertexLayout::PositionUv => 16,
        }
    }
}

/// Everything a backend needs to build the shared shape pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDesc {
    pub label: String,
    pub layout: VertexLayout,
    pub mode: TriangulationMode,
    pub index_width: IndexWidth,
}

/// Device-side operations. Implementations must tolerate any call order the
/// render buffer makes inside one pass.
pub trait RenderDevice<B: Backend> {
    /// A lost device fails the whole pass before any resource is touched.
    fn is_lost(&self) -> bool;

    /// Creates an uninitialized buffer of `size` bytes that accepts writes.
    fn create_buffer(&self, usage: BufferUsage, size: u64, label: &str) -> B::Buffer;

    /// Writes `data` at offset 0. `data.len()` is a multiple of 4.
    fn write_buffer(&self, buffer: &B::Buffer, data: &[u8]);

    fn release_buffer(&self, buffer: B::Buffer);

    fn create_pipeline(&self, desc: &PipelineDesc) -> B::Pipeline;

    /// True when `pipeline` can still render with `desc` on this device.
    fn pipeline_compatible(&self, pipeline: &B::Pipeline, desc: &PipelineDesc) -> bool;

    /// Uploads the per-pass uniforms (viewport and paint) of `pipeline`.
    fn write_uniforms(&self, pipeline: &B::Pipeline, paint: &Paint);
}

/// Command recording for one render pass.
pub trait DrawPass<B: Backend> {
    fn set_pipeline(&mut self, pipeline: &B::Pipeline);

    /// Draws `count` indices of `indices` against `vertices`.
    fn draw_indexed(
        &mut self,
        vertices: &B::Buffer,
        indices: &B::Buffer,
        width: IndexWidth,
        count: u32,
    );
}
