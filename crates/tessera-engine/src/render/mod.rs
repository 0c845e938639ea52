//! GPU rendering subsystem.
//!
//! The shape render buffer keeps one vertex/index buffer pair per shape and
//! draws them through a [`backend::RenderDevice`]. wgpu is the production
//! backend.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

pub mod backend;
mod common;
mod ctx;
pub mod shape_buffer;
pub mod vertex_gen;
pub mod wgpu_backend;

pub use backend::{
    Backend, BufferUsage, DrawPass, IndexWidth, PipelineDesc, RenderDevice, VertexLayout,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use shape_buffer::{
    EntryFailure, EntryInfo, EntryState, FrameStats, RenderBufferError, ShapeBufferConfig,
    ShapeRenderBuffer,
};
pub use vertex_gen::{
    GenerateCtx, IdentityVertices, PositionVertex, TexCoordVertices, TexturedVertex,
    VertexGenerator, VertexUpload,
};
pub use wgpu_backend::{ShapePipeline, Wgpu};
