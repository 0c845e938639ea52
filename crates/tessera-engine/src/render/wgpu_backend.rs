//! wgpu implementation of the render backend.

use tessera_shapes::TriangulationMode;

use crate::paint::Paint;
use crate::render::{RenderCtx, RenderTarget};

use super::backend::{
    Backend, BufferUsage, DrawPass, IndexWidth, PipelineDesc, RenderDevice, VertexLayout,
};
use super::common::{ShapeUniform, premul_alpha_blend};
use super::shape_buffer::{FrameStats, RenderBufferError, ShapeRenderBuffer};
use super::vertex_gen::VertexGenerator;

/// Marker type selecting wgpu resources.
pub enum Wgpu {}

impl Backend for Wgpu {
    type Buffer = wgpu::Buffer;
    type Pipeline = ShapePipeline;
}

/// Shape pipeline plus the uniform buffer and bind group it renders with.
pub struct ShapePipeline {
    format: wgpu::TextureFormat,
    desc: PipelineDesc,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform: wgpu::Buffer,
}

impl ShapePipeline {
    #[inline]
    pub fn desc(&self) -> &PipelineDesc {
        &self.desc
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

// ── vertex layouts ────────────────────────────────────────────────────────

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const POSITION_UV_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

fn vertex_buffer_layout(layout: VertexLayout) -> wgpu::VertexBufferLayout<'static> {
    let attributes: &'static [wgpu::VertexAttribute] = match layout {
        VertexLayout::Position => &POSITION_ATTRS,
        VertexLayout::PositionUv => &POSITION_UV_ATTRS,
    };
    wgpu::VertexBufferLayout {
        array_stride: layout.stride(),
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

fn vertex_entry_point(layout: VertexLayout) -> &'static str {
    match layout {
        VertexLayout::Position => "vs_position",
        VertexLayout::PositionUv => "vs_textured",
    }
}

fn index_format(width: IndexWidth) -> wgpu::IndexFormat {
    match width {
        IndexWidth::U16 => wgpu::IndexFormat::Uint16,
        IndexWidth::U32 => wgpu::IndexFormat::Uint32,
    }
}

fn primitive_state(desc: &PipelineDesc) -> wgpu::PrimitiveState {
    let (topology, strip_index_format) = match desc.mode {
        TriangulationMode::Fill => (wgpu::PrimitiveTopology::TriangleList, None),
        TriangulationMode::LineStrip => {
            (wgpu::PrimitiveTopology::LineStrip, Some(index_format(desc.index_width)))
        }
    };
    wgpu::PrimitiveState {
        topology,
        strip_index_format,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

// ── device ────────────────────────────────────────────────────────────────

impl RenderDevice<Wgpu> for RenderCtx<'_> {
    fn is_lost(&self) -> bool {
        self.device_lost
    }

    fn create_buffer(&self, usage: BufferUsage, size: u64, label: &str) -> wgpu::Buffer {
        let usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write_buffer(&self, buffer: &wgpu::Buffer, data: &[u8]) {
        self.queue.write_buffer(buffer, 0, data);
    }

    fn release_buffer(&self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }

    fn create_pipeline(&self, desc: &PipelineDesc) -> ShapePipeline {
        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });

        let bind_group_layout =
            self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tessera shape bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: ShapeUniform::min_binding_size(),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera shape pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label.as_str()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(vertex_entry_point(desc.layout)),
                compilation_options: Default::default(),
                buffers: &[vertex_buffer_layout(desc.layout)],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive_state(desc),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera shape ubo"),
            size: std::mem::size_of::<ShapeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera shape bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        log::debug!("created shape pipeline '{}' for {:?}", desc.label, self.surface_format);

        ShapePipeline {
            format: self.surface_format,
            desc: desc.clone(),
            pipeline,
            bind_group,
            uniform,
        }
    }

    fn pipeline_compatible(&self, pipeline: &ShapePipeline, desc: &PipelineDesc) -> bool {
        pipeline.format == self.surface_format && pipeline.desc == *desc
    }

    fn write_uniforms(&self, pipeline: &ShapePipeline, paint: &Paint) {
        let uniform = ShapeUniform::new(self.viewport, paint);
        self.queue.write_buffer(&pipeline.uniform, 0, bytemuck::bytes_of(&uniform));
    }
}

// ── render buffer ─────────────────────────────────────────────────────────

impl<G: VertexGenerator> ShapeRenderBuffer<Wgpu, G> {
    /// Synchronizes and draws every shape into `target`, on top of its
    /// current contents.
    pub fn render(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
    ) -> Result<FrameStats, RenderBufferError> {
        if ctx.device_lost {
            log::error!("shape render buffer skipped: device lost");
            return Err(RenderBufferError::DeviceLost);
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        self.render_with(ctx, &mut rpass)
    }
}

// ── pass ──────────────────────────────────────────────────────────────────

impl DrawPass<Wgpu> for wgpu::RenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &ShapePipeline) {
        wgpu::RenderPass::set_pipeline(self, &pipeline.pipeline);
        self.set_bind_group(0, &pipeline.bind_group, &[]);
    }

    fn draw_indexed(
        &mut self,
        vertices: &wgpu::Buffer,
        indices: &wgpu::Buffer,
        width: IndexWidth,
        count: u32,
    ) {
        self.set_vertex_buffer(0, vertices.slice(..));
        self.set_index_buffer(indices.slice(..), index_format(width));
        wgpu::RenderPass::draw_indexed(self, 0..count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_strips_need_a_strip_index_format() {
        let desc = PipelineDesc {
            label: "test".into(),
            layout: VertexLayout::Position,
            mode: TriangulationMode::LineStrip,
            index_width: IndexWidth::U32,
        };
        let state = primitive_state(&desc);
        assert_eq!(state.topology, wgpu::PrimitiveTopology::LineStrip);
        assert_eq!(state.strip_index_format, Some(wgpu::IndexFormat::Uint32));

        let fill = primitive_state(&PipelineDesc { mode: TriangulationMode::Fill, ..desc });
        assert_eq!(fill.topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(fill.strip_index_format, None);
    }

    #[test]
    fn vertex_layouts_follow_the_generator_stride() {
        assert_eq!(vertex_buffer_layout(VertexLayout::Position).array_stride, 8);
        let textured = vertex_buffer_layout(VertexLayout::PositionUv);
        assert_eq!(textured.array_stride, 16);
        assert_eq!(textured.attributes[1].offset, 8);
        assert_eq!(vertex_entry_point(VertexLayout::PositionUv), "vs_textured");
    }
}
