//! Per-vertex strategies run when a shape's device vertices are regenerated.

use bytemuck::{Pod, Zeroable};
use tessera_shapes::{Rect, Shape, ShapeDefinition, ShapeHandle, Vec2};

use super::backend::VertexLayout;

/// Whether the generated vertices must be uploaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexUpload {
    Write,
    /// The device copy is still valid. Honored only when the entry already
    /// holds a vertex buffer of exactly the generated size.
    Keep,
}

/// What a generator can see besides the shape itself.
#[derive(Debug, Clone, Copy)]
pub struct GenerateCtx<'a> {
    /// Every shape of the render buffer, in draw order.
    pub shapes: &'a [ShapeHandle],
    /// Position of the shape being generated inside `shapes`.
    pub index: usize,
}

/// Turns shape vertices into device vertices.
///
/// `generate` appends exactly one vertex per shape vertex, in vertex order,
/// to an empty `out`. `shape` is read-locked for the duration of the call:
/// do not lock `ctx.shapes[ctx.index]` again.
pub trait VertexGenerator: Send {
    type Vertex: Pod + Send;

    const LAYOUT: VertexLayout;

    fn generate(
        &mut self,
        shape: &Shape,
        ctx: &GenerateCtx<'_>,
        out: &mut Vec<Self::Vertex>,
    ) -> VertexUpload;
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub pos: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

/// Positions copied as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityVertices;

impl VertexGenerator for IdentityVertices {
    type Vertex = PositionVertex;

    const LAYOUT: VertexLayout = VertexLayout::Position;

    fn generate(
        &mut self,
        shape: &Shape,
        _ctx: &GenerateCtx<'_>,
        out: &mut Vec<PositionVertex>,
    ) -> VertexUpload {
        out.extend(shape.vertices().iter().map(|&v| PositionVertex { pos: v.into() }));
        VertexUpload::Write
    }
}

/// Positions plus texture coordinates spanning the shape's bounding box:
/// `(0, 0)` at the top-left corner, `(1, 1)` at the bottom-right one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TexCoordVertices;

impl VertexGenerator for TexCoordVertices {
    type Vertex = TexturedVertex;

    const LAYOUT: VertexLayout = VertexLayout::PositionUv;

    fn generate(
        &mut self,
        shape: &Shape,
        _ctx: &GenerateCtx<'_>,
        out: &mut Vec<TexturedVertex>,
    ) -> VertexUpload {
        let vertices = shape.vertices();
        let bounds = Rect::from_points(vertices).unwrap_or_default();
        let inv = |extent: f32| if extent > 0.0 { 1.0 / extent } else { 0.0 };
        let scale = Vec2::new(inv(bounds.size.x), inv(bounds.size.y));

        out.extend(vertices.iter().map(|&v| {
            let rel = v - bounds.origin;
            TexturedVertex {
                pos: v.into(),
                uv: [rel.x * scale.x, rel.y * scale.y],
            }
        }));
        VertexUpload::Write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_shapes::{Rectangle, Segment};

    fn generate<G: VertexGenerator>(generator: &mut G, shape: Shape) -> Vec<G::Vertex> {
        let handle = ShapeHandle::new(shape);
        let shapes = [handle.clone()];
        let ctx = GenerateCtx { shapes: &shapes, index: 0 };
        let mut out = Vec::new();
        let upload = generator.generate(&handle.read(), &ctx, &mut out);
        assert_eq!(upload, VertexUpload::Write);
        out
    }

    #[test]
    fn identity_copies_positions_in_order() {
        let shape: Shape = Segment::new(Vec2::zero(), Vec2::new(10.0, 0.0), 2.0).unwrap().into();
        let expected: Vec<[f32; 2]> = shape.vertices().iter().map(|&v| v.into()).collect();
        let out = generate(&mut IdentityVertices, shape);
        assert_eq!(out.iter().map(|v| v.pos).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn tex_coords_span_the_bounding_box() {
        let shape: Shape = Rectangle::new(Rect::new(10.0, 20.0, 4.0, 8.0)).unwrap().into();
        let out = generate(&mut TexCoordVertices, shape);
        let uvs: Vec<[f32; 2]> = out.iter().map(|v| v.uv).collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(out[2].pos, [14.0, 28.0]);
    }

    #[test]
    fn layouts_match_vertex_sizes() {
        assert_eq!(IdentityVertices::LAYOUT.stride(), std::mem::size_of::<PositionVertex>() as u64);
        assert_eq!(TexCoordVertices::LAYOUT.stride(), std::mem::size_of::<TexturedVertex>() as u64);
    }
}
