//! Shared GPU types and utilities of the shape renderer.

use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::paint::Paint;

/// Buffer writes and sizes are padded to this many bytes.
pub(crate) const COPY_ALIGNMENT: u64 = 4;

#[inline]
pub(crate) fn copy_aligned(bytes: u64) -> u64 {
    bytes.div_ceil(COPY_ALIGNMENT) * COPY_ALIGNMENT
}

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── shape uniform ─────────────────────────────────────────────────────────

/// Uniform layout (48 bytes):
///
///  offset  0  viewport  [f32; 2]
///  offset  8  _pad      [f32; 2]
///  offset 16  color0    [f32; 4]
///  offset 32  color1    [f32; 4]
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct ShapeUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
    pub color0: [f32; 4],
    pub color1: [f32; 4],
}

impl ShapeUniform {
    pub(super) fn new(viewport: Viewport, paint: &Paint) -> Self {
        let (color0, color1) = paint.resolve();
        Self {
            viewport: viewport.uniform_size(),
            _pad: [0.0; 2],
            color0,
            color1,
        }
    }

    #[inline]
    pub(super) fn min_binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<Self>() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn uniform_is_48_bytes() {
        assert_eq!(std::mem::size_of::<ShapeUniform>(), 48);
        assert!(ShapeUniform::min_binding_size().is_some());
    }

    #[test]
    fn uniform_carries_viewport_and_paint() {
        let u = ShapeUniform::new(Viewport::new(640.0, 480.0), &Paint::solid(Color::BLACK));
        assert_eq!(u.viewport, [640.0, 480.0]);
        assert_eq!(u.color0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.color1, u.color0);
    }

    #[test]
    fn sizes_round_up_to_copy_alignment() {
        assert_eq!(copy_aligned(0), 0);
        assert_eq!(copy_aligned(6), 8);
        assert_eq!(copy_aligned(8), 8);
    }
}
