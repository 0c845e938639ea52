//! Fill model for shape rendering.
//!
//! Colors are linear with premultiplied alpha.

mod color;

pub use color::Color;

/// Fill applied to every shape of a render buffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Blends from `top` to `bottom` across each shape's bounding box.
    /// Needs a vertex generator that emits texture coordinates.
    VerticalGradient { top: Color, bottom: Color },
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::WHITE)
    }
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.a >= 1.0,
            Paint::VerticalGradient { top, bottom } => top.a >= 1.0 && bottom.a >= 1.0,
        }
    }

    /// `(color0, color1)` for the shape shader. Solid fills repeat the color.
    pub fn resolve(&self) -> ([f32; 4], [f32; 4]) {
        match *self {
            Paint::Solid(c) => (c.to_array(), c.to_array()),
            Paint::VerticalGradient { top, bottom } => (top.to_array(), bottom.to_array()),
        }
    }
}
