//! Coordinate types used by the renderer.
//!
//! Geometry types come from `tessera-shapes`; the viewport is renderer-only.

mod viewport;

pub use tessera_shapes::coords::{Rect, Vec2};
pub use viewport::Viewport;
