//! Tessera shapes crate.
//!
//! This crate owns the CPU side of shape rendering: the shape model, convexity
//! analysis and index generation. It has no GPU dependency; the
//! `tessera-engine` crate uploads what this crate produces.

pub mod coords;
pub mod error;
pub mod index;
pub mod skip;
pub mod triangulate;

mod convexity;
mod shape;

pub use convexity::is_convex_ring;
pub use coords::{Rect, Vec2};
pub use error::{Result, ShapeError};
pub use index::{IndexInt, check_capacity};
pub use shape::{
    Circle, Donut, Polygon, Rectangle, Segment, Shape, ShapeDefinition, ShapeHandle, ShapeKind,
};
pub use skip::ElementSkip;
pub use triangulate::{RECTANGLE_LINE_STRIP, RECTANGLE_TRIANGULATION, RingSpan, TriangulationMode};
