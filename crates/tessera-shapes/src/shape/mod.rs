//! Shape model.
//!
//! Extending the model:
//! - add a concrete shape module under `shape::*`
//! - implement [`ShapeDefinition`] for it
//! - add a variant to [`Shape`] and [`ShapeKind`]

mod circle;
mod donut;
mod handle;
mod polygon;
mod rectangle;
mod segment;

use core::fmt;
use core::ops::Index;

use crate::coords::Vec2;
use crate::error::{Result, ShapeError};
use crate::index::IndexInt;
use crate::skip::ElementSkip;
use crate::triangulate::TriangulationMode;

pub use circle::Circle;
pub use donut::Donut;
pub use handle::ShapeHandle;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use segment::Segment;

/// Common contract of every 2D shape.
///
/// Vertex order is winding order. `version` grows (wrapping) on every
/// mutation that moves a vertex or changes the vertex count, and on
/// [`force_update`](Self::force_update); it never decreases otherwise.
pub trait ShapeDefinition {
    fn kind(&self) -> ShapeKind;

    /// Read-only view of the vertex sequence.
    fn vertices(&self) -> &[Vec2];

    fn is_convex(&self) -> bool;

    fn version(&self) -> u64;

    /// Bumps `version` without touching the geometry.
    fn force_update(&mut self);

    /// Exact number of indices [`triangulate`](Self::triangulate) writes.
    fn triangulation_len(&self, mode: TriangulationMode, skip: ElementSkip) -> Result<usize>;

    /// Writes the triangulation into `out` and returns the number of indices
    /// written. Nothing is written when an error is returned.
    fn triangulate<I: IndexInt>(
        &self,
        mode: TriangulationMode,
        out: &mut [I],
        skip: ElementSkip,
    ) -> Result<usize>;

    #[inline]
    fn len(&self) -> usize {
        self.vertices().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.vertices().is_empty()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<Vec2> {
        self.vertices().get(index).copied()
    }

    /// Copies every vertex into the front of `out`.
    fn copy_to(&self, out: &mut [Vec2]) -> Result<usize> {
        let src = self.vertices();
        let len = out.len();
        let dst = out
            .get_mut(..src.len())
            .ok_or(ShapeError::BufferTooSmall { required: src.len(), len })?;
        dst.copy_from_slice(src);
        Ok(src.len())
    }

    fn to_vec(&self) -> Vec<Vec2> {
        self.vertices().to_vec()
    }
}

/// Discriminant of [`Shape`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Polygon,
    Rectangle,
    Circle,
    Donut,
    Segment,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Donut => "donut",
            ShapeKind::Segment => "segment",
        })
    }
}

/// Closed set of supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon),
    Rectangle(Rectangle),
    Circle(Circle),
    Donut(Donut),
    Segment(Segment),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Polygon($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Donut($s) => $body,
            Shape::Segment($s) => $body,
        }
    };
}

impl ShapeDefinition for Shape {
    #[inline]
    fn kind(&self) -> ShapeKind {
        dispatch!(self, s => s.kind())
    }

    #[inline]
    fn vertices(&self) -> &[Vec2] {
        dispatch!(self, s => s.vertices())
    }

    #[inline]
    fn is_convex(&self) -> bool {
        dispatch!(self, s => s.is_convex())
    }

    #[inline]
    fn version(&self) -> u64 {
        dispatch!(self, s => s.version())
    }

    #[inline]
    fn force_update(&mut self) {
        dispatch!(self, s => s.force_update())
    }

    #[inline]
    fn triangulation_len(&self, mode: TriangulationMode, skip: ElementSkip) -> Result<usize> {
        dispatch!(self, s => s.triangulation_len(mode, skip))
    }

    #[inline]
    fn triangulate<I: IndexInt>(
        &self,
        mode: TriangulationMode,
        out: &mut [I],
        skip: ElementSkip,
    ) -> Result<usize> {
        dispatch!(self, s => s.triangulate(mode, out, skip))
    }
}

macro_rules! impl_index {
    ($($ty:ident),*) => {
        $(impl Index<usize> for $ty {
            type Output = Vec2;

            #[inline]
            fn index(&self, index: usize) -> &Vec2 {
                &self.vertices()[index]
            }
        })*
    };
}

impl_index!(Shape, Polygon, Rectangle, Circle, Donut, Segment);

macro_rules! impl_from_shape {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Shape {
            #[inline]
            fn from(s: $variant) -> Self {
                Shape::$variant(s)
            }
        })*
    };
}

impl_from_shape!(Polygon, Rectangle, Circle, Donut, Segment);

#[inline]
pub(crate) fn bump(version: &mut u64) {
    *version = version.wrapping_add(1);
}

pub(crate) fn ensure_finite(points: impl IntoIterator<Item = Vec2>) -> Result<()> {
    if points.into_iter().all(Vec2::is_finite) {
        Ok(())
    } else {
        Err(ShapeError::NonFiniteInput)
    }
}

pub(crate) fn ensure_subdivisions(subdivisions: u32) -> Result<()> {
    if subdivisions < 3 {
        return Err(ShapeError::TooFewSubdivisions(subdivisions));
    }
    Ok(())
}

pub(crate) fn ensure_radius(radius: f32) -> Result<()> {
    if !radius.is_finite() {
        return Err(ShapeError::NonFiniteInput);
    }
    if radius <= 0.0 {
        return Err(ShapeError::NonPositiveRadius(radius));
    }
    Ok(())
}
