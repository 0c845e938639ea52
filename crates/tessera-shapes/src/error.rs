use thiserror::Error;

use crate::shape::ShapeKind;
use crate::skip::ElementSkip;

/// Errors raised while constructing, mutating or triangulating a shape.
///
/// None of these are retried internally; the caller corrects its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("subdivision count {0} is below the minimum of 3")]
    TooFewSubdivisions(u32),

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("donut outer radius {outer} must exceed inner radius {inner}")]
    InvertedDonut { inner: f32, outer: f32 },

    #[error("shape needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("segment width must be positive, got {0}")]
    NonPositiveWidth(f32),

    #[error("segment endpoints coincide")]
    DegenerateSegment,

    #[error("rectangle has zero area")]
    EmptyRectangle,

    #[error("arc angle is zero")]
    EmptyArc,

    #[error("geometry input is not finite")]
    NonFiniteInput,

    #[error("{shape} triangulation does not support element skip {skip:?}")]
    UnsupportedSkip { shape: ShapeKind, skip: ElementSkip },

    #[error("element skip {skip:?} keeps {kept} of {count} vertices; at least 3 are required")]
    SkipTooLarge { skip: ElementSkip, kept: usize, count: usize },

    #[error("invalid element skip {0:?}")]
    InvalidSkip(ElementSkip),

    #[error("fan triangulation requires a convex shape")]
    NotConvex,

    #[error("{count} vertices exceed the {max}-vertex limit of {bits}-bit indices")]
    IndexCapacity { count: usize, max: usize, bits: u32 },

    #[error("output buffer holds {len} elements, {required} required")]
    BufferTooSmall { required: usize, len: usize },

    #[error("vertex index {index} out of range for {len} vertices")]
    VertexOutOfRange { index: usize, len: usize },
}

impl ShapeError {
    /// Configuration errors are fixed by changing the geometric inputs.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            ShapeError::NotConvex
                | ShapeError::IndexCapacity { .. }
                | ShapeError::BufferTooSmall { .. }
                | ShapeError::VertexOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;
