use crate::coords::{Rect, Vec2};
use crate::error::{Result, ShapeError};
use crate::index::{IndexInt, check_capacity};
use crate::skip::{ElementSkip, require_identity};
use crate::triangulate::{
    RECTANGLE_LINE_STRIP, RECTANGLE_TRIANGULATION, TriangulationMode, ensure_output, write_table,
};

use super::{ShapeDefinition, ShapeKind, bump};

/// Axis-aligned rectangle: four corners, constant triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    rect: Rect,
    corners: [Vec2; 4],
    version: u64,
}

impl Rectangle {
    /// Creates a rectangle from position + size. Negative sizes are normalized.
    pub fn new(rect: Rect) -> Result<Self> {
        let rect = validated(rect)?;
        Ok(Self { rect, corners: rect.corners(), version: 0 })
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) -> Result<()> {
        let rect = validated(rect)?;
        if rect != self.rect {
            self.rect = rect;
            self.corners = rect.corners();
            bump(&mut self.version);
        }
        Ok(())
    }
}

fn validated(rect: Rect) -> Result<Rect> {
    if !rect.is_finite() {
        return Err(ShapeError::NonFiniteInput);
    }
    let rect = rect.normalized();
    if rect.is_empty() {
        return Err(ShapeError::EmptyRectangle);
    }
    Ok(rect)
}

/// Shared by rectangles and segments: both are 4-vertex quads.
pub(super) fn quad_triangulation_len(
    kind: ShapeKind,
    mode: TriangulationMode,
    skip: ElementSkip,
) -> Result<usize> {
    require_identity(kind, 4, skip)?;
    Ok(match mode {
        TriangulationMode::Fill => RECTANGLE_TRIANGULATION.len(),
        TriangulationMode::LineStrip => RECTANGLE_LINE_STRIP.len(),
    })
}

pub(super) fn quad_triangulate<I: IndexInt>(
    kind: ShapeKind,
    mode: TriangulationMode,
    out: &mut [I],
    skip: ElementSkip,
) -> Result<usize> {
    check_capacity::<I>(4)?;
    let required = quad_triangulation_len(kind, mode, skip)?;
    ensure_output(required, out.len())?;
    Ok(match mode {
        TriangulationMode::Fill => write_table(out, &RECTANGLE_TRIANGULATION),
        TriangulationMode::LineStrip => write_table(out, &RECTANGLE_LINE_STRIP),
    })
}

impl ShapeDefinition for Rectangle {
    #[inline]
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    #[inline]
    fn vertices(&self) -> &[Vec2] {
        &self.corners
    }

    #[inline]
    fn is_convex(&self) -> bool {
        true
    }

    #[inline]
    fn version(&self) -> u64 {
        self.version
    }

    fn force_update(&mut self) {
        bump(&mut self.version);
    }

    fn triangulation_len(&self, mode: TriangulationMode, skip: ElementSkip) -> Result<usize> {
        quad_triangulation_len(ShapeKind::Rectangle, mode, skip)
    }

    fn triangulate<I: IndexInt>(
        &self,
        mode: TriangulationMode,
        out: &mut [I],
        skip: ElementSkip,
    ) -> Result<usize> {
        quad_triangulate(ShapeKind::Rectangle, mode, out, skip)
    }
}
