use crate::coords::Vec2;
use crate::error::{Result, ShapeError};
use crate::index::IndexInt;
use crate::skip::ElementSkip;
use crate::triangulate::TriangulationMode;

use super::rectangle::{quad_triangulate, quad_triangulation_len};
use super::{ShapeDefinition, ShapeKind, bump, ensure_finite};

/// Thick line: a rectangle of length `|end - start|` and thickness `width`
/// centred on the line from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    start: Vec2,
    end: Vec2,
    width: f32,
    corners: [Vec2; 4],
    version: u64,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2, width: f32) -> Result<Self> {
        let corners = corners(start, end, width)?;
        Ok(Self { start, end, width, corners, version: 0 })
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        self.end
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Angle of `end - start` in radians.
    #[inline]
    pub fn rotation(&self) -> f32 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    pub fn set_endpoints(&mut self, start: Vec2, end: Vec2) -> Result<()> {
        self.corners = corners(start, end, self.width)?;
        self.start = start;
        self.end = end;
        bump(&mut self.version);
        Ok(())
    }

    pub fn set_width(&mut self, width: f32) -> Result<()> {
        self.corners = corners(self.start, self.end, width)?;
        self.width = width;
        bump(&mut self.version);
        Ok(())
    }
}

/// `start - n·w/2, end - n·w/2, end + n·w/2, start + n·w/2` with `n` the unit
/// normal of the line.
fn corners(start: Vec2, end: Vec2, width: f32) -> Result<[Vec2; 4]> {
    ensure_finite([start, end])?;
    if !width.is_finite() {
        return Err(ShapeError::NonFiniteInput);
    }
    if width <= 0.0 {
        return Err(ShapeError::NonPositiveWidth(width));
    }
    let dir = end - start;
    if dir.length() == 0.0 {
        return Err(ShapeError::DegenerateSegment);
    }

    let offset = dir.normalized().perp() * (width * 0.5);
    Ok([start - offset, end - offset, end + offset, start + offset])
}

impl ShapeDefinition for Segment {
    #[inline]
    fn kind(&self) -> ShapeKind {
        ShapeKind::Segment
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
        quad_triangulation_len(ShapeKind::Segment, mode, skip)
    }

    fn triangulate<I: IndexInt>(
        &self,
        mode: TriangulationMode,
        out: &mut [I],
        skip: ElementSkip,
    ) -> Result<usize> {
        quad_triangulate(ShapeKind::Segment, mode, out, skip)
    }
}
