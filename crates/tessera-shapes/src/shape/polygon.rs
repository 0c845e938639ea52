use crate::convexity::is_convex_ring;
use crate::coords::Vec2;
use crate::error::{Result, ShapeError};
use crate::index::{IndexInt, check_capacity};
use crate::skip::{ElementSkip, sample_ring};
use crate::triangulate::{
    TriangulationMode, ensure_output, fan_len, line_strip_len, write_fan, write_line_strip,
};

use super::{ShapeDefinition, ShapeKind, bump, ensure_finite};

/// Polygon from an explicit vertex ring.
///
/// Convexity is analyzed once at construction (or declared by the caller) and
/// cached. Vertex mutators keep the cached flag; call
/// [`analyze_convexity`](Self::analyze_convexity) to refresh it.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    convex: bool,
    version: u64,
}

impl Polygon {
    /// Creates a polygon and analyzes its convexity.
    pub fn new(vertices: impl Into<Vec<Vec2>>) -> Result<Self> {
        let vertices = validated(vertices.into())?;
        let convex = is_convex_ring(&vertices);
        Ok(Self { vertices, convex, version: 0 })
    }

    /// Creates a polygon whose convexity is declared by the caller.
    ///
    /// Declaring a non-convex ring convex makes fan triangulation produce
    /// overlapping triangles; the declaration is not verified.
    pub fn with_convexity(vertices: impl Into<Vec<Vec2>>, is_convex: bool) -> Result<Self> {
        let vertices = validated(vertices.into())?;
        Ok(Self { vertices, convex: is_convex, version: 0 })
    }

    pub fn set_vertex(&mut self, index: usize, point: Vec2) -> Result<()> {
        ensure_finite([point])?;
        let len = self.vertices.len();
        let slot = self
            .vertices
            .get_mut(index)
            .ok_or(ShapeError::VertexOutOfRange { index, len })?;
        *slot = point;
        bump(&mut self.version);
        Ok(())
    }

    pub fn set_vertices(&mut self, vertices: impl Into<Vec<Vec2>>) -> Result<()> {
        self.vertices = validated(vertices.into())?;
        bump(&mut self.version);
        Ok(())
    }

    pub fn push_vertex(&mut self, point: Vec2) -> Result<()> {
        ensure_finite([point])?;
        self.vertices.push(point);
        bump(&mut self.version);
        Ok(())
    }

    /// Re-runs the convexity analysis and caches the result.
    ///
    /// Bumps the version when the cached flag changes.
    pub fn analyze_convexity(&mut self) -> bool {
        let convex = is_convex_ring(&self.vertices);
        if convex != self.convex {
            log::trace!("polygon convexity changed to {convex}");
            self.convex = convex;
            bump(&mut self.version);
        }
        convex
    }
}

fn validated(vertices: Vec<Vec2>) -> Result<Vec<Vec2>> {
    if vertices.len() < 3 {
        return Err(ShapeError::TooFewVertices(vertices.len()));
    }
    ensure_finite(vertices.iter().copied())?;
    Ok(vertices)
}

impl ShapeDefinition for Polygon {
    #[inline]
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    #[inline]
    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    fn is_convex(&self) -> bool {
        self.convex
    }

    #[inline]
    fn version(&self) -> u64 {
        self.version
    }

    fn force_update(&mut self) {
        bump(&mut self.version);
    }

    fn triangulation_len(&self, mode: TriangulationMode, skip: ElementSkip) -> Result<usize> {
        let sampling = sample_ring(self.vertices.len(), skip)?;
        match mode {
            TriangulationMode::Fill if !self.convex => Err(ShapeError::NotConvex),
            TriangulationMode::Fill => Ok(fan_len(sampling.kept)),
            TriangulationMode::LineStrip => Ok(line_strip_len(sampling.kept)),
        }
    }

    fn triangulate<I: IndexInt>(
        &self,
        mode: TriangulationMode,
        out: &mut [I],
        skip: ElementSkip,
    ) -> Result<usize> {
        let count = self.vertices.len();
        check_capacity::<I>(count)?;
        let required = self.triangulation_len(mode, skip)?;
        ensure_output(required, out.len())?;

        let ring = sample_ring(count, skip)?.indices(count);
        Ok(match mode {
            TriangulationMode::Fill => write_fan(out, ring),
            TriangulationMode::LineStrip => write_line_strip(out, ring),
        })
    }
}
