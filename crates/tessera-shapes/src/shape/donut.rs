use core::f32::consts::TAU;

use crate::coords::Vec2;
use crate::error::{Result, ShapeError};
use crate::index::{IndexInt, check_capacity};
use crate::skip::{ElementSkip, require_identity};
use crate::triangulate::{
    RingSpan, TriangulationMode, ensure_output, ring_bridge_len, write_line_strip,
    write_ring_bridge,
};

use super::{ShapeDefinition, ShapeKind, bump, ensure_finite, ensure_radius, ensure_subdivisions};

/// Annulus between two concentric rings.
///
/// Both rings live in one vertex buffer: the inner ring first, then the outer
/// ring. Radius changes regenerate a single ring in place; subdivision changes
/// rebuild the buffer and move the outer span.
#[derive(Debug, Clone, PartialEq)]
pub struct Donut {
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    vertices: Vec<Vec2>,
    inner: RingSpan,
    outer: RingSpan,
    version: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Ring {
    Inner,
    Outer,
}

impl Donut {
    pub fn new(
        center: Vec2,
        outer_radius: f32,
        outer_subdivisions: u32,
        inner_radius: f32,
        inner_subdivisions: u32,
    ) -> Result<Self> {
        ensure_finite([center])?;
        validate_radii(inner_radius, outer_radius)?;
        ensure_subdivisions(outer_subdivisions)?;
        ensure_subdivisions(inner_subdivisions)?;

        let mut donut = Self {
            center,
            inner_radius,
            outer_radius,
            vertices: Vec::new(),
            inner: RingSpan::default(),
            outer: RingSpan::default(),
            version: 0,
        };
        donut.resize(inner_subdivisions as usize, outer_subdivisions as usize);
        Ok(donut)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    #[inline]
    pub fn inner_span(&self) -> RingSpan {
        self.inner
    }

    #[inline]
    pub fn outer_span(&self) -> RingSpan {
        self.outer
    }

    #[inline]
    pub fn inner_ring(&self) -> &[Vec2] {
        &self.vertices[self.inner.range()]
    }

    #[inline]
    pub fn outer_ring(&self) -> &[Vec2] {
        &self.vertices[self.outer.range()]
    }

    pub fn set_center(&mut self, center: Vec2) -> Result<()> {
        ensure_finite([center])?;
        self.center = center;
        self.regenerate(Ring::Inner);
        self.regenerate(Ring::Outer);
        bump(&mut self.version);
        Ok(())
    }

    /// Regenerates the inner ring only.
    pub fn set_inner_radius(&mut self, radius: f32) -> Result<()> {
        validate_radii(radius, self.outer_radius)?;
        self.inner_radius = radius;
        self.regenerate(Ring::Inner);
        bump(&mut self.version);
        Ok(())
    }

    /// Regenerates the outer ring only.
    pub fn set_outer_radius(&mut self, radius: f32) -> Result<()> {
        validate_radii(self.inner_radius, radius)?;
        self.outer_radius = radius;
        self.regenerate(Ring::Outer);
        bump(&mut self.version);
        Ok(())
    }

    pub fn set_inner_subdivisions(&mut self, subdivisions: u32) -> Result<()> {
        ensure_subdivisions(subdivisions)?;
        self.resize(subdivisions as usize, self.outer.len);
        bump(&mut self.version);
        Ok(())
    }

    pub fn set_outer_subdivisions(&mut self, subdivisions: u32) -> Result<()> {
        ensure_subdivisions(subdivisions)?;
        self.resize(self.inner.len, subdivisions as usize);
        bump(&mut self.version);
        Ok(())
    }

    fn resize(&mut self, inner: usize, outer: usize) {
        self.inner = RingSpan::new(0, inner);
        self.outer = RingSpan::new(inner, outer);
        self.vertices.resize(inner + outer, Vec2::zero());
        self.regenerate(Ring::Inner);
        self.regenerate(Ring::Outer);
    }

    fn regenerate(&mut self, ring: Ring) {
        let (span, radius) = match ring {
            Ring::Inner => (self.inner, self.inner_radius),
            Ring::Outer => (self.outer, self.outer_radius),
        };
        let step = TAU / span.len as f32;
        let center = self.center;
        for (i, v) in self.vertices[span.range()].iter_mut().enumerate() {
            *v = center + Vec2::from_angle(i as f32 * step) * radius;
        }
    }
}

fn validate_radii(inner: f32, outer: f32) -> Result<()> {
    ensure_radius(inner)?;
    ensure_radius(outer)?;
    if outer <= inner {
        return Err(ShapeError::InvertedDonut { inner, outer });
    }
    Ok(())
}

impl ShapeDefinition for Donut {
    #[inline]
    fn kind(&self) -> ShapeKind {
        ShapeKind::Donut
    }

    #[inline]
    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// The hole makes every donut non-convex.
    #[inline]
    fn is_convex(&self) -> bool {
        false
    }

    #[inline]
    fn version(&self) -> u64 {
        self.version
    }

    fn force_update(&mut self) {
        bump(&mut self.version);
    }

    fn triangulation_len(&self, mode: TriangulationMode, skip: ElementSkip) -> Result<usize> {
        require_identity(ShapeKind::Donut, self.vertices.len(), skip)?;
        Ok(match mode {
            TriangulationMode::Fill => ring_bridge_len(self.inner, self.outer),
            TriangulationMode::LineStrip => self.inner.len + self.outer.len + 2,
        })
    }

    fn triangulate<I: IndexInt>(
        &self,
        mode: TriangulationMode,
        out: &mut [I],
        skip: ElementSkip,
    ) -> Result<usize> {
        check_capacity::<I>(self.vertices.len())?;
        let required = self.triangulation_len(mode, skip)?;
        ensure_output(required, out.len())?;

        Ok(match mode {
            TriangulationMode::Fill => write_ring_bridge(out, self.inner, self.outer),
            TriangulationMode::LineStrip => {
                let n = write_line_strip(out, self.inner.range());
                n + write_line_strip(&mut out[n..], self.outer.range())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn equal_rings_use_six_indices_per_subdivision() {
        for k in [3usize, 4, 16, 64] {
            let donut = Donut::new(Vec2::zero(), 10.0, k as u32, 5.0, k as u32).unwrap();
            let len = donut.triangulation_len(TriangulationMode::Fill, ElementSkip::None).unwrap();
            assert_eq!(len, 6 * k);
            let mut out = vec![0u32; len];
            assert_eq!(donut.triangulate(TriangulationMode::Fill, &mut out, ElementSkip::None), Ok(len));
            assert!(out.iter().all(|&i| (i as usize) < 2 * k));
        }
    }

    #[test]
    fn uneven_rings_bridge_every_vertex() {
        let donut = Donut::new(Vec2::zero(), 10.0, 12, 5.0, 5).unwrap();
        let len = donut.triangulation_len(TriangulationMode::Fill, ElementSkip::None).unwrap();
        assert_eq!(len, 3 * (12 + 5));
        let mut out = vec![0u16; len];
        donut.triangulate(TriangulationMode::Fill, &mut out, ElementSkip::None).unwrap();
        for v in 0..17u16 {
            assert!(out.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn spans_partition_the_buffer() {
        let donut = Donut::new(Vec2::new(1.0, 1.0), 4.0, 8, 2.0, 6).unwrap();
        assert_eq!(donut.inner_span(), RingSpan::new(0, 6));
        assert_eq!(donut.outer_span(), RingSpan::new(6, 8));
        assert_eq!(donut.len(), 14);
        assert!(donut.inner_ring().iter().all(|v| approx((*v - Vec2::new(1.0, 1.0)).length(), 2.0)));
        assert!(donut.outer_ring().iter().all(|v| approx((*v - Vec2::new(1.0, 1.0)).length(), 4.0)));
    }

    #[test]
    fn radius_change_regenerates_one_ring() {
        let mut donut = Donut::new(Vec2::zero(), 10.0, 8, 5.0, 8).unwrap();
        let inner_before = donut.inner_ring().to_vec();
        let v = donut.version();

        donut.set_outer_radius(12.0).unwrap();
        assert_eq!(donut.inner_ring(), inner_before.as_slice());
        assert!(donut.outer_ring().iter().all(|p| approx(p.length(), 12.0)));
        assert_eq!(donut.version(), v + 1);
    }

    #[test]
    fn subdivision_change_moves_outer_span() {
        let mut donut = Donut::new(Vec2::zero(), 10.0, 8, 5.0, 4).unwrap();
        donut.set_inner_subdivisions(6).unwrap();
        assert_eq!(donut.outer_span(), RingSpan::new(6, 8));
        assert_eq!(donut.len(), 14);
        assert!(donut.outer_ring().iter().all(|p| approx(p.length(), 10.0)));
    }

    #[test]
    fn line_strip_closes_each_ring() {
        let donut = Donut::new(Vec2::zero(), 10.0, 4, 5.0, 3).unwrap();
        let mut out = [0u32; 9];
        let n = donut.triangulate(TriangulationMode::LineStrip, &mut out, ElementSkip::None).unwrap();
        assert_eq!(n, 9);
        assert_eq!(out, [0, 1, 2, 0, 3, 4, 5, 6, 3]);
    }

    #[test]
    fn rejects_inverted_radii_and_skip() {
        assert_eq!(
            Donut::new(Vec2::zero(), 5.0, 8, 5.0, 8),
            Err(ShapeError::InvertedDonut { inner: 5.0, outer: 5.0 })
        );
        let mut donut = Donut::new(Vec2::zero(), 10.0, 8, 5.0, 8).unwrap();
        assert!(donut.set_inner_radius(11.0).is_err());
        assert_eq!(donut.inner_radius(), 5.0);
        assert!(matches!(
            donut.triangulation_len(TriangulationMode::Fill, ElementSkip::Skip(1)),
            Err(ShapeError::UnsupportedSkip { shape: ShapeKind::Donut, .. })
        ));
    }
}
