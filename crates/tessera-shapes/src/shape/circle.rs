use core::f32::consts::{PI, TAU};

use crate::coords::Vec2;
use crate::error::{Result, ShapeError};
use crate::index::{IndexInt, check_capacity};
use crate::skip::{ElementSkip, sample_ring};
use crate::triangulate::{
    TriangulationMode, ensure_output, fan_len, line_strip_len, write_fan, write_line_strip,
};

use super::{ShapeDefinition, ShapeKind, bump, ensure_finite, ensure_radius, ensure_subdivisions};

/// Sweeps within this distance of a full turn close the circle.
const FULL_TURN_EPSILON: f32 = 1e-5;

/// Circle or circular arc approximated by a regular polyline.
///
/// A full circle stores `subdivisions` rim vertices. A partial arc stores the
/// center first, followed by `subdivisions + 1` rim vertices (both arc ends),
/// so its fill triangulation is a fan around the center.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Vec2,
    radius: f32,
    subdivisions: u32,
    angle: f32,
    vertices: Vec<Vec2>,
    version: u64,
}

impl Circle {
    /// Full circle.
    pub fn new(center: Vec2, radius: f32, subdivisions: u32) -> Result<Self> {
        Self::arc(center, radius, subdivisions, TAU)
    }

    /// Arc sweeping `angle` radians from `center + (radius, 0)`. The sign of
    /// `angle` picks the direction; `|angle| >= 2π` is a full circle.
    pub fn arc(center: Vec2, radius: f32, subdivisions: u32, angle: f32) -> Result<Self> {
        validate(center, radius, subdivisions, angle)?;
        let mut circle = Self {
            center,
            radius,
            subdivisions,
            angle,
            vertices: Vec::new(),
            version: 0,
        };
        circle.rebuild();
        Ok(circle)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        is_full_turn(self.angle)
    }

    pub fn set_center(&mut self, center: Vec2) -> Result<()> {
        validate(center, self.radius, self.subdivisions, self.angle)?;
        self.center = center;
        self.rebuild();
        bump(&mut self.version);
        Ok(())
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        validate(self.center, radius, self.subdivisions, self.angle)?;
        self.radius = radius;
        self.rebuild();
        bump(&mut self.version);
        Ok(())
    }

    /// Changes the vertex count; the next sync reallocates the entry.
    pub fn set_subdivisions(&mut self, subdivisions: u32) -> Result<()> {
        validate(self.center, self.radius, subdivisions, self.angle)?;
        self.subdivisions = subdivisions;
        self.rebuild();
        bump(&mut self.version);
        Ok(())
    }

    pub fn set_angle(&mut self, angle: f32) -> Result<()> {
        validate(self.center, self.radius, self.subdivisions, angle)?;
        self.angle = angle;
        self.rebuild();
        bump(&mut self.version);
        Ok(())
    }

    fn rebuild(&mut self) {
        self.vertices.clear();
        let full = self.is_full();
        let step = if full {
            TAU.copysign(self.angle) / self.subdivisions as f32
        } else {
            self.angle / self.subdivisions as f32
        };
        let rim_points = if full { self.subdivisions } else { self.subdivisions + 1 };

        let (center, radius) = (self.center, self.radius);
        if !full {
            self.vertices.push(center);
        }
        self.vertices
            .extend((0..rim_points).map(|i| center + Vec2::from_angle(i as f32 * step) * radius));
    }

    /// Sampled vertex indices, including the center of a partial arc.
    fn sampled(&self, skip: ElementSkip) -> Result<SampledRim> {
        if self.is_full() {
            let count = self.vertices.len();
            let sampling = sample_ring(count, skip)?;
            return Ok(SampledRim { stride: sampling.stride, kept: sampling.kept, arc: None });
        }

        let rim = self.vertices.len() - 1;
        let stride = skip.stride(rim)?;
        let tail = usize::from((rim - 1) % stride != 0);
        let kept = 1 + rim.div_ceil(stride) + tail;
        if kept < 3 {
            return Err(ShapeError::SkipTooLarge { skip, kept, count: self.vertices.len() });
        }
        Ok(SampledRim { stride, kept, arc: Some(rim) })
    }
}

/// Result of applying an element skip to the circle's vertices.
#[derive(Debug, Copy, Clone)]
struct SampledRim {
    stride: usize,
    kept: usize,
    /// Rim vertex count of a partial arc; `None` for a full circle.
    arc: Option<usize>,
}

impl SampledRim {
    fn indices(self, count: usize) -> Box<dyn Iterator<Item = usize>> {
        let stride = self.stride;
        match self.arc {
            None => Box::new((0..count).step_by(stride)),
            Some(rim) => {
                let last = rim - 1;
                let tail = ((last % stride) != 0).then_some(last);
                let rim_indices = (0..rim).step_by(stride).chain(tail).map(|i| i + 1);
                Box::new(core::iter::once(0).chain(rim_indices))
            }
        }
    }
}

fn is_full_turn(angle: f32) -> bool {
    angle.abs() >= TAU - FULL_TURN_EPSILON
}

fn validate(center: Vec2, radius: f32, subdivisions: u32, angle: f32) -> Result<()> {
    ensure_finite([center])?;
    ensure_radius(radius)?;
    ensure_subdivisions(subdivisions)?;
    if !angle.is_finite() {
        return Err(ShapeError::NonFiniteInput);
    }
    if angle == 0.0 {
        return Err(ShapeError::EmptyArc);
    }
    Ok(())
}

impl ShapeDefinition for Circle {
    #[inline]
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    #[inline]
    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Full circles and arcs up to a half turn are convex with their center.
    #[inline]
    fn is_convex(&self) -> bool {
        self.is_full() || self.angle.abs() <= PI
    }

    #[inline]
    fn version(&self) -> u64 {
        self.version
    }

    fn force_update(&mut self) {
        bump(&mut self.version);
    }

    fn triangulation_len(&self, mode: TriangulationMode, skip: ElementSkip) -> Result<usize> {
        let sampled = self.sampled(skip)?;
        Ok(match mode {
            TriangulationMode::Fill => fan_len(sampled.kept),
            TriangulationMode::LineStrip => line_strip_len(sampled.kept),
        })
    }

    fn triangulate<I: IndexInt>(
        &self,
        mode: TriangulationMode,
        out: &mut [I],
        skip: ElementSkip,
    ) -> Result<usize> {
        let count = self.vertices.len();
        check_capacity::<I>(count)?;
        let sampled = self.sampled(skip)?;
        let required = match mode {
            TriangulationMode::Fill => fan_len(sampled.kept),
            TriangulationMode::LineStrip => line_strip_len(sampled.kept),
        };
        ensure_output(required, out.len())?;

        let ring = sampled.indices(count);
        Ok(match mode {
            TriangulationMode::Fill => write_fan(out, ring),
            TriangulationMode::LineStrip => write_line_strip(out, ring),
        })
    }
}
