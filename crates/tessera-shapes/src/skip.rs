//! Element skip: reduced-density triangulation for level of detail.

use crate::error::{Result, ShapeError};
use crate::shape::ShapeKind;

/// How many ring vertices a triangulation may leave out.
///
/// Every variant resolves to a stride `s >= 1` against the shape's vertex
/// count; the triangulation then uses vertices `0, s, 2s, …`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum ElementSkip {
    /// Use every vertex.
    #[default]
    None,
    /// Leave out `n` vertices between two kept ones.
    Skip(usize),
    /// Keep roughly `n` vertices. `Keep(0)` is invalid.
    Keep(usize),
    /// Leave out the given fraction of vertices, in `[0, 1)`.
    SkipPercent(f32),
    /// Keep the given fraction of vertices, in `(0, 1]`.
    KeepPercent(f32),
}

impl ElementSkip {
    /// Resolves the skip to a vertex stride for a ring of `count` vertices.
    pub fn stride(self, count: usize) -> Result<usize> {
        let stride = match self {
            ElementSkip::None => 1,
            ElementSkip::Skip(n) => n.saturating_add(1),
            ElementSkip::Keep(0) => return Err(ShapeError::InvalidSkip(self)),
            ElementSkip::Keep(n) => stride_for_kept(count, n),
            ElementSkip::SkipPercent(p) if (0.0..1.0).contains(&p) => {
                stride_for_kept(count, kept_fraction(count, 1.0 - p))
            }
            ElementSkip::KeepPercent(p) if p > 0.0 && p <= 1.0 => {
                stride_for_kept(count, kept_fraction(count, p))
            }
            _ => return Err(ShapeError::InvalidSkip(self)),
        };
        Ok(stride)
    }

    /// True when the skip keeps every vertex of a `count`-vertex ring.
    pub fn is_identity_for(self, count: usize) -> Result<bool> {
        Ok(self.stride(count)? == 1)
    }
}

fn kept_fraction(count: usize, fraction: f32) -> usize {
    ((count as f32 * fraction).round() as usize).max(1)
}

fn stride_for_kept(count: usize, kept: usize) -> usize {
    count.div_ceil(kept).max(1)
}

/// Resolved sampling of one vertex ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Sampling {
    pub stride: usize,
    pub kept: usize,
}

impl Sampling {
    /// Sampled vertex indices of a `count`-vertex ring starting at 0.
    pub fn indices(self, count: usize) -> impl Iterator<Item = usize> + Clone {
        (0..count).step_by(self.stride)
    }
}

/// Samples a closed ring of `count` vertices; at least 3 must survive.
pub(crate) fn sample_ring(count: usize, skip: ElementSkip) -> Result<Sampling> {
    let stride = skip.stride(count)?;
    let kept = count.div_ceil(stride);
    if kept < 3 {
        return Err(ShapeError::SkipTooLarge { skip, kept, count });
    }
    Ok(Sampling { stride, kept })
}

/// Fixed-topology shapes only accept a skip that keeps every vertex.
pub(crate) fn require_identity(shape: ShapeKind, count: usize, skip: ElementSkip) -> Result<()> {
    if skip.is_identity_for(count)? {
        Ok(())
    } else {
        Err(ShapeError::UnsupportedSkip { shape, skip })
    }
}
