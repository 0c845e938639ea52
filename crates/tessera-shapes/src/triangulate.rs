//! Index generation shared by the concrete shapes.
//!
//! Every writer assumes the caller already validated the output length with
//! [`ensure_output`]; writers never grow or bounds-check the slice themselves.

use crate::error::{Result, ShapeError};
use crate::index::IndexInt;

/// Primitive layout of the index output.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TriangulationMode {
    /// Triangle list.
    #[default]
    Fill,
    /// Closed line strip over the boundary (wireframe).
    LineStrip,
}

/// Constant triangulation of a 4-vertex quad (rectangles and segments).
///
/// Two triangles cover the quad; the trailing triangle is degenerate and
/// produces no fragments.
pub const RECTANGLE_TRIANGULATION: [u8; 9] = [0, 1, 2, 0, 2, 3, 0, 0, 0];

/// Closed boundary of a 4-vertex quad.
pub const RECTANGLE_LINE_STRIP: [u8; 5] = [0, 1, 2, 3, 0];

/// Contiguous run of vertices inside a shape's vertex storage.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct RingSpan {
    pub start: usize,
    pub len: usize,
}

impl RingSpan {
    #[inline]
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Storage index of the `i`-th ring vertex, wrapping at the ring end.
    #[inline]
    pub fn at(self, i: usize) -> usize {
        self.start + i % self.len
    }

    #[inline]
    pub fn range(self) -> core::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Fails when `len` cannot hold `required` indices.
#[inline]
pub(crate) fn ensure_output(required: usize, len: usize) -> Result<()> {
    if len < required {
        return Err(ShapeError::BufferTooSmall { required, len });
    }
    Ok(())
}

#[inline]
pub(crate) fn fan_len(kept: usize) -> usize {
    3 * kept.saturating_sub(2)
}

#[inline]
pub(crate) fn line_strip_len(kept: usize) -> usize {
    kept + 1
}

/// Fan pivoting on the first index of `ring`: `(p0, p[j-1], p[j])`.
pub(crate) fn write_fan<I: IndexInt>(out: &mut [I], ring: impl Iterator<Item = usize>) -> usize {
    let mut ring = ring;
    let (Some(pivot), Some(mut prev)) = (ring.next(), ring.next()) else {
        return 0;
    };

    let mut n = 0;
    for cur in ring {
        out[n] = I::from_index(pivot);
        out[n + 1] = I::from_index(prev);
        out[n + 2] = I::from_index(cur);
        n += 3;
        prev = cur;
    }
    n
}

/// `ring` in order, closed by repeating its first index.
pub(crate) fn write_line_strip<I: IndexInt>(
    out: &mut [I],
    ring: impl Iterator<Item = usize>,
) -> usize {
    let mut n = 0;
    let mut first = None;
    for i in ring {
        first.get_or_insert(i);
        out[n] = I::from_index(i);
        n += 1;
    }
    if let Some(first) = first {
        out[n] = I::from_index(first);
        n += 1;
    }
    n
}

pub(crate) fn write_table<I: IndexInt>(out: &mut [I], table: &[u8]) -> usize {
    for (dst, &src) in out.iter_mut().zip(table) {
        *dst = I::from_index(usize::from(src));
    }
    table.len()
}

#[inline]
pub(crate) fn ring_bridge_len(a: RingSpan, b: RingSpan) -> usize {
    3 * (a.len + b.len)
}

/// Triangulates the band between two closed rings.
///
/// The ring with fewer vertices is the "small" ring. Small vertex `i` owns the
/// contiguous arc of large-ring vertices `[⌊i·l/s⌋, ⌊(i+1)·l/s⌋]`: it fans
/// over every large edge inside that arc, then a patch triangle steps to the
/// next small vertex. Each edge of both rings is used by exactly one triangle,
/// giving `l + s` triangles. With equal counts every arc holds one edge and the
/// band is a sequence of quads split in two.
pub(crate) fn write_ring_bridge<I: IndexInt>(out: &mut [I], a: RingSpan, b: RingSpan) -> usize {
    let (small, large) = if a.len <= b.len { (a, b) } else { (b, a) };
    let (s, l) = (small.len, large.len);

    let mut n = 0;
    let mut tri = |x: usize, y: usize, z: usize| {
        out[n] = I::from_index(x);
        out[n + 1] = I::from_index(y);
        out[n + 2] = I::from_index(z);
        n += 3;
    };

    for i in 0..s {
        let arc_start = i * l / s;
        let arc_end = (i + 1) * l / s;
        for j in arc_start..arc_end {
            tri(small.at(i), large.at(j), large.at(j + 1));
        }
        tri(small.at(i), large.at(arc_end), small.at(i + 1));
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn undirected(a: usize, b: usize) -> (usize, usize) {
        if a < b { (a, b) } else { (b, a) }
    }

    /// Counts how many triangles use each ring edge.
    fn ring_edge_uses(indices: &[u32], ring: RingSpan) -> Vec<usize> {
        let mut uses: HashMap<(usize, usize), usize> = HashMap::new();
        for t in indices.chunks(3) {
            let t = [t[0] as usize, t[1] as usize, t[2] as usize];
            for (x, y) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                *uses.entry(undirected(x, y)).or_default() += 1;
            }
        }
        (0..ring.len)
            .map(|i| uses.get(&undirected(ring.at(i), ring.at(i + 1))).copied().unwrap_or(0))
            .collect()
    }

    #[test]
    fn fan_over_square() {
        let mut out = [0u32; 6];
        let n = write_fan(&mut out, 0..4);
        assert_eq!(n, fan_len(4));
        assert_eq!(out, [0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn line_strip_closes_on_first_index() {
        let mut out = [0u16; 5];
        let n = write_line_strip(&mut out, (0..8).step_by(2));
        assert_eq!(n, line_strip_len(4));
        assert_eq!(out, [0, 2, 4, 6, 0]);
    }

    #[test]
    fn equal_rings_bridge_as_split_quads() {
        let inner = RingSpan::new(0, 4);
        let outer = RingSpan::new(4, 4);
        let mut out = vec![0u32; ring_bridge_len(inner, outer)];
        let n = write_ring_bridge(&mut out, inner, outer);
        assert_eq!(n, 24);
        assert_eq!(&out[..6], &[0, 4, 5, 0, 5, 1]);
        assert!(out.iter().all(|&i| i < 8));
        assert!(ring_edge_uses(&out, inner).iter().all(|&u| u == 1));
        assert!(ring_edge_uses(&out, outer).iter().all(|&u| u == 1));
    }

    #[test]
    fn uneven_rings_use_every_edge_once() {
        for (s, l) in [(3, 7), (4, 12), (5, 6), (6, 16), (3, 64)] {
            for swapped in [false, true] {
                let (inner, outer) = if swapped {
                    (RingSpan::new(0, l), RingSpan::new(l, s))
                } else {
                    (RingSpan::new(0, s), RingSpan::new(s, l))
                };
                let mut out = vec![0u32; ring_bridge_len(inner, outer)];
                let n = write_ring_bridge(&mut out, inner, outer);
                assert_eq!(n, 3 * (s + l));
                assert!(out.iter().all(|&i| (i as usize) < s + l));
                assert!(ring_edge_uses(&out, inner).iter().all(|&u| u == 1), "{s}/{l}");
                assert!(ring_edge_uses(&out, outer).iter().all(|&u| u == 1), "{s}/{l}");
            }
        }
    }

    #[test]
    fn short_output_is_rejected() {
        assert_eq!(ensure_output(6, 5), Err(ShapeError::BufferTooSmall { required: 6, len: 5 }));
        assert!(ensure_output(6, 6).is_ok());
    }

    #[test]
    fn span_wraps_inside_its_ring() {
        let span = RingSpan::new(5, 3);
        assert_eq!(span.at(0), 5);
        assert_eq!(span.at(3), 5);
        assert_eq!(span.range(), 5..8);
    }
}
