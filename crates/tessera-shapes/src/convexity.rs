//! Turning-angle convexity analysis.

use std::f64::consts::{PI, TAU};

use crate::coords::Vec2;

/// Returns true when the closed ring `points` is a strictly convex polygon.
///
/// Walks the ring and measures the signed turn at each vertex as
/// `atan2(cross, dot)` of the incoming and outgoing edges, normalized into
/// `(-π, π]`. The ring is rejected when:
/// - it has fewer than 3 vertices,
/// - two consecutive vertices coincide,
/// - a turn is zero or disagrees in sign with the first turn,
/// - the turns do not sum to exactly one winding (`round(sum / 2π)` is not ±1).
///
/// The last rule rejects self-intersecting "star" rings whose turns all share
/// a sign but wind more than once.
pub fn is_convex_ring(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut orientation = 0.0f64;
    let mut sum = 0.0f64;

    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];

        let incoming = edge(prev, cur);
        let outgoing = edge(cur, next);
        if outgoing == (0.0, 0.0) {
            return false;
        }

        let cross = incoming.0 * outgoing.1 - incoming.1 * outgoing.0;
        let dot = incoming.0 * outgoing.0 + incoming.1 * outgoing.1;
        let mut turn = cross.atan2(dot);
        if turn <= -PI {
            turn += TAU;
        }

        if turn == 0.0 {
            return false;
        }
        if orientation == 0.0 {
            orientation = turn.signum();
        } else if turn.signum() != orientation {
            return false;
        }
        sum += turn;
    }

    (sum / TAU).round().abs() == 1.0
}

#[inline]
fn edge(from: Vec2, to: Vec2) -> (f64, f64) {
    (f64::from(to.x) - f64::from(from.x), f64::from(to.y) - f64::from(from.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f32, f32)]) -> Vec<Vec2> {
        points.iter().copied().map(Vec2::from).collect()
    }

    #[test]
    fn square_is_convex_in_both_windings() {
        let cw = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut ccw = cw.clone();
        ccw.reverse();
        assert!(is_convex_ring(&cw));
        assert!(is_convex_ring(&ccw));
    }

    #[test]
    fn triangle_is_convex() {
        assert!(is_convex_ring(&ring(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)])));
    }

    #[test]
    fn dented_quad_is_not_convex() {
        let arrow = ring(&[(0.0, 0.0), (4.0, 0.0), (1.0, 1.0), (0.0, 4.0)]);
        assert!(!is_convex_ring(&arrow));
    }

    #[test]
    fn repeated_vertex_is_not_convex() {
        let dup = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(!is_convex_ring(&dup));
    }

    #[test]
    fn collinear_vertex_is_not_convex() {
        let flat = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        assert!(!is_convex_ring(&flat));
    }

    #[test]
    fn pentagram_winds_twice() {
        // Every turn has the same sign but the ring winds around twice.
        let star: Vec<Vec2> = (0..5)
            .map(|i| Vec2::from_angle(i as f32 * 4.0 * core::f32::consts::PI / 5.0) * 10.0)
            .collect();
        assert!(!is_convex_ring(&star));
    }

    #[test]
    fn too_few_points() {
        assert!(!is_convex_ring(&ring(&[(0.0, 0.0), (1.0, 0.0)])));
    }

    #[test]
    fn analysis_is_idempotent() {
        let hex: Vec<Vec2> = (0..6)
            .map(|i| Vec2::from_angle(i as f32 * core::f32::consts::TAU / 6.0) * 3.0)
            .collect();
        assert_eq!(is_convex_ring(&hex), is_convex_ring(&hex));
        assert!(is_convex_ring(&hex));
    }
}
