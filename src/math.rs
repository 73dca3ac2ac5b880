//! Geometry kernel: segment/point queries shared by the stepper and the
//! track's erase operations.
//!
//! Everything here is total over finite inputs. Near-zero vectors and
//! degenerate segments fall back to safe defaults instead of producing NaN.

use glam::Vec2;

/// Shortest representable direction; below this a vector is treated as zero.
const MIN_LENGTH: f32 = 1e-9;

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Parametric position along a->b, clamped to [0, 1]
    pub t: f32,
    /// The closest point on the segment
    pub point: Vec2,
    /// Squared distance from the query point
    pub dist_sq: f32,
}

/// Unit vector in the direction of `v`, or +X when `v` is too short to
/// normalize
#[inline]
pub fn normalize_safe(v: Vec2) -> Vec2 {
    let len = v.length();
    if len <= MIN_LENGTH { Vec2::X } else { v / len }
}

/// Closest point on segment a->b to point `p`
///
/// Degenerate segments (a == b within epsilon) resolve to t = 0, i.e. the
/// endpoint `a`. Squared distance is returned so collision loops can compare
/// against a squared radius without a square root.
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> ClosestPoint {
    let ab = b - a;
    let denom = ab.length_squared();
    let t = if denom <= MIN_LENGTH {
        0.0
    } else {
        ((p - a).dot(ab) / denom).clamp(0.0, 1.0)
    };
    let point = a + ab * t;
    ClosestPoint {
        t,
        point,
        dist_sq: (p - point).length_squared(),
    }
}

/// Distance from point `p` to segment a->b
#[inline]
pub fn dist_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    closest_point_on_segment(p, a, b).dist_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_normalize_safe_regular() {
        let n = normalize_safe(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < EPS);
        assert!((n.x - 0.6).abs() < EPS);
        assert!((n.y - 0.8).abs() < EPS);
    }

    #[test]
    fn test_normalize_safe_zero_falls_back_to_x() {
        assert_eq!(normalize_safe(Vec2::ZERO), Vec2::X);
        assert_eq!(normalize_safe(Vec2::new(1e-12, -1e-12)), Vec2::X);
    }

    #[test]
    fn test_closest_point_interior() {
        // Horizontal segment, query point above its middle
        let c = closest_point_on_segment(
            Vec2::new(5.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert!((c.t - 0.5).abs() < EPS);
        assert!((c.point.x - 5.0).abs() < EPS);
        assert!(c.point.y.abs() < EPS);
        assert!((c.dist_sq - 9.0).abs() < EPS);
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        let before = closest_point_on_segment(Vec2::new(-4.0, 0.0), a, b);
        assert_eq!(before.t, 0.0);
        assert!((before.dist_sq - 16.0).abs() < EPS);

        let after = closest_point_on_segment(Vec2::new(13.0, 0.0), a, b);
        assert_eq!(after.t, 1.0);
        assert!((after.dist_sq - 9.0).abs() < EPS);
    }

    #[test]
    fn test_closest_point_degenerate_segment() {
        let a = Vec2::new(2.0, 2.0);
        let c = closest_point_on_segment(Vec2::new(5.0, 6.0), a, a);
        assert_eq!(c.t, 0.0);
        assert_eq!(c.point, a);
        assert!((c.dist_sq - 25.0).abs() < EPS);
    }

    #[test]
    fn test_dist_point_to_segment() {
        let d = dist_point_to_segment(
            Vec2::new(0.0, 5.0),
            Vec2::new(-10.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < EPS);
    }
}
