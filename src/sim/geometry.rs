//! Collision primitives shared by every entity
//!
//! Everything here is pure. Degenerate inputs (zero-length segments,
//! coincident points) collapse to point tests instead of dividing by zero.

use glam::Vec2;

/// Segments shorter than this are treated as a point
const DEGENERATE_LEN_SQ: f32 = 1e-4;

/// Euclidean distance between two points
#[inline]
pub fn distance(p: Vec2, q: Vec2) -> f32 {
    (p - q).length()
}

/// Strict overlap test between two circles
#[inline]
pub fn circles_overlap(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    distance(center_a, center_b) < radius_a + radius_b
}

/// Closest point on the segment `start..end` to `point`
///
/// Uses the clamped parametric projection; a zero-length segment returns `start`.
pub fn closest_point_on_segment(start: Vec2, end: Vec2, point: Vec2) -> Vec2 {
    let seg = end - start;
    let len_sq = seg.length_squared();
    if len_sq < DEGENERATE_LEN_SQ {
        return start;
    }
    let t = ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    start + seg * t
}

/// Check a thick segment (capsule of `radius`) against a circle
///
/// Used by slashes and beams: the segment is the blade/beam centerline and
/// `radius` its half-width.
pub fn segment_circle_overlap(
    seg_start: Vec2,
    seg_end: Vec2,
    radius: f32,
    circle_center: Vec2,
    circle_radius: f32,
) -> bool {
    let closest = closest_point_on_segment(seg_start, seg_end, circle_center);
    distance(closest, circle_center) < radius + circle_radius
}

/// Displacement that pushes `point` directly away from `from`
///
/// Returns zero when the points coincide.
pub fn push_away(from: Vec2, point: Vec2, strength: f32) -> Vec2 {
    (point - from).normalize_or_zero() * strength
}

/// Velocity of magnitude `speed` from `from` toward `to` (zero when coincident)
#[inline]
pub fn seek(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
        assert_eq!(distance(Vec2::ONE, Vec2::ONE), 0.0);
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        // Touching circles do not overlap
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.9, 0.0), 5.0));
    }

    #[test]
    fn test_segment_circle_middle() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(100.0, 0.0);
        // Circle just above the midpoint
        assert!(segment_circle_overlap(start, end, 5.0, Vec2::new(50.0, 12.0), 10.0));
        assert!(!segment_circle_overlap(start, end, 5.0, Vec2::new(50.0, 16.0), 10.0));
    }

    #[test]
    fn test_segment_circle_clamps_to_endpoints() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(100.0, 0.0);
        // Beyond the end, on the same line: distance measured to the endpoint
        assert!(segment_circle_overlap(start, end, 0.0, Vec2::new(105.0, 0.0), 6.0));
        assert!(!segment_circle_overlap(start, end, 0.0, Vec2::new(120.0, 0.0), 6.0));
        // Behind the start
        assert!(!segment_circle_overlap(start, end, 0.0, Vec2::new(-20.0, 0.0), 6.0));
    }

    #[test]
    fn test_segment_circle_degenerate_segment() {
        let p = Vec2::new(10.0, 10.0);
        assert!(segment_circle_overlap(p, p, 2.0, Vec2::new(14.0, 10.0), 3.0));
        assert!(!segment_circle_overlap(p, p, 2.0, Vec2::new(20.0, 10.0), 3.0));
        let closest = closest_point_on_segment(p, p, Vec2::new(50.0, -3.0));
        assert_eq!(closest, p);
    }

    #[test]
    fn test_push_away() {
        let push = push_away(Vec2::ZERO, Vec2::new(0.0, 5.0), 10.0);
        assert!((push - Vec2::new(0.0, 10.0)).length() < 1e-5);
        assert_eq!(push_away(Vec2::ONE, Vec2::ONE, 10.0), Vec2::ZERO);
    }

    #[test]
    fn test_seek_zero_when_arrived() {
        assert_eq!(seek(Vec2::ONE, Vec2::ONE, 3.0), Vec2::ZERO);
        let v = seek(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0);
        assert!((v - Vec2::new(2.0, 0.0)).length() < 1e-6);
    }
}
