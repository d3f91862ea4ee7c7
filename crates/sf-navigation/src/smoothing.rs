//! Quadratic-Bezier path smoothing (back half of component C3).
//!
//! Takes a raw waypoint list — the agent's exact start position, the
//! A*-reconstructed cell centers, and the exact destination, in that order
//! — and rounds each interior corner with a short Bezier arc so the mover
//! doesn't visibly snap direction at cell boundaries.

use sf_core::Vec2;

/// Smooth `waypoints` (already prepended with the exact start and appended
/// with the exact destination by the caller) into the mover's consumable
/// path.
///
/// For each interior waypoint `B` (every entry except the first and last),
/// the corner is replaced by `segments_per_corner` samples of the quadratic
/// Bezier curve `(1-t)²·A + 2(1-t)t·B + t²·C`, where `A` is the midpoint of
/// `B` and its predecessor and `C` is the midpoint of `B` and its
/// successor. Consecutive corners share their connecting midpoint, so the
/// sampled arcs join without a gap.
///
/// With fewer than three waypoints there is no interior corner to smooth;
/// the input is returned unchanged.
pub fn smooth_path(waypoints: &[Vec2], segments_per_corner: u32) -> Vec<Vec2> {
    if waypoints.len() < 3 || segments_per_corner < 2 {
        return waypoints.to_vec();
    }

    let n = segments_per_corner;
    let mut result = Vec::with_capacity(waypoints.len() * n as usize);
    result.push(waypoints[0]);

    for i in 1..waypoints.len() - 1 {
        let prev = waypoints[i - 1];
        let b = waypoints[i];
        let next = waypoints[i + 1];
        let a = midpoint(prev, b);
        let c = midpoint(b, next);

        for j in 0..n {
            let t = j as f32 / (n - 1) as f32;
            result.push(quadratic_bezier(a, b, c, t));
        }
    }

    result.push(*waypoints.last().unwrap());
    result
}

#[inline]
fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

#[inline]
fn quadratic_bezier(a: Vec2, b: Vec2, c: Vec2, t: f32) -> Vec2 {
    let one_minus_t = 1.0 - t;
    a * (one_minus_t * one_minus_t) + b * (2.0 * one_minus_t * t) + c * (t * t)
}
