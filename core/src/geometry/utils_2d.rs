//! 2D geometry utilities for in-plane construction.
//!
//! Points and vectors are plain `[f64; 2]` arrays in working-plane
//! coordinates. Intersections here are unbounded: callers filter the
//! results against edge ranges.

use super::EPSILON;

// =============================================================================
// Vector Operations
// =============================================================================

#[inline]
pub fn sub_2d(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub fn add_scaled_2d(p: [f64; 2], v: [f64; 2], t: f64) -> [f64; 2] {
    [p[0] + t * v[0], p[1] + t * v[1]]
}

/// 2D cross product (z-component of 3D cross product).
/// Positive if v2 is counter-clockwise from v1.
#[inline]
pub fn cross_2d(v1: [f64; 2], v2: [f64; 2]) -> f64 {
    v1[0] * v2[1] - v1[1] * v2[0]
}

#[inline]
pub fn dot_2d(v1: [f64; 2], v2: [f64; 2]) -> f64 {
    v1[0] * v2[0] + v1[1] * v2[1]
}

#[inline]
pub fn norm_2d(v: [f64; 2]) -> f64 {
    dot_2d(v, v).sqrt()
}

/// Perpendicular vector (90° counter-clockwise rotation).
#[inline]
pub fn perpendicular_ccw(v: [f64; 2]) -> [f64; 2] {
    [-v[1], v[0]]
}

// =============================================================================
// Intersections
// =============================================================================

/// Intersection of two infinite lines given as point + direction.
///
/// Returns the point and the parameters along each direction, or `None`
/// when the lines are parallel.
pub fn line_line_intersect_unbounded(
    p1: [f64; 2], d1: [f64; 2],
    p2: [f64; 2], d2: [f64; 2],
) -> Option<([f64; 2], f64, f64)> {
    let denom = cross_2d(d1, d2);
    if denom.abs() < EPSILON * norm_2d(d1) * norm_2d(d2) {
        return None;
    }

    let w = sub_2d(p2, p1);
    let t = cross_2d(w, d2) / denom;
    let u = cross_2d(w, d1) / denom;

    Some((add_scaled_2d(p1, d1, t), t, u))
}

/// Intersections of an infinite line with a circle, as line parameters.
pub fn line_circle_intersect(
    p: [f64; 2], d: [f64; 2],
    center: [f64; 2], radius: f64,
) -> Vec<f64> {
    let f = sub_2d(p, center);

    let a = dot_2d(d, d);
    let b = 2.0 * dot_2d(f, d);
    let c = dot_2d(f, f) - radius * radius;

    if a < EPSILON * EPSILON {
        return vec![];
    }

    let discriminant = b * b - 4.0 * a * c;
    let scale = (radius * radius).max(1.0) * a;
    if discriminant < -EPSILON * scale {
        return vec![];
    }
    if discriminant.abs() <= EPSILON * scale {
        // Tangent: single point
        return vec![-b / (2.0 * a)];
    }

    let sqrt_disc = discriminant.sqrt();
    vec![(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
}

/// Intersections of two circles.
pub fn circle_circle_intersect(
    c1: [f64; 2], r1: f64,
    c2: [f64; 2], r2: f64,
) -> Vec<[f64; 2]> {
    let dx = c2[0] - c1[0];
    let dy = c2[1] - c1[1];
    let d = (dx * dx + dy * dy).sqrt();

    // No intersection: too far apart, one inside the other, or coincident
    if d > r1 + r2 + EPSILON || d < (r1 - r2).abs() - EPSILON || d < EPSILON {
        return vec![];
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h_sq = (r1 * r1 - a * a).max(0.0);

    let h = h_sq.sqrt();
    let px = c1[0] + a * dx / d;
    let py = c1[1] + a * dy / d;

    if h < EPSILON {
        return vec![[px, py]];
    }

    let ox = h * dy / d;
    let oy = h * dx / d;

    vec![
        [px + ox, py - oy],
        [px - ox, py + oy],
    ]
}
