//! Arc-length parametrisation over a segment.
//!
//! Positions run from 0 at the segment's start to 1 at its end, following
//! the traversal: whole-segment reversal and per-edge reversal both count.

use super::Segment;
use crate::error::{DraftError, DraftResult};
use crate::geometry::{Point3, EPSILON};

/// Normalized arc-length position of the point of `seg` closest to `point`.
///
/// Every edge's underlying curve is projected onto; a projection only
/// counts when it falls inside that edge's range. The closest valid
/// projection wins, earlier edges winning ties. `None` when no edge's
/// range contains a projection.
pub fn param_on_point(seg: &Segment, point: &Point3) -> Option<f64> {
    let total = seg.length();
    if total <= 0.0 {
        return None;
    }
    param_on_point_abs(seg, point).map(|u| u / total)
}

/// Like [`param_on_point`] but returns the absolute arc length.
pub fn param_on_point_abs(seg: &Segment, point: &Point3) -> Option<f64> {
    let mut acc = 0.0;
    let mut best: Option<(f64, f64)> = None;
    for edge in seg.oriented_edges() {
        let len = edge.length();
        let (t, dist) = edge.curve.project(point);
        if let Some(t) = edge.wrap_param(t, EPSILON) {
            let from_native = edge.native_length_to(t);
            let along = if edge.reversed { len - from_native } else { from_native };
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, acc + along));
            }
        }
        acc += len;
    }
    best.map(|(_, u)| u)
}

/// Restrict `seg` to the normalized range `[start, end]`.
///
/// Edges wholly outside the range are dropped, edges wholly inside are
/// kept as they are and the rest are cut at the matching arc length. The
/// result keeps the input's reversal flag and storage order.
pub fn trim_wire(seg: &Segment, start: f64, end: f64) -> DraftResult<Segment> {
    let total = seg.length();
    let cut_start = start * total;
    let cut_end = end * total;

    let mut edges = Vec::new();
    let mut u2 = 0.0;
    for edge in seg.oriented_edges() {
        let len = edge.length();
        let u1 = u2;
        u2 = u1 + len;
        if u2 < cut_start || u1 > cut_end {
            continue;
        }

        // Range kept, measured from the edge's traversal start
        let a = (cut_start - u1).max(0.0);
        let b = (cut_end - u1).min(len);
        if b - a <= EPSILON {
            continue;
        }
        if a <= EPSILON && b >= len - EPSILON {
            edges.push(edge);
            continue;
        }

        // Same range measured from the native start
        let (na, nb) = if edge.reversed { (len - b, len - a) } else { (a, b) };
        let t_a = edge.curve.param_at_length(edge.t0, na);
        let t_b = edge.curve.param_at_length(edge.t0, nb);
        edges.push(edge.trimmed(t_a, t_b));
    }

    if edges.is_empty() {
        return Err(DraftError::DegenerateTrim);
    }

    if seg.reversed {
        edges = edges.iter().rev().map(|e| e.reversed()).collect();
    }

    Ok(Segment {
        edges,
        reversed: seg.reversed,
        name: seg.name.clone(),
    })
}
