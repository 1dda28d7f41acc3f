//! Continuity bookkeeping over a segment sequence.

use crate::error::{DraftError, DraftResult};
use crate::geometry::{same_point, Edge};
use crate::wire::Segment;
use std::ops::Range;

/// Split `shapes` into maximal runs where each segment starts where the
/// previous one ended. Computed fresh from the sequence every time.
pub fn chains(shapes: &[Segment], tol: f64) -> Vec<Range<usize>> {
    let mut out: Vec<Range<usize>> = Vec::new();
    let mut begin = 0;
    for i in 1..=shapes.len() {
        let breaks = i == shapes.len() || !same_point(&shapes[i - 1].end(), &shapes[i].start(), tol);
        if breaks {
            out.push(begin..i);
            begin = i;
        }
    }
    out
}

/// Order `edges` into one closed loop, flipping edges that run backwards.
///
/// Walks from the end of the first edge, each time taking an unused edge
/// touching the current point. Fails when the walk dead-ends, when it
/// returns to the start before every edge is used, or when it never does.
pub fn closed_loop(edges: &[Edge], tol: f64) -> DraftResult<Vec<Edge>> {
    let Some(first) = edges.first() else {
        return Err(DraftError::EmptyProfile);
    };

    let origin = first.start();
    let mut used = vec![false; edges.len()];
    used[0] = true;
    let mut ordered = vec![*first];
    let mut current = first.end();

    while ordered.len() < edges.len() {
        let next = edges.iter().enumerate().find_map(|(i, e)| {
            if used[i] {
                None
            } else if same_point(&e.start(), &current, tol) {
                Some((i, *e))
            } else if same_point(&e.end(), &current, tol) {
                Some((i, e.reversed()))
            } else {
                None
            }
        });
        let Some((i, edge)) = next else {
            return Err(DraftError::OpenProfile(format!(
                "dead end at ({:.4}, {:.4}, {:.4}) after {} of {} edges",
                current.x,
                current.y,
                current.z,
                ordered.len(),
                edges.len()
            )));
        };
        used[i] = true;
        current = edge.end();
        ordered.push(edge);
    }

    if !same_point(&current, &origin, tol) {
        return Err(DraftError::OpenProfile(format!(
            "gap of {:.6} between last and first edge",
            (current - origin).norm()
        )));
    }
    Ok(ordered)
}
