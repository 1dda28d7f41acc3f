//! Planar corner fillets and chamfers.
//!
//! A corner is the shared vertex of two consecutive oriented edges. Fillet
//! centers come from intersecting the two edges offset by the radius
//! towards the inside of the turn.

use crate::error::{DraftError, DraftResult};
use crate::geometry::intersection::{on_edge, planar_intersections, Planar};
use crate::geometry::{rotate_vector, same_point, signed_angle, Curve, Edge, Plane, Point3, Vector3, EPSILON};
use std::f64::consts::TAU;

/// Second leg of a chamfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChamferSide {
    /// Distance from the corner along the second edge.
    Length(f64),
    /// Angle in degrees between the first edge and the chamfer line.
    Angle(f64),
}

/// Edges replacing a corner: trimmed incoming edge, the new piece, trimmed
/// outgoing edge. Trimmed edges vanish when nothing of them is left.
pub type Corner = (Option<Edge>, Edge, Option<Edge>);

/// +1 for a left (counter-clockwise) turn about `normal`, -1 for a right one.
fn turn_sign(a: &Edge, b: &Edge, normal: &Vector3) -> DraftResult<f64> {
    let cross = a.end_tangent().cross(&b.start_tangent()).dot(normal);
    if cross.abs() < 1e-9 {
        return Err(DraftError::Geometry("edges meet tangentially, no corner to round".into()));
    }
    Ok(cross.signum())
}

/// The curve of `edge` shifted sideways by `distance`, positive to the left
/// of its traversal.
fn offset_curve(edge: &Edge, normal: &Vector3, distance: f64) -> DraftResult<Curve> {
    match edge.curve {
        Curve::Line { origin, direction } => {
            let t = if edge.reversed { -direction } else { direction };
            Ok(Curve::Line {
                origin: origin + normal.cross(&t) * distance,
                direction,
            })
        }
        Curve::Circle { center, x_dir, normal: cn, radius } => {
            let ccw = (cn.dot(normal) > 0.0) != edge.reversed;
            let radius = if ccw { radius - distance } else { radius + distance };
            if radius <= EPSILON {
                return Err(DraftError::Geometry("fillet radius exceeds arc radius".into()));
            }
            Ok(Curve::Circle { center, x_dir, normal: cn, radius })
        }
        Curve::Ellipse { .. } => Err(DraftError::Geometry("elliptical edges cannot be filleted".into())),
    }
}

/// Keep the part of `edge` before (`keep_head`) or after the native parameter `t`.
fn cut(edge: &Edge, t: f64, keep_head: bool, tol: f64) -> Option<Edge> {
    // "Head" is the traversal start; map it onto native bounds
    let piece = if keep_head != edge.reversed {
        edge.trimmed(edge.t0, t)
    } else {
        edge.trimmed(t, edge.t1)
    };
    (!piece.is_degenerate(tol)).then_some(piece)
}

fn foot_param(edge: &Edge, p: &Point3, tol: f64, what: &str) -> DraftResult<f64> {
    let (t, _) = edge.curve.project(p);
    edge.wrap_param(t, tol.max(EPSILON))
        .ok_or_else(|| DraftError::Geometry(format!("{what} does not fit on the adjacent edge")))
}

/// Round the corner where `a` ends and `b` starts with an arc of `radius`.
pub fn fillet_corner(a: &Edge, b: &Edge, radius: f64, normal: &Vector3, tol: f64) -> DraftResult<Corner> {
    if radius <= 0.0 {
        return Err(DraftError::Geometry(format!("fillet radius must be positive, got {radius}")));
    }
    let vertex = a.end();
    let s = turn_sign(a, b, normal)?;
    let plane = Plane::from_normal(vertex, *normal);

    let oa = Planar::from_curve(&offset_curve(a, normal, s * radius)?, &plane);
    let ob = Planar::from_curve(&offset_curve(b, normal, s * radius)?, &plane);
    let center = planar_intersections(&oa, &ob)
        .into_iter()
        .map(|p| plane.from_2d(p))
        .min_by(|p, q| (p - vertex).norm_squared().total_cmp(&(q - vertex).norm_squared()))
        .ok_or_else(|| DraftError::Geometry("no fillet center for this corner".into()))?;

    let ta = foot_param(a, &center, tol, "fillet")?;
    let tb = foot_param(b, &center, tol, "fillet")?;
    let foot_a = a.curve.point(ta);
    let foot_b = b.curve.point(tb);

    let arc_normal = normal * s;
    let sweep = signed_angle(&(foot_a - center), &(foot_b - center), &arc_normal).rem_euclid(TAU);
    let arc = Edge::arc(center, foot_a, arc_normal, sweep);

    Ok((cut(a, ta, true, tol), arc, cut(b, tb, false, tol)))
}

/// Cut the corner where `a` ends and `b` starts with a straight line.
pub fn chamfer_corner(a: &Edge, b: &Edge, length: f64, side: ChamferSide, normal: &Vector3, tol: f64) -> DraftResult<Corner> {
    if length <= 0.0 {
        return Err(DraftError::Geometry(format!("chamfer length must be positive, got {length}")));
    }
    let len_a = a.length();
    if length > len_a + tol {
        return Err(DraftError::Geometry("chamfer does not fit on the incoming edge".into()));
    }
    let foot_a = a.point_at((len_a - length).max(0.0));

    let foot_b = match side {
        ChamferSide::Length(d) => {
            if d <= 0.0 || d > b.length() + tol {
                return Err(DraftError::Geometry("chamfer does not fit on the outgoing edge".into()));
            }
            b.point_at(d)
        }
        ChamferSide::Angle(deg) => {
            let s = turn_sign(a, b, normal)?;
            let dir = rotate_vector(&a.end_tangent(), normal, s * deg);
            let plane = Plane::from_normal(foot_a, *normal);
            let ray = Planar::Line { p: plane.to_2d(&foot_a), d: plane.dir_to_2d(&dir) };
            let own = Planar::from_curve(&b.curve, &plane);
            planar_intersections(&ray, &own)
                .into_iter()
                .map(|p| plane.from_2d(p))
                .filter(|p| (p - foot_a).dot(&dir) > tol && on_edge(b, p, tol.max(EPSILON)))
                .min_by(|p, q| (p - foot_a).norm_squared().total_cmp(&(q - foot_a).norm_squared()))
                .ok_or_else(|| DraftError::Geometry("chamfer line misses the outgoing edge".into()))?
        }
    };

    let ta = foot_param(a, &foot_a, tol, "chamfer")?;
    let tb = foot_param(b, &foot_b, tol, "chamfer")?;
    Ok((cut(a, ta, true, tol), Edge::line(foot_a, foot_b), cut(b, tb, false, tol)))
}

/// Apply `corner` at every joint of the chain `edges` whose vertex is one of `at`.
fn process_corners<F>(edges: &[Edge], at: &[Point3], tol: f64, mut corner: F) -> DraftResult<Vec<Edge>>
where
    F: FnMut(&Edge, &Edge) -> DraftResult<Corner>,
{
    let Some((first, rest)) = edges.split_first() else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(edges.len() + at.len());
    let mut current = Some(*first);
    let mut touched = 0usize;

    for (i, next) in rest.iter().enumerate() {
        let Some(cur) = current else {
            return Err(DraftError::Geometry("corner consumes an entire edge".into()));
        };
        let vertex = cur.end();
        let selected = same_point(&vertex, &next.start(), tol) && at.iter().any(|p| same_point(p, &vertex, tol));
        if !selected {
            out.push(cur);
            current = Some(*next);
            continue;
        }
        let (head, piece, tail) = corner(&cur, next)?;
        touched += 1;
        out.extend(head);
        out.push(piece);
        current = tail;
        if current.is_none() && i + 1 < rest.len() {
            return Err(DraftError::Geometry("corner consumes an entire edge".into()));
        }
    }
    out.extend(current);

    if touched == 0 {
        return Err(DraftError::NotFound("no matching vertex to modify".into()));
    }
    Ok(out)
}

/// Fillet the vertices of a connected chain that match `at` within `tol`.
pub fn fillet_vertices(edges: &[Edge], at: &[Point3], radius: f64, normal: &Vector3, tol: f64) -> DraftResult<Vec<Edge>> {
    process_corners(edges, at, tol, |a, b| fillet_corner(a, b, radius, normal, tol))
}

/// Chamfer the vertices of a connected chain that match `at` within `tol`.
pub fn chamfer_vertices(
    edges: &[Edge],
    at: &[Point3],
    length: f64,
    side: ChamferSide,
    normal: &Vector3,
    tol: f64,
) -> DraftResult<Vec<Edge>> {
    process_corners(edges, at, tol, |a, b| chamfer_corner(a, b, length, side, normal, tol))
}
