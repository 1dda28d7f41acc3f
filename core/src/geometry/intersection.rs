//! Curve/curve intersections in the working plane.
//!
//! Lines and circles are intersected analytically through `utils_2d`.
//! Anything involving an ellipse falls back to sampled root finding on the
//! other curve's implicit form.

use super::utils_2d::{
    circle_circle_intersect, cross_2d, dot_2d, line_circle_intersect, line_line_intersect_unbounded, norm_2d,
    perpendicular_ccw, sub_2d,
};
use super::{Axis, Curve, Edge, Plane, Point3, Vector3};
use std::f64::consts::TAU;

/// A curve flattened into working-plane coordinates.
#[derive(Debug, Clone, Copy)]
pub enum Planar {
    Line { p: [f64; 2], d: [f64; 2] },
    Circle { c: [f64; 2], r: f64 },
    Ellipse { c: [f64; 2], x: [f64; 2], y: [f64; 2], rx: f64, ry: f64 },
}

impl Planar {
    pub fn from_curve(curve: &Curve, plane: &Plane) -> Self {
        match *curve {
            Curve::Line { origin, direction } => Planar::Line {
                p: plane.to_2d(&origin),
                d: plane.dir_to_2d(&direction),
            },
            Curve::Circle { center, radius, .. } => Planar::Circle { c: plane.to_2d(&center), r: radius },
            Curve::Ellipse { center, x_dir, normal, x_radius, y_radius } => {
                let x = plane.dir_to_2d(&x_dir);
                let y = if normal.dot(&plane.z_dir) >= 0.0 {
                    perpendicular_ccw(x)
                } else {
                    let p = perpendicular_ccw(x);
                    [-p[0], -p[1]]
                };
                Planar::Ellipse { c: plane.to_2d(&center), x, y, rx: x_radius, ry: y_radius }
            }
        }
    }

    pub fn line(axis: &Axis, plane: &Plane) -> Self {
        Planar::Line {
            p: plane.to_2d(&axis.origin),
            d: plane.dir_to_2d(&axis.direction),
        }
    }

    fn ellipse_point(c: [f64; 2], x: [f64; 2], y: [f64; 2], rx: f64, ry: f64, t: f64) -> [f64; 2] {
        let (s, co) = t.sin_cos();
        [
            c[0] + rx * co * x[0] + ry * s * y[0],
            c[1] + rx * co * x[1] + ry * s * y[1],
        ]
    }

    /// Zero on the curve, changing sign across it.
    fn implicit(&self, q: [f64; 2]) -> f64 {
        match *self {
            Planar::Line { p, d } => cross_2d(d, sub_2d(q, p)) / norm_2d(d),
            Planar::Circle { c, r } => norm_2d(sub_2d(q, c)) - r,
            Planar::Ellipse { c, x, y, rx, ry } => {
                let w = sub_2d(q, c);
                let u = dot_2d(w, x) / rx;
                let v = dot_2d(w, y) / ry;
                u * u + v * v - 1.0
            }
        }
    }
}

/// All intersection points of two unbounded planar curves.
pub fn planar_intersections(a: &Planar, b: &Planar) -> Vec<[f64; 2]> {
    match (*a, *b) {
        (Planar::Line { p: p1, d: d1 }, Planar::Line { p: p2, d: d2 }) => {
            line_line_intersect_unbounded(p1, d1, p2, d2).map(|(p, _, _)| vec![p]).unwrap_or_default()
        }
        (Planar::Line { p, d }, Planar::Circle { c, r }) | (Planar::Circle { c, r }, Planar::Line { p, d }) => {
            line_circle_intersect(p, d, c, r)
                .into_iter()
                .map(|t| [p[0] + t * d[0], p[1] + t * d[1]])
                .collect()
        }
        (Planar::Circle { c: c1, r: r1 }, Planar::Circle { c: c2, r: r2 }) => circle_circle_intersect(c1, r1, c2, r2),
        (Planar::Ellipse { c, x, y, rx, ry }, other) | (other, Planar::Ellipse { c, x, y, rx, ry }) => {
            ellipse_roots(&other, |t| Planar::ellipse_point(c, x, y, rx, ry, t))
        }
    }
}

fn ellipse_roots<F: Fn(f64) -> [f64; 2]>(other: &Planar, point: F) -> Vec<[f64; 2]> {
    const SAMPLES: usize = 720;
    let f = |t: f64| other.implicit(point(t));
    let mut roots = Vec::new();
    let mut t_prev = 0.0;
    let mut f_prev = f(t_prev);
    for i in 1..=SAMPLES {
        let t = TAU * i as f64 / SAMPLES as f64;
        let ft = f(t);
        if f_prev == 0.0 {
            roots.push(point(t_prev));
        } else if f_prev.signum() != ft.signum() && ft != 0.0 {
            let (mut lo, mut hi, mut flo) = (t_prev, t, f_prev);
            for _ in 0..60 {
                let mid = 0.5 * (lo + hi);
                let fm = f(mid);
                if fm.signum() == flo.signum() {
                    lo = mid;
                    flo = fm;
                } else {
                    hi = mid;
                }
            }
            roots.push(point(0.5 * (lo + hi)));
        }
        t_prev = t;
        f_prev = ft;
    }
    roots
}

/// Points where `edge` meets the unbounded curve `other`, both taken in `plane`.
pub fn edge_curve_intersections(edge: &Edge, other: &Planar, plane: &Plane, tol: f64) -> Vec<Point3> {
    let own = Planar::from_curve(&edge.curve, plane);
    planar_intersections(&own, other)
        .into_iter()
        .map(|p| plane.from_2d(p))
        .filter(|p| on_edge(edge, p, tol))
        .collect()
}

/// Whether `p` lies on the bounded edge within `tol`.
pub fn on_edge(edge: &Edge, p: &Point3, tol: f64) -> bool {
    let (t, dist) = edge.curve.project(p);
    dist <= tol && edge.wrap_param(t, tol).is_some()
}

/// Where the axis pierces the plane of `edge` and lands on it.
///
/// Only meaningful for axes not lying in the plane.
pub fn edge_axis_piercing(edge: &Edge, axis: &Axis, plane: &Plane, tol: f64) -> Option<Point3> {
    let p = axis.intersect_plane(plane)?;
    on_edge(edge, &p, tol).then_some(p)
}

/// Sort points by their position along `sort_by` and pick one with a
/// signed index (negative counts from the end).
pub fn select_sorted(mut points: Vec<Point3>, sort_by: &Axis, idx: isize) -> Option<Point3> {
    points.sort_by(|a, b| sort_by.param_of(a).total_cmp(&sort_by.param_of(b)));
    crate::signed_index(points.len(), idx).map(|i| points[i])
}

/// Drop points closer than `tol` to one already kept.
pub fn dedup_points(points: Vec<Point3>, tol: f64) -> Vec<Point3> {
    let mut out: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| super::same_point(q, &p, tol)) {
            out.push(p);
        }
    }
    out
}

/// Whether a direction lies in the plane.
pub fn is_in_plane(dir: &Vector3, plane: &Plane) -> bool {
    dir.normalize().dot(&plane.z_dir).abs() < 1e-9
}
