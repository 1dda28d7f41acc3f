//! Parametrised curves and the bounded, oriented edges cut from them.
//!
//! Lines are parametrised by distance from their origin. Circles and
//! ellipses are parametrised by angle in radians, measured from `x_dir`
//! towards `normal × x_dir`.

use super::{integrate, Plane, Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, TAU};

/// An unbounded curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Curve {
    Line {
        origin: Point3,
        direction: Vector3,
    },
    Circle {
        center: Point3,
        x_dir: Vector3,
        normal: Vector3,
        radius: f64,
    },
    Ellipse {
        center: Point3,
        x_dir: Vector3,
        normal: Vector3,
        x_radius: f64,
        y_radius: f64,
    },
}

impl Curve {
    pub fn is_periodic(&self) -> bool {
        !matches!(self, Curve::Line { .. })
    }

    pub fn center(&self) -> Option<Point3> {
        match self {
            Curve::Line { .. } => None,
            Curve::Circle { center, .. } | Curve::Ellipse { center, .. } => Some(*center),
        }
    }

    pub fn point(&self, t: f64) -> Point3 {
        match *self {
            Curve::Line { origin, direction } => origin + direction * t,
            Curve::Circle { center, x_dir, normal, radius } => {
                let y_dir = normal.cross(&x_dir);
                center + (x_dir * t.cos() + y_dir * t.sin()) * radius
            }
            Curve::Ellipse { center, x_dir, normal, x_radius, y_radius } => {
                let y_dir = normal.cross(&x_dir);
                center + x_dir * (x_radius * t.cos()) + y_dir * (y_radius * t.sin())
            }
        }
    }

    pub fn derivative(&self, t: f64) -> Vector3 {
        match *self {
            Curve::Line { direction, .. } => direction,
            Curve::Circle { x_dir, normal, radius, .. } => {
                let y_dir = normal.cross(&x_dir);
                (y_dir * t.cos() - x_dir * t.sin()) * radius
            }
            Curve::Ellipse { x_dir, normal, x_radius, y_radius, .. } => {
                let y_dir = normal.cross(&x_dir);
                y_dir * (y_radius * t.cos()) - x_dir * (x_radius * t.sin())
            }
        }
    }

    fn second_derivative(&self, t: f64) -> Vector3 {
        match self {
            Curve::Line { .. } => Vector3::zeros(),
            Curve::Circle { center, .. } | Curve::Ellipse { center, .. } => *center - self.point(t),
        }
    }

    /// Arc length between two parameters, `a <= b`.
    pub fn length_between(&self, a: f64, b: f64) -> f64 {
        match *self {
            Curve::Line { .. } => b - a,
            Curve::Circle { radius, .. } => radius * (b - a),
            Curve::Ellipse { .. } => {
                let pieces = ((b - a).abs() / FRAC_PI_4).ceil() as usize;
                integrate(|t| self.derivative(t).norm(), a, b, pieces)
            }
        }
    }

    /// Parameter reached after travelling `length` forward from `t0`.
    pub fn param_at_length(&self, t0: f64, length: f64) -> f64 {
        match *self {
            Curve::Line { .. } => t0 + length,
            Curve::Circle { radius, .. } => t0 + length / radius,
            Curve::Ellipse { x_radius, y_radius, .. } => {
                let mut t = t0 + length / (0.5 * (x_radius + y_radius));
                for _ in 0..32 {
                    let err = self.length_between(t0, t) - length;
                    if err.abs() < 1e-12 {
                        break;
                    }
                    let speed = self.derivative(t).norm().max(EPSILON);
                    t -= err / speed;
                }
                t
            }
        }
    }

    /// Closest parameter on the unbounded curve and its distance to `p`.
    pub fn project(&self, p: &Point3) -> (f64, f64) {
        match *self {
            Curve::Line { origin, direction } => {
                let t = (p - origin).dot(&direction);
                (t, (self.point(t) - p).norm())
            }
            Curve::Circle { center, x_dir, normal, .. } => {
                let d = p - center;
                let y_dir = normal.cross(&x_dir);
                let (x, y) = (d.dot(&x_dir), d.dot(&y_dir));
                let t = if x.abs() < EPSILON && y.abs() < EPSILON { 0.0 } else { y.atan2(x) };
                (t, (self.point(t) - p).norm())
            }
            Curve::Ellipse { .. } => {
                const SAMPLES: usize = 72;
                let mut best = 0.0;
                let mut best_d = f64::INFINITY;
                for i in 0..SAMPLES {
                    let t = TAU * i as f64 / SAMPLES as f64;
                    let d = (self.point(t) - p).norm_squared();
                    if d < best_d {
                        best_d = d;
                        best = t;
                    }
                }
                let mut t = best;
                for _ in 0..16 {
                    let r = self.point(t) - p;
                    let d1 = self.derivative(t);
                    let g = r.dot(&d1);
                    let dg = d1.dot(&d1) + r.dot(&self.second_derivative(t));
                    if dg.abs() < EPSILON {
                        break;
                    }
                    let step = g / dg;
                    t -= step;
                    if step.abs() < 1e-14 {
                        break;
                    }
                }
                (t, (self.point(t) - p).norm())
            }
        }
    }

    pub fn translated(&self, delta: &Vector3) -> Self {
        let mut c = *self;
        match &mut c {
            Curve::Line { origin, .. } => *origin += *delta,
            Curve::Circle { center, .. } | Curve::Ellipse { center, .. } => *center += *delta,
        }
        c
    }

    /// Re-express a curve given in the frame `from` in the frame `to`.
    pub fn relocated(&self, from: &Plane, to: &Plane) -> Self {
        let pt = |p: &Point3| from.relocate_point(p, to);
        let v = |d: &Vector3| from.relocate_vector(d, to);
        match *self {
            Curve::Line { origin, direction } => Curve::Line { origin: pt(&origin), direction: v(&direction) },
            Curve::Circle { center, x_dir, normal, radius } => Curve::Circle {
                center: pt(&center),
                x_dir: v(&x_dir),
                normal: v(&normal),
                radius,
            },
            Curve::Ellipse { center, x_dir, normal, x_radius, y_radius } => Curve::Ellipse {
                center: pt(&center),
                x_dir: v(&x_dir),
                normal: v(&normal),
                x_radius,
                y_radius,
            },
        }
    }

    /// Reflection across `plane`, keeping the parametrisation so that
    /// `mirrored.point(t) == plane.mirror_point(self.point(t))`.
    pub fn mirrored(&self, plane: &Plane) -> Self {
        match *self {
            Curve::Line { origin, direction } => Curve::Line {
                origin: plane.mirror_point(&origin),
                direction: plane.mirror_vector(&direction),
            },
            Curve::Circle { center, x_dir, normal, radius } => Curve::Circle {
                center: plane.mirror_point(&center),
                x_dir: plane.mirror_vector(&x_dir),
                normal: -plane.mirror_vector(&normal),
                radius,
            },
            Curve::Ellipse { center, x_dir, normal, x_radius, y_radius } => Curve::Ellipse {
                center: plane.mirror_point(&center),
                x_dir: plane.mirror_vector(&x_dir),
                normal: -plane.mirror_vector(&normal),
                x_radius,
                y_radius,
            },
        }
    }
}

/// A bounded piece `[t0, t1]` of a curve, traversed backwards when `reversed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub curve: Curve,
    pub t0: f64,
    pub t1: f64,
    #[serde(default)]
    pub reversed: bool,
}

impl Edge {
    pub fn new(curve: Curve, t0: f64, t1: f64) -> Self {
        Self { curve, t0, t1, reversed: false }
    }

    /// Straight edge from `a` to `b`.
    pub fn line(a: Point3, b: Point3) -> Self {
        let d = b - a;
        let len = d.norm();
        let direction = if len < EPSILON { Vector3::x() } else { d / len };
        Self::new(Curve::Line { origin: a, direction }, 0.0, len)
    }

    /// Circular arc starting at `start`, turning about `normal` by `sweep` radians.
    pub fn arc(center: Point3, start: Point3, normal: Vector3, sweep: f64) -> Self {
        let r = start - center;
        let radius = r.norm();
        Self::new(
            Curve::Circle { center, x_dir: r / radius, normal: normal.normalize(), radius },
            0.0,
            sweep,
        )
    }

    /// Arc through three points, running from `a` via `m` to `b`.
    pub fn three_point_arc(a: Point3, m: Point3, b: Point3) -> Option<Self> {
        let ab = b - a;
        let am = m - a;
        let n = am.cross(&ab);
        let n2 = n.norm_squared();
        if n2 < EPSILON * EPSILON {
            return None;
        }
        let center = a + (n.cross(&am) * ab.norm_squared() + ab.cross(&n) * am.norm_squared()) / (2.0 * n2);
        let normal = n / n2.sqrt();
        let sweep = super::signed_angle(&(a - center), &(b - center), &normal).rem_euclid(TAU);
        Some(Self::arc(center, a, normal, sweep))
    }

    /// Arc leaving `start` along `tangent` and ending at `end`, bending within
    /// the plane whose normal is `plane_normal`.
    pub fn tangent_arc(start: Point3, tangent: &Vector3, end: Point3, plane_normal: &Vector3) -> Option<Self> {
        let t = tangent.normalize();
        let left = plane_normal.normalize().cross(&t);
        let chord = end - start;
        let d = chord.dot(&left);
        if d.abs() < EPSILON {
            return None;
        }
        let signed_radius = chord.norm_squared() / (2.0 * d);
        let center = start + left * signed_radius;
        let normal = if d > 0.0 { *plane_normal } else { -plane_normal };
        let sweep = super::signed_angle(&(start - center), &(end - center), &normal).rem_euclid(TAU);
        Some(Self::arc(center, start, normal, sweep))
    }

    /// Elliptical arc centered on the plane origin, `x_radius` along the
    /// plane X axis, between two angles in degrees (counter-clockwise).
    pub fn ellipse_arc(plane: &Plane, x_radius: f64, y_radius: f64, start_deg: f64, end_deg: f64) -> Self {
        let mut end = end_deg;
        if end <= start_deg {
            end += 360.0;
        }
        Self::new(
            Curve::Ellipse {
                center: plane.origin,
                x_dir: plane.x_dir,
                normal: plane.z_dir,
                x_radius,
                y_radius,
            },
            start_deg.to_radians(),
            end.to_radians(),
        )
    }

    pub fn native_start(&self) -> Point3 {
        self.curve.point(self.t0)
    }

    pub fn native_end(&self) -> Point3 {
        self.curve.point(self.t1)
    }

    pub fn start(&self) -> Point3 {
        if self.reversed { self.native_end() } else { self.native_start() }
    }

    pub fn end(&self) -> Point3 {
        if self.reversed { self.native_start() } else { self.native_end() }
    }

    pub fn length(&self) -> f64 {
        self.curve.length_between(self.t0, self.t1)
    }

    pub fn is_degenerate(&self, tol: f64) -> bool {
        self.length() <= tol
    }

    /// Native parameter at arc length `s` measured from the oriented start.
    pub fn param_at(&self, s: f64) -> f64 {
        if self.reversed {
            self.curve.param_at_length(self.t0, self.length() - s)
        } else {
            self.curve.param_at_length(self.t0, s)
        }
    }

    pub fn point_at(&self, s: f64) -> Point3 {
        self.curve.point(self.param_at(s))
    }

    /// Unit tangent in traversal direction at arc length `s`.
    pub fn tangent_at(&self, s: f64) -> Vector3 {
        let d = self.curve.derivative(self.param_at(s)).normalize();
        if self.reversed { -d } else { d }
    }

    pub fn start_tangent(&self) -> Vector3 {
        let t = if self.reversed { self.t1 } else { self.t0 };
        let d = self.curve.derivative(t).normalize();
        if self.reversed { -d } else { d }
    }

    pub fn end_tangent(&self) -> Vector3 {
        let t = if self.reversed { self.t0 } else { self.t1 };
        let d = self.curve.derivative(t).normalize();
        if self.reversed { -d } else { d }
    }

    /// Map a curve parameter into this edge's range, `None` when outside.
    ///
    /// Periodic parameters are wrapped; `tol` is an arc-length tolerance.
    pub fn wrap_param(&self, t: f64, tol: f64) -> Option<f64> {
        let ptol = match self.curve {
            Curve::Line { .. } => tol,
            Curve::Circle { radius, .. } => tol / radius,
            Curve::Ellipse { x_radius, y_radius, .. } => tol / x_radius.min(y_radius),
        };
        if !self.curve.is_periodic() {
            return (t >= self.t0 - ptol && t <= self.t1 + ptol).then(|| t.clamp(self.t0, self.t1));
        }
        let k = self.t0 + (t - self.t0).rem_euclid(TAU);
        if k <= self.t1 + ptol {
            Some(k.min(self.t1))
        } else if k - TAU >= self.t0 - ptol {
            Some(self.t0)
        } else {
            None
        }
    }

    /// Arc length from the native start to parameter `t`.
    pub fn native_length_to(&self, t: f64) -> f64 {
        self.curve.length_between(self.t0, t)
    }

    pub fn arc_center(&self) -> Option<Point3> {
        match self.curve {
            Curve::Circle { center, .. } => Some(center),
            _ => None,
        }
    }

    /// Same curve restricted to the native range `[a, b]`.
    pub fn trimmed(&self, a: f64, b: f64) -> Self {
        Self { t0: a, t1: b, ..*self }
    }

    pub fn reversed(&self) -> Self {
        Self { reversed: !self.reversed, ..*self }
    }

    pub fn translated(&self, delta: &Vector3) -> Self {
        Self { curve: self.curve.translated(delta), ..*self }
    }

    pub fn mirrored(&self, plane: &Plane) -> Self {
        Self { curve: self.curve.mirrored(plane), ..*self }
    }

    pub fn relocated(&self, from: &Plane, to: &Plane) -> Self {
        Self { curve: self.curve.relocated(from, to), ..*self }
    }
}
