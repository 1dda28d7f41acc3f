//! Infinite oriented lines.

use super::{rotate_vector, Plane, Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};

/// A point plus a unit direction.
///
/// Axes handed to the line builder are plane-local: `located` places them
/// in the working plane before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Axis {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn x() -> Self {
        Self::new(Point3::origin(), Vector3::x())
    }

    pub fn y() -> Self {
        Self::new(Point3::origin(), Vector3::y())
    }

    pub fn z() -> Self {
        Self::new(Point3::origin(), Vector3::z())
    }

    /// Axis through `start` towards `end`.
    pub fn through(start: Point3, end: Point3) -> Self {
        Self::new(start, end - start)
    }

    /// Same direction, origin shifted by `(dx, dy, dz)`.
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            origin: self.origin + Vector3::new(dx, dy, dz),
            ..*self
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
        }
    }

    /// Treat this axis as plane-local and express it globally.
    pub fn located(&self, plane: &Plane) -> Self {
        Self {
            origin: plane.to_global(&self.origin.coords),
            direction: plane.dir_to_global(&self.direction),
        }
    }

    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Signed position of the projection of `p` along the axis.
    pub fn param_of(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(&self.direction)
    }

    pub fn distance_to(&self, p: &Point3) -> f64 {
        let d = p - self.origin;
        (d - self.direction * d.dot(&self.direction)).norm()
    }

    pub fn intersect_plane(&self, plane: &Plane) -> Option<Point3> {
        plane.intersect_line(&self.origin, &self.direction)
    }

    /// Crossing point of two coplanar, non-parallel axes.
    pub fn intersect_axis(&self, other: &Axis, tol: f64) -> Option<Point3> {
        let n = self.direction.cross(&other.direction);
        let n2 = n.norm_squared();
        if n2 < EPSILON * EPSILON {
            return None;
        }
        let w = other.origin - self.origin;
        let t = w.cross(&other.direction).dot(&n) / n2;
        let s = w.cross(&self.direction).dot(&n) / n2;
        let p = self.point_at(t);
        let q = other.point_at(s);
        if (p - q).norm() > tol.max(EPSILON) {
            return None;
        }
        Some(p)
    }

    /// Plane containing this (global) axis and perpendicular to `plane`.
    pub fn normal_plane(&self, plane: &Plane) -> Plane {
        let n = rotate_vector(&self.direction, &plane.z_dir, 90.0);
        Plane::from_normal(self.origin, n)
    }
}
