//! Oriented working planes.

use super::{Point3, Vector3, EPSILON};
use crate::error::DraftError;
use serde::{Deserialize, Serialize};

/// An oriented 2D frame embedded in 3D space.
///
/// `x_dir` and `z_dir` are kept unit length and orthogonal; `y_dir` is
/// always derived as `z_dir × x_dir`, so the frame is right-handed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlane")]
pub struct Plane {
    pub origin: Point3,
    pub x_dir: Vector3,
    pub z_dir: Vector3,
}

/// Plane as written in a plan, normalised on the way in.
#[derive(Deserialize)]
struct RawPlane {
    origin: Point3,
    x_dir: Vector3,
    z_dir: Vector3,
}

impl TryFrom<RawPlane> for Plane {
    type Error = DraftError;

    fn try_from(raw: RawPlane) -> Result<Self, DraftError> {
        let finite = |v: &Vector3| v.iter().all(|c| c.is_finite());
        if !raw.origin.coords.iter().all(|c| c.is_finite()) || !finite(&raw.x_dir) || !finite(&raw.z_dir) {
            return Err(DraftError::invalid("plane", "coordinates must be finite"));
        }
        if raw.z_dir.norm() < EPSILON {
            return Err(DraftError::invalid("plane", "zero normal"));
        }
        if raw.x_dir.cross(&raw.z_dir).norm() < EPSILON * raw.x_dir.norm().max(1.0) {
            return Err(DraftError::invalid("plane", "x_dir must not be parallel to the normal"));
        }
        Ok(Plane::new(raw.origin, raw.x_dir, raw.z_dir))
    }
}

impl Plane {
    /// Build a plane from an origin, an in-plane X direction and a normal.
    ///
    /// The X direction is re-orthogonalised against the normal.
    pub fn new(origin: Point3, x_dir: Vector3, z_dir: Vector3) -> Self {
        let z = z_dir.normalize();
        let x = (x_dir - z * x_dir.dot(&z)).normalize();
        Self { origin, x_dir: x, z_dir: z }
    }

    /// Build a plane from a normal only, choosing the X direction with the
    /// usual OCCT rule (zero the smallest normal component and swap the rest).
    pub fn from_normal(origin: Point3, normal: Vector3) -> Self {
        let z = normal.normalize();
        let (a, b, c) = (z.x, z.y, z.z);
        let (aa, ba, ca) = (a.abs(), b.abs(), c.abs());
        let x = if ba <= aa && ba <= ca {
            if aa > ca {
                Vector3::new(-c, 0.0, a)
            } else {
                Vector3::new(c, 0.0, -a)
            }
        } else if aa <= ba && aa <= ca {
            if ba > ca {
                Vector3::new(0.0, -c, b)
            } else {
                Vector3::new(0.0, c, -b)
            }
        } else if aa > ba {
            Vector3::new(-b, a, 0.0)
        } else {
            Vector3::new(b, -a, 0.0)
        };
        Self::new(origin, x, z)
    }

    pub fn xy() -> Self {
        Self::new(Point3::origin(), Vector3::x(), Vector3::z())
    }

    pub fn yz() -> Self {
        Self::new(Point3::origin(), Vector3::y(), Vector3::x())
    }

    pub fn zx() -> Self {
        Self::new(Point3::origin(), Vector3::z(), Vector3::y())
    }

    /// Front view plane: X to the right, Y up along global Z, normal -Y.
    pub fn xz() -> Self {
        Self::new(Point3::origin(), Vector3::x(), -Vector3::y())
    }

    pub fn yx() -> Self {
        Self::new(Point3::origin(), Vector3::y(), -Vector3::z())
    }

    pub fn zy() -> Self {
        Self::new(Point3::origin(), Vector3::z(), -Vector3::x())
    }

    pub fn y_dir(&self) -> Vector3 {
        self.z_dir.cross(&self.x_dir)
    }

    /// Shift the plane along its normal.
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.z_dir * distance,
            ..*self
        }
    }

    /// Move the plane origin by a global vector.
    pub fn translated(&self, delta: Vector3) -> Self {
        Self {
            origin: self.origin + delta,
            ..*self
        }
    }

    /// Global point -> plane-local coordinates.
    pub fn to_local(&self, p: &Point3) -> Vector3 {
        let d = p - self.origin;
        Vector3::new(d.dot(&self.x_dir), d.dot(&self.y_dir()), d.dot(&self.z_dir))
    }

    /// Plane-local coordinates -> global point.
    pub fn to_global(&self, local: &Vector3) -> Point3 {
        self.origin + self.dir_to_global(local)
    }

    pub fn dir_to_local(&self, v: &Vector3) -> Vector3 {
        Vector3::new(v.dot(&self.x_dir), v.dot(&self.y_dir()), v.dot(&self.z_dir))
    }

    pub fn dir_to_global(&self, v: &Vector3) -> Vector3 {
        self.x_dir * v.x + self.y_dir() * v.y + self.z_dir * v.z
    }

    /// In-plane 2D coordinates of a global point.
    pub fn to_2d(&self, p: &Point3) -> [f64; 2] {
        let l = self.to_local(p);
        [l.x, l.y]
    }

    pub fn from_2d(&self, p: [f64; 2]) -> Point3 {
        self.to_global(&Vector3::new(p[0], p[1], 0.0))
    }

    pub fn dir_to_2d(&self, v: &Vector3) -> [f64; 2] {
        [v.dot(&self.x_dir), v.dot(&self.y_dir())]
    }

    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(&self.z_dir)
    }

    pub fn contains(&self, p: &Point3, tol: f64) -> bool {
        self.signed_distance(p).abs() <= tol
    }

    pub fn project_point(&self, p: &Point3) -> Point3 {
        p - self.z_dir * self.signed_distance(p)
    }

    pub fn mirror_point(&self, p: &Point3) -> Point3 {
        p - self.z_dir * (2.0 * self.signed_distance(p))
    }

    pub fn mirror_vector(&self, v: &Vector3) -> Vector3 {
        v - self.z_dir * (2.0 * v.dot(&self.z_dir))
    }

    /// Intersection of the infinite line `origin + t * dir` with this plane.
    pub fn intersect_line(&self, origin: &Point3, dir: &Vector3) -> Option<Point3> {
        let denom = dir.dot(&self.z_dir);
        if denom.abs() < EPSILON * dir.norm().max(1.0) {
            return None;
        }
        let t = (self.origin - origin).dot(&self.z_dir) / denom;
        Some(origin + dir * t)
    }

    /// Re-express a point given relative to `self` in the frame `target`.
    pub fn relocate_point(&self, p: &Point3, target: &Plane) -> Point3 {
        target.to_global(&self.to_local(p))
    }

    pub fn relocate_vector(&self, v: &Vector3, target: &Plane) -> Vector3 {
        target.dir_to_global(&self.dir_to_local(v))
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::xy()
    }
}
