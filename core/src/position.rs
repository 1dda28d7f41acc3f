//! Position arguments and the targets operations can run into.
//!
//! A [`Position`] is what the caller writes; it only becomes a point once a
//! builder resolves it against its working plane and current end point.
//!
//! ```
//! use draft_core::{x, xx, pos, Plane, Point3, Position};
//!
//! let plane = Plane::xy();
//! let end = Point3::new(3.0, 4.0, 0.0);
//! assert_eq!(x(10.0).resolve(&plane, Some(&end)), Point3::new(13.0, 4.0, 0.0));
//! assert_eq!(xx(10.0).resolve(&plane, Some(&end)), Point3::new(10.0, 4.0, 0.0));
//! assert_eq!(Position::from((1.0, 2.0)).resolve(&plane, Some(&end)), Point3::new(1.0, 2.0, 0.0));
//! assert_eq!(pos(1.0, 1.0).resolve(&plane, None), Point3::new(1.0, 1.0, 0.0));
//! ```

use crate::geometry::{Axis, Plane, Point3, Vector3};
use crate::wire::Segment;
use serde::{Deserialize, Serialize};

/// A location argument, resolved lazily against a working plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Position {
    /// Plane-local offset from the reference point.
    Offset {
        offset: Vector3,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        normal: Option<Vector3>,
    },
    /// Plane-local coordinates replacing the reference point's; unset axes
    /// keep the reference value.
    Absolute {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        z: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        normal: Option<Vector3>,
    },
    /// Plane-local coordinates.
    Local { coords: Vector3 },
    /// A global vector, used as is.
    Global { vector: Vector3 },
    /// A plane-local axis; its origin as a point, its direction as a direction.
    Axis { axis: Axis },
}

/// Move along the plane X axis; as a cut target, the plane normal to X.
pub fn x(value: f64) -> Position {
    Position::Offset { offset: Vector3::new(value, 0.0, 0.0), normal: Some(Vector3::x()) }
}

pub fn y(value: f64) -> Position {
    Position::Offset { offset: Vector3::new(0.0, value, 0.0), normal: Some(Vector3::y()) }
}

pub fn z(value: f64) -> Position {
    Position::Offset { offset: Vector3::new(0.0, 0.0, value), normal: Some(Vector3::z()) }
}

/// Set the plane X coordinate, keeping the others.
pub fn xx(value: f64) -> Position {
    Position::Absolute { x: Some(value), y: None, z: None, normal: Some(Vector3::x()) }
}

pub fn yy(value: f64) -> Position {
    Position::Absolute { x: None, y: Some(value), z: None, normal: Some(Vector3::y()) }
}

pub fn zz(value: f64) -> Position {
    Position::Absolute { x: None, y: None, z: Some(value), normal: Some(Vector3::z()) }
}

/// In-plane offset without a normal hint.
pub fn pos(dx: f64, dy: f64) -> Position {
    Position::Offset { offset: Vector3::new(dx, dy, 0.0), normal: None }
}

/// Absolute marker over any subset of axes.
pub fn absolute(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Position {
    Position::Absolute { x, y, z, normal: None }
}

impl Position {
    /// Resolve to a global point.
    ///
    /// `reference` is the global point relative markers start from; `None`
    /// stands for the plane origin.
    pub fn resolve(&self, plane: &Plane, reference: Option<&Point3>) -> Point3 {
        match *self {
            Position::Offset { offset, .. } => plane.to_global(&(self.reference_local(plane, reference) + offset)),
            Position::Absolute { x, y, z, .. } => {
                let r = self.reference_local(plane, reference);
                plane.to_global(&Vector3::new(x.unwrap_or(r.x), y.unwrap_or(r.y), z.unwrap_or(r.z)))
            }
            Position::Local { coords } => plane.to_global(&coords),
            Position::Global { vector } => Point3::from(vector),
            Position::Axis { axis } => plane.to_global(&axis.origin.coords),
        }
    }

    fn reference_local(&self, plane: &Plane, reference: Option<&Point3>) -> Vector3 {
        reference.map(|r| plane.to_local(r)).unwrap_or_else(Vector3::zeros)
    }

    /// Resolve to a global direction.
    ///
    /// Markers and tuples are read as plane-local vectors, global vectors are
    /// kept and axes contribute their located direction.
    pub fn direction(&self, plane: &Plane) -> Vector3 {
        match *self {
            Position::Offset { offset, .. } => plane.dir_to_global(&offset),
            Position::Absolute { x, y, z, .. } => {
                plane.dir_to_global(&Vector3::new(x.unwrap_or(0.0), y.unwrap_or(0.0), z.unwrap_or(0.0)))
            }
            Position::Local { coords } => plane.dir_to_global(&coords),
            Position::Global { vector } => vector,
            Position::Axis { axis } => plane.dir_to_global(&axis.direction),
        }
    }

    /// Plane-local normal of the cut plane this marker stands for, if any.
    pub fn normal_hint(&self) -> Option<Vector3> {
        match *self {
            Position::Offset { normal, .. } | Position::Absolute { normal, .. } => normal,
            _ => None,
        }
    }

    /// Same marker with an explicit cut-plane normal.
    pub fn with_normal(self, n: Vector3) -> Self {
        match self {
            Position::Offset { offset, .. } => Position::Offset { offset, normal: Some(n) },
            Position::Absolute { x, y, z, .. } => Position::Absolute { x, y, z, normal: Some(n) },
            other => other,
        }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position::Local { coords: Vector3::new(x, y, 0.0) }
    }
}

impl From<(f64, f64, f64)> for Position {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Position::Local { coords: Vector3::new(x, y, z) }
    }
}

impl From<Point3> for Position {
    fn from(p: Point3) -> Self {
        Position::Global { vector: p.coords }
    }
}

impl From<Vector3> for Position {
    fn from(vector: Vector3) -> Self {
        Position::Global { vector }
    }
}

impl From<Axis> for Position {
    fn from(axis: Axis) -> Self {
        Position::Axis { axis }
    }
}

/// Something a line can run into or a profile can be closed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A marker standing for the plane normal to its hint through the resolved point.
    Position(Position),
    /// A plane-local axis.
    Axis(Axis),
    /// A global plane.
    Plane(Plane),
    /// Existing geometry.
    Shape(Segment),
}

impl From<Position> for Target {
    fn from(p: Position) -> Self {
        match p {
            Position::Axis { axis } => Target::Axis(axis),
            other => Target::Position(other),
        }
    }
}

impl From<Axis> for Target {
    fn from(a: Axis) -> Self {
        Target::Axis(a)
    }
}

impl From<Plane> for Target {
    fn from(p: Plane) -> Self {
        Target::Plane(p)
    }
}

impl From<Segment> for Target {
    fn from(s: Segment) -> Self {
        Target::Shape(s)
    }
}

impl From<crate::geometry::Edge> for Target {
    fn from(e: crate::geometry::Edge) -> Self {
        Target::Shape(e.into())
    }
}
