//! Common types for the kernel abstraction layer.
//!
//! These types are kernel-agnostic and carry finished profiles' solid
//! requests to the kernel and meshes back out.

use crate::geometry::{Axis, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Parameters for extrusion operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeParams {
    /// Extrusion distance (height). Negative distances extrude backwards.
    pub distance: f64,
    /// Direction vector (typically the profile plane normal).
    pub direction: Vector3,
    /// Extrude the same distance on both sides of the profile.
    #[serde(default)]
    pub both: bool,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            distance: 10.0,
            direction: Vector3::z(),
            both: false,
        }
    }
}

impl ExtrudeParams {
    pub fn linear(distance: f64) -> Self {
        Self {
            distance,
            ..Default::default()
        }
    }

    pub fn with_direction(mut self, direction: Vector3) -> Self {
        self.direction = direction;
        self
    }

    pub fn symmetric(mut self) -> Self {
        self.both = true;
        self
    }

    /// Sweep vector from the profile to the far face.
    pub fn vector(&self) -> Vector3 {
        self.direction.normalize() * self.distance
    }
}

/// Parameters for revolution operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevolveParams {
    /// Global axis of revolution.
    pub axis: Axis,
    /// Angle of revolution in radians.
    pub angle: f64,
}

impl Default for RevolveParams {
    fn default() -> Self {
        Self {
            axis: Axis::x(),
            angle: std::f64::consts::TAU, // Full 360°
        }
    }
}

impl RevolveParams {
    pub fn is_full_turn(&self) -> bool {
        self.angle.abs() >= std::f64::consts::TAU - 1e-9
    }
}

/// Output triangle mesh from tessellation.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Triangle indices (each triple refers to positions).
    pub triangles: Vec<[u32; 3]>,
    /// Per-triangle topological face ID.
    /// Triangles with the same face_id belong to the same logical face.
    pub face_ids: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, pos: Point3) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(pos);
        idx
    }

    /// Add a triangle with an associated topological face ID.
    pub fn add_triangle_with_face(&mut self, tri: [u32; 3], face_id: u32) {
        self.triangles.push(tri);
        self.face_ids.push(face_id);
    }

    /// Number of distinct topological faces.
    pub fn face_count(&self) -> usize {
        let mut ids = self.face_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Enclosed volume by the divergence theorem. Positive for outward-facing
    /// triangles.
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|[a, b, c]| {
                let (a, b, c) = (
                    self.positions[*a as usize].coords,
                    self.positions[*b as usize].coords,
                    self.positions[*c as usize].coords,
                );
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }
}
