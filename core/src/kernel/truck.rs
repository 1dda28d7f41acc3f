//! Truck-based implementation of the geometry kernel.
//!
//! This module provides a CAD kernel implementation using the Truck library,
//! which is licensed under Apache-2.0 (MIT-compatible).

use super::types::*;
use super::{GeometryKernel, KernelOpError, KernelResult};
use crate::geometry::{Curve, Edge as ProfileEdge, Point3 as GeoPoint3, Vector3 as GeoVector3};
use crate::profile::{sweep_frames, Profile};
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

// Use truck's pre-exported types which come from cgmath64
use truck_meshalgo::tessellation::MeshableShape;
use truck_modeling::{builder, Edge, Face, Point3, Rad, Solid, Vector3, Vertex, Wire};
use truck_polymesh::PolygonMesh;

/// Truck-based CAD kernel implementation.
pub struct TruckKernel {
    /// Chord tolerance for curve approximation and mesh generation.
    pub tolerance: f64,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            tolerance: 0.01, // 0.01mm precision
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn point(p: &GeoPoint3) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

fn vector(v: &GeoVector3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

impl GeometryKernel for TruckKernel {
    type Solid = Solid;

    fn extrude_profile(&self, profile: &Profile, params: &ExtrudeParams) -> KernelResult<Self::Solid> {
        let sweep = params.vector();
        if sweep.norm() < f64::EPSILON {
            return Err(KernelOpError::InvalidGeometry("extrusion distance is zero".into()));
        }
        let face = self.build_face(profile, &sweep)?;
        if params.both {
            let shifted = builder::translated(&face, vector(&-sweep));
            return Ok(builder::tsweep(&shifted, vector(&(sweep * 2.0))));
        }
        Ok(builder::tsweep(&face, vector(&sweep)))
    }

    fn revolve_profile(&self, profile: &Profile, params: &RevolveParams) -> KernelResult<Self::Solid> {
        let axis = params.axis.direction.normalize() * params.angle.signum();
        // Face normal must follow the motion of the profile
        let motion = axis.cross(&(profile.centroid() - params.axis.origin));
        if motion.norm() < f64::EPSILON {
            return Err(KernelOpError::InvalidGeometry("profile centroid lies on the revolution axis".into()));
        }
        let face = self.build_face(profile, &motion)?;

        // Truck requires angle > 2π for closed shapes (2π ≈ 6.28, so use 7.0)
        let angle = if params.is_full_turn() { 7.0 * params.angle.signum() } else { params.angle };
        Ok(builder::rsweep(
            &face,
            point(&params.axis.origin),
            vector(&params.axis.direction.normalize()),
            Rad(angle),
        ))
    }

    fn sweep_profile(&self, profile: &Profile, path: &[ProfileEdge]) -> KernelResult<Self::Solid> {
        let frames = sweep_frames(path, &profile.plane);
        let mut solids = path.iter().zip(&frames).map(|(edge, frame)| {
            let section = profile.relocated(frame);
            self.sweep_edge(&section, edge)
        });

        let first = solids
            .next()
            .ok_or_else(|| KernelOpError::InvalidGeometry("sweep path is empty".into()))??;
        solids.try_fold(first, |acc, next| self.boolean_union(&acc, &next?))
    }

    fn boolean_union(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid> {
        truck_shapeops::or(solid_a, solid_b, self.tolerance)
            .ok_or_else(|| KernelOpError::OperationFailed("Boolean union failed".into()))
    }

    fn tessellate(&self, solid: &Self::Solid) -> KernelResult<TriangleMesh> {
        // Each face of the triangulated solid carries an Option<PolygonMesh>
        let meshed_solid = solid.triangulation(self.tolerance);

        let mut mesh = TriangleMesh::new();
        let mut vertex_offset: u32 = 0;
        let mut face_id: u32 = 0;

        for shell in meshed_solid.boundaries() {
            for face in shell.face_iter() {
                let polygon_mesh: PolygonMesh = face.surface().ok_or_else(|| {
                    KernelOpError::TessellationFailed(format!("face {face_id} could not be meshed"))
                })?;
                let positions = polygon_mesh.positions();
                for pos in positions.iter() {
                    mesh.add_vertex(GeoPoint3::new(pos.x, pos.y, pos.z));
                }
                for tri in polygon_mesh.tri_faces() {
                    mesh.add_triangle_with_face(
                        [
                            vertex_offset + tri[0].pos as u32,
                            vertex_offset + tri[1].pos as u32,
                            vertex_offset + tri[2].pos as u32,
                        ],
                        face_id,
                    );
                }
                vertex_offset += positions.len() as u32;
                face_id += 1;
            }
        }

        debug!(vertices = mesh.positions.len(), triangles = mesh.triangles.len(), "tessellated solid");
        Ok(mesh)
    }

    // === STEP File I/O ===

    fn export_step(&self, solid: &Self::Solid) -> KernelResult<String> {
        use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModels};

        // Compressed solids are what the STEP writer consumes
        let compressed = solid.compress();
        let models: StepModels<_, _, _> = std::iter::once(&compressed).collect();

        let header = StepHeaderDescriptor {
            file_name: "draft_export.step".to_string(),
            time_stamp: "1970-01-01T00:00:00".to_string(),
            authors: Vec::new(),
            organization: Vec::new(),
            organization_system: "truck".to_string(),
            authorization: String::new(),
        };

        let display = CompleteStepDisplay::new(models, header);
        Ok(display.to_string())
    }
}

impl TruckKernel {
    /// Planar face bounded by the profile, its normal turned towards `towards`.
    fn build_face(&self, profile: &Profile, towards: &GeoVector3) -> KernelResult<Face> {
        let facing = profile.signed_area() * profile.plane.z_dir.dot(towards);
        let wire = if facing < 0.0 {
            let flipped: Vec<ProfileEdge> = profile.edges.iter().rev().map(ProfileEdge::reversed).collect();
            self.build_wire(&flipped)?
        } else {
            self.build_wire(&profile.edges)?
        };
        builder::try_attach_plane(&[wire])
            .map_err(|e| KernelOpError::OperationFailed(format!("Failed to create face: {:?}", e)))
    }

    /// Closed truck wire through the profile edges, sharing vertices.
    fn build_wire(&self, edges: &[ProfileEdge]) -> KernelResult<Wire> {
        let Some(first_edge) = edges.first() else {
            return Err(KernelOpError::InvalidGeometry("Wire requires at least one edge".into()));
        };

        let first: Vertex = builder::vertex(point(&first_edge.start()));
        let mut current = first.clone();
        let mut out: Vec<Edge> = Vec::new();

        for (i, edge) in edges.iter().enumerate() {
            let stations = self.stations(edge)?;
            let count = stations.len();
            for (j, (end, transit)) in stations.into_iter().enumerate() {
                let closing = i + 1 == edges.len() && j + 1 == count;
                let next = if closing { first.clone() } else { builder::vertex(point(&end)) };
                let piece = match transit {
                    Some(t) => builder::circle_arc(&current, &next, point(&t)),
                    None => builder::line(&current, &next),
                };
                out.push(piece);
                current = next;
            }
        }

        Ok(Wire::from_iter(out))
    }

    /// Break an edge into pieces truck can build exactly: the end point of
    /// every piece plus, for circular pieces, a point halfway along.
    fn stations(&self, edge: &ProfileEdge) -> KernelResult<Vec<(GeoPoint3, Option<GeoPoint3>)>> {
        let len = edge.length();
        let at = |k: f64, n: usize| edge.point_at(len * k / n as f64);
        match edge.curve {
            Curve::Line { .. } => Ok(vec![(edge.end(), None)]),
            Curve::Circle { .. } => {
                // Arcs are split at most every quarter turn
                let n = ((edge.t1 - edge.t0).abs() / FRAC_PI_2).ceil().max(1.0) as usize;
                Ok((1..=n).map(|j| (at(j as f64, n), Some(at(j as f64 - 0.5, n)))).collect())
            }
            Curve::Ellipse { x_radius, y_radius, .. } => {
                let rmax = x_radius.max(y_radius);
                if rmax <= 0.0 {
                    return Err(KernelOpError::InvalidGeometry("degenerate ellipse".into()));
                }
                let step = (8.0 * self.tolerance / rmax).sqrt();
                let n = ((edge.t1 - edge.t0).abs() / step).ceil().clamp(4.0, 512.0) as usize;
                Ok((1..=n).map(|j| (at(j as f64, n), None)).collect())
            }
        }
    }

    /// Sweep a section sitting at the start of `edge` along it.
    fn sweep_edge(&self, section: &Profile, edge: &ProfileEdge) -> KernelResult<Solid> {
        match edge.curve {
            Curve::Line { .. } => {
                let d = edge.end() - edge.start();
                let face = self.build_face(section, &d)?;
                Ok(builder::tsweep(&face, vector(&d)))
            }
            Curve::Circle { center, normal, .. } => {
                let n = if edge.reversed { -normal } else { normal };
                let face = self.build_face(section, &edge.start_tangent())?;
                Ok(builder::rsweep(&face, point(&center), vector(&n), Rad((edge.t1 - edge.t0).abs())))
            }
            Curve::Ellipse { .. } => Err(KernelOpError::NotImplemented(
                "sweeping along elliptical edges".into(),
            )),
        }
    }
}
