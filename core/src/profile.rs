//! Closed planar profiles and the parts made from them.
//!
//! A [`Profile`] is one closed loop of edges lying in a plane. Section
//! properties (area, centroid) are integrated along the boundary, which is
//! what the analytic part volumes are computed from.

use crate::error::{DraftError, DraftResult};
use crate::geometry::{integrate, rotate_vector, signed_angle, Axis, Curve, Edge, Plane, Point3, Vector3};
use crate::kernel::{ExtrudeParams, GeometryKernel, RevolveParams};
use crate::line::chains::closed_loop;
use crate::units::{LengthUnit, Material};
use crate::wire::Segment;
use std::f64::consts::TAU;
use tracing::debug;

/// A closed loop of edges in a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub plane: Plane,
    pub edges: Vec<Edge>,
}

impl Profile {
    /// Close up the segments of a builder into a loop.
    pub fn from_segments(plane: Plane, segments: &[Segment], tol: f64) -> DraftResult<Self> {
        let edges: Vec<Edge> = segments.iter().flat_map(Segment::oriented_edges).collect();
        Self::from_edges(plane, edges, tol)
    }

    pub fn from_edges(plane: Plane, edges: Vec<Edge>, tol: f64) -> DraftResult<Self> {
        let edges: Vec<Edge> = edges.into_iter().filter(|e| !e.is_degenerate(tol)).collect();
        let planar_tol = tol.max(1e-9) * 10.0;
        for e in &edges {
            let mid = e.point_at(e.length() * 0.5);
            if [e.start(), mid, e.end()].iter().any(|p| !plane.contains(p, planar_tol)) {
                return Err(DraftError::Geometry("profile edge leaves its plane".into()));
            }
        }
        let edges = closed_loop(&edges, tol)?;
        Ok(Self { plane, edges })
    }

    /// Circle of `radius` centered on the plane origin.
    pub fn circle(plane: Plane, radius: f64) -> Self {
        let start = plane.origin + plane.x_dir * radius;
        Self { plane, edges: vec![Edge::arc(plane.origin, start, plane.z_dir, TAU)] }
    }

    /// Ellipse centered on the plane origin, `x_radius` along the plane X axis.
    pub fn ellipse(plane: Plane, x_radius: f64, y_radius: f64) -> Self {
        Self { plane, edges: vec![Edge::ellipse_arc(&plane, x_radius, y_radius, 0.0, 360.0)] }
    }

    /// Rectangle centered on the plane origin.
    pub fn rectangle(plane: Plane, width: f64, height: f64) -> Self {
        let (w, h) = (width / 2.0, height / 2.0);
        let corners = [[-w, -h], [w, -h], [w, h], [-w, h]].map(|c| plane.from_2d(c));
        let edges = (0..4).map(|i| Edge::line(corners[i], corners[(i + 1) % 4])).collect();
        Self { plane, edges }
    }

    /// Same shape carried from its own plane onto `target`.
    pub fn relocated(&self, target: &Plane) -> Self {
        Self {
            plane: *target,
            edges: self.edges.iter().map(|e| e.relocated(&self.plane, target)).collect(),
        }
    }

    /// Boundary integral of `f(x, y, dx, dy)` in plane coordinates.
    fn boundary_integral<F>(&self, f: F) -> f64
    where
        F: Fn(f64, f64, f64, f64) -> f64,
    {
        self.edges
            .iter()
            .map(|e| {
                let pieces = match e.curve {
                    Curve::Line { .. } => 1,
                    _ => 8,
                };
                integrate(
                    |s| {
                        let [x, y] = self.plane.to_2d(&e.point_at(s));
                        let [dx, dy] = self.plane.dir_to_2d(&e.tangent_at(s));
                        f(x, y, dx, dy)
                    },
                    0.0,
                    e.length(),
                    pieces,
                )
            })
            .sum()
    }

    /// Area, positive when the loop runs counter-clockwise about the plane normal.
    pub fn signed_area(&self) -> f64 {
        0.5 * self.boundary_integral(|x, y, dx, dy| x * dy - y * dx)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid in global coordinates.
    pub fn centroid(&self) -> Point3 {
        let a = self.signed_area();
        if a.abs() < f64::EPSILON {
            return self.plane.origin;
        }
        let mx = self.boundary_integral(|x, _, _, dy| 0.5 * x * x * dy);
        let my = self.boundary_integral(|_, y, dx, _| -0.5 * y * y * dx);
        self.plane.from_2d([mx / a, my / a])
    }

    // ===== Solids =====

    /// Extrude along the plane normal by `amount`, both ways when `both`.
    pub fn extrude<K: GeometryKernel>(&self, kernel: &K, amount: f64, both: bool) -> DraftResult<Part<K::Solid>> {
        let params = ExtrudeParams { distance: amount, direction: self.plane.z_dir, both };
        debug!(amount, both, "extruding profile");
        let solid = kernel.extrude_profile(self, &params)?;
        let volume = self.area() * amount.abs() * if both { 2.0 } else { 1.0 };
        Ok(Part::new(solid, volume))
    }

    /// Revolve about a global axis by `degrees`.
    pub fn revolve<K: GeometryKernel>(&self, kernel: &K, axis: &Axis, degrees: f64) -> DraftResult<Part<K::Solid>> {
        if axis.direction.dot(&self.plane.z_dir).abs() > 1e-9 {
            return Err(DraftError::invalid("revolve", "axis must lie in the profile plane"));
        }
        if self.plane.signed_distance(&axis.origin).abs() > 1e-9 {
            return Err(DraftError::invalid("revolve", "axis must lie in the profile plane"));
        }
        let angle = degrees.to_radians();
        let params = RevolveParams { axis: *axis, angle };
        debug!(?axis, degrees, "revolving profile");
        let solid = kernel.revolve_profile(self, &params)?;
        let volume = angle.abs().min(TAU) * self.area() * axis.distance_to(&self.centroid());
        Ok(Part::new(solid, volume))
    }

    /// Sweep along `path`; the profile must already sit at the path start,
    /// facing along its first tangent.
    pub fn sweep<K: GeometryKernel>(&self, kernel: &K, path: &[Edge]) -> DraftResult<Part<K::Solid>> {
        let frames = sweep_frames(path, &self.plane);
        let area = self.area();
        let volume = path
            .iter()
            .zip(&frames)
            .map(|(edge, frame)| match edge.curve {
                Curve::Circle { center, normal, .. } => {
                    let rho = Axis::new(center, normal).distance_to(&self.relocated(frame).centroid());
                    (edge.t1 - edge.t0).abs() * area * rho
                }
                _ => area * edge.length(),
            })
            .sum();
        debug!(pieces = path.len(), "sweeping profile");
        let solid = kernel.sweep_profile(self, path)?;
        Ok(Part::new(solid, volume))
    }
}

/// Frame of the section at the start of every path edge.
///
/// The frame rides rigidly along lines, turns with arcs about their axis
/// and takes the smallest rotation across a kink between edges.
pub fn sweep_frames(path: &[Edge], start: &Plane) -> Vec<Plane> {
    let mut frames = Vec::with_capacity(path.len());
    let mut frame = *start;
    for (i, edge) in path.iter().enumerate() {
        if i > 0 {
            frame = turn_frame(&frame, &path[i - 1].end_tangent(), &edge.start_tangent());
            frame = Plane::new(edge.start(), frame.x_dir, frame.z_dir);
        }
        frames.push(frame);
        frame = match edge.curve {
            Curve::Circle { center, normal, .. } => {
                let n = if edge.reversed { -normal } else { normal };
                let degrees = (edge.t1 - edge.t0).abs().to_degrees();
                let origin = center + rotate_vector(&(frame.origin - center), &n, degrees);
                Plane::new(
                    origin,
                    rotate_vector(&frame.x_dir, &n, degrees),
                    rotate_vector(&frame.z_dir, &n, degrees),
                )
            }
            _ => frame.translated(edge.end() - edge.start()),
        };
    }
    frames
}

/// Rotate a frame's orientation by the smallest rotation taking `from` to `to`.
fn turn_frame(frame: &Plane, from: &Vector3, to: &Vector3) -> Plane {
    let axis = from.cross(to);
    if axis.norm() < 1e-12 {
        return *frame;
    }
    let degrees = signed_angle(from, to, &axis).to_degrees();
    Plane::new(
        frame.origin,
        rotate_vector(&frame.x_dir, &axis, degrees),
        rotate_vector(&frame.z_dir, &axis, degrees),
    )
}

/// A kernel solid with its analytic volume.
#[derive(Debug, Clone)]
pub struct Part<S> {
    pub solid: S,
    /// Volume in cubed `unit`.
    pub volume: f64,
    pub unit: LengthUnit,
}

impl<S> Part<S> {
    pub fn new(solid: S, volume: f64) -> Self {
        Self { solid, volume, unit: LengthUnit::default() }
    }

    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Mass in grams.
    pub fn mass(&self, material: Material) -> f64 {
        material.mass(self.unit.volume_to_mm3(self.volume))
    }
}
