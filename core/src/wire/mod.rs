//! Segments: ordered groups of edges forming one piece of a profile.
//!
//! A segment is what a single builder step produces: one line, one arc, or
//! a composite (filleted corner, trimmed wire, mirrored half). The whole
//! segment can be flagged `reversed`, which flips its traversal without
//! touching the stored edges.

pub mod fillet;
pub mod param;

#[cfg(test)]
mod tests_param;

use crate::error::{DraftError, DraftResult};
use crate::geometry::intersection::{dedup_points, edge_axis_piercing, edge_curve_intersections, is_in_plane, Planar};
use crate::geometry::{same_point, Axis, Edge, Plane, Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub reversed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<Edge> for Segment {
    fn from(edge: Edge) -> Self {
        Self::from_edges(vec![edge])
    }
}

impl Segment {
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        Self { edges, reversed: false, name: None }
    }

    pub fn line(a: Point3, b: Point3) -> Self {
        Edge::line(a, b).into()
    }

    /// Edges in traversal order, each oriented along the traversal.
    pub fn oriented_edges(&self) -> Vec<Edge> {
        if self.reversed {
            self.edges.iter().rev().map(Edge::reversed).collect()
        } else {
            self.edges.clone()
        }
    }

    pub fn first_edge(&self) -> Option<Edge> {
        if self.reversed {
            self.edges.last().map(Edge::reversed)
        } else {
            self.edges.first().copied()
        }
    }

    pub fn last_edge(&self) -> Option<Edge> {
        if self.reversed {
            self.edges.first().map(Edge::reversed)
        } else {
            self.edges.last().copied()
        }
    }

    pub fn start(&self) -> Point3 {
        self.first_edge().map(|e| e.start()).unwrap_or_else(Point3::origin)
    }

    pub fn end(&self) -> Point3 {
        self.last_edge().map(|e| e.end()).unwrap_or_else(Point3::origin)
    }

    pub fn length(&self) -> f64 {
        self.edges.iter().map(Edge::length).sum()
    }

    pub fn is_closed(&self, tol: f64) -> bool {
        !self.edges.is_empty() && same_point(&self.start(), &self.end(), tol)
    }

    /// Locate the edge holding normalized position `u` and the arc length into it.
    fn locate(&self, u: f64) -> Option<(Edge, f64)> {
        let edges = self.oriented_edges();
        let total = self.length();
        let mut remaining = u.clamp(0.0, 1.0) * total;
        let last = edges.len().checked_sub(1)?;
        for (i, e) in edges.iter().enumerate() {
            let len = e.length();
            if remaining <= len || i == last {
                return Some((*e, remaining.min(len)));
            }
            remaining -= len;
        }
        None
    }

    /// Point at normalized arc-length position `u` in `[0, 1]`.
    pub fn point_at(&self, u: f64) -> Point3 {
        self.locate(u).map(|(e, s)| e.point_at(s)).unwrap_or_else(Point3::origin)
    }

    /// Unit tangent in traversal direction at normalized position `u`.
    pub fn tangent_at(&self, u: f64) -> Vector3 {
        self.locate(u).map(|(e, s)| e.tangent_at(s)).unwrap_or_else(Vector3::x)
    }

    /// Center of the last arc, if the segment ends with one.
    pub fn arc_center(&self) -> Option<Point3> {
        self.last_edge().and_then(|e| e.arc_center())
    }

    /// Whole-segment reversal: flips traversal, keeps stored edges.
    pub fn reversed(&self) -> Self {
        Self { reversed: !self.reversed, ..self.clone() }
    }

    /// Same traversal as [`Segment::reversed`] but with every edge flipped
    /// and reordered instead of using the segment flag.
    pub fn reversed_edges(&self) -> Self {
        Self {
            edges: self.oriented_edges().iter().rev().map(Edge::reversed).collect(),
            reversed: false,
            name: self.name.clone(),
        }
    }

    pub fn translated(&self, delta: &Vector3) -> Self {
        Self {
            edges: self.edges.iter().map(|e| e.translated(delta)).collect(),
            ..self.clone()
        }
    }

    pub fn mirrored(&self, plane: &Plane) -> Self {
        Self {
            edges: self.edges.iter().map(|e| e.mirrored(plane)).collect(),
            ..self.clone()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Concatenate segments into one, in traversal order.
    pub fn join<'a>(segments: impl IntoIterator<Item = &'a Segment>) -> DraftResult<Self> {
        let edges: Vec<Edge> = segments.into_iter().flat_map(|s| s.oriented_edges()).collect();
        if edges.is_empty() {
            return Err(DraftError::EmptyProfile);
        }
        Ok(Self::from_edges(edges))
    }

    /// Intersection points with an axis, in no particular order.
    ///
    /// Axes in the working plane are intersected as lines; axes crossing it
    /// contribute their piercing point when it lies on the segment.
    pub fn intersect_axis(&self, axis: &Axis, plane: &Plane, tol: f64) -> Vec<Point3> {
        let hits = if is_in_plane(&axis.direction, plane) {
            let probe = Planar::line(axis, plane);
            self.edges
                .iter()
                .flat_map(|e| edge_curve_intersections(e, &probe, plane, tol))
                .collect()
        } else {
            self.edges
                .iter()
                .filter_map(|e| edge_axis_piercing(e, axis, plane, tol))
                .collect()
        };
        dedup_points(hits, tol.max(EPSILON))
    }

    /// Intersection points with a circle lying in `plane`.
    pub fn intersect_circle(&self, center: &Point3, radius: f64, plane: &Plane, tol: f64) -> Vec<Point3> {
        let probe = Planar::Circle { c: plane.to_2d(center), r: radius };
        let hits = self
            .edges
            .iter()
            .flat_map(|e| edge_curve_intersections(e, &probe, plane, tol))
            .collect();
        dedup_points(hits, tol.max(EPSILON))
    }

    /// First point hit by the ray `origin + t * dir`, `t > tol`, on any edge.
    pub fn ray_hit(&self, origin: &Point3, dir: &Vector3, plane: &Plane, tol: f64) -> Option<Point3> {
        let axis = Axis::new(*origin, *dir);
        self.intersect_axis(&axis, plane, tol)
            .into_iter()
            .map(|p| (axis.param_of(&p), p))
            .filter(|(t, _)| *t > tol.max(EPSILON))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }
}
