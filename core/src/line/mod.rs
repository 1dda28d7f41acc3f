//! The line builder.
//!
//! `BuildLine` accumulates segments on a working plane. Each step either
//! draws a straight line to a position, appends a ready-made segment, or
//! applies an operation descriptor. The builder stays usable after a profile
//! has been pulled from it; later steps keep extending the same sequence.

mod apply;
pub mod chains;
pub mod ops;

#[cfg(test)]
mod tests_ops;
#[cfg(test)]
mod tests_resolver;

use crate::config::DraftConfig;
use crate::error::{DraftError, DraftResult};
use crate::geometry::{rotate_vector, Axis, Edge, Plane, Point3, Vector3};
use crate::kernel::{default_kernel, GeometryKernel, TruckKernel, TruckSolid};
use crate::position::{Position, Target};
use crate::profile::{Part, Profile};
use crate::wire::Segment;
use ops::OpDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use tracing::{debug, trace, warn};

/// One entry of a build plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Straight line from the current end point.
    To(Position),
    /// Append a segment as is.
    Shape(Segment),
    Op(OpDescriptor),
}

impl From<Position> for Step {
    fn from(p: Position) -> Self {
        Step::To(p)
    }
}

impl From<(f64, f64)> for Step {
    fn from(t: (f64, f64)) -> Self {
        Step::To(t.into())
    }
}

impl From<Point3> for Step {
    fn from(p: Point3) -> Self {
        Step::To(p.into())
    }
}

impl From<Segment> for Step {
    fn from(s: Segment) -> Self {
        Step::Shape(s)
    }
}

impl From<Edge> for Step {
    fn from(e: Edge) -> Self {
        Step::Shape(e.into())
    }
}

impl From<OpDescriptor> for Step {
    fn from(op: OpDescriptor) -> Self {
        Step::Op(op)
    }
}

/// Collect mixed positions, segments and descriptors into a `Vec<Step>`.
///
/// ```
/// use draft_core::{op_close, steps, x, y, BuildLine, Plane};
///
/// # fn main() -> draft_core::DraftResult<()> {
/// let mut lb = BuildLine::new(Plane::xy());
/// lb.append(steps![x(10.0), y(5.0), op_close().op()?])?;
/// assert_eq!(lb.len(), 3);
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! steps {
    ($($step:expr),* $(,)?) => {
        vec![$($crate::line::Step::from($step)),*]
    };
}

/// Profile builder bound to one working plane.
#[derive(Debug, Clone)]
pub struct BuildLine {
    plane: Plane,
    shapes: Vec<Segment>,
    /// Segments as they were when named.
    named: HashMap<String, Segment>,
    start_point: Point3,
    start_tangent: Vector3,
    config: DraftConfig,
}

impl BuildLine {
    pub fn new(plane: Plane) -> Self {
        Self {
            plane,
            shapes: Vec::new(),
            named: HashMap::new(),
            start_point: plane.origin,
            start_tangent: plane.x_dir,
            config: DraftConfig::default(),
        }
    }

    /// Builder whose first segment starts at `start`, resolved from the plane origin.
    pub fn starting_at(plane: Plane, start: impl Into<Position>) -> Self {
        let mut lb = Self::new(plane);
        lb.start_point = start.into().resolve(&plane, Some(&plane.origin));
        lb
    }

    pub fn with_tangent(mut self, tangent: impl Into<Position>) -> Self {
        self.start_tangent = self.to_direction(&tangent.into());
        self
    }

    pub fn with_config(mut self, config: DraftConfig) -> Self {
        self.config = config;
        self
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn shapes(&self) -> &[Segment] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    // ===== Replay =====

    /// Apply a single step.
    pub fn apply(&mut self, step: impl Into<Step>) -> DraftResult<()> {
        match step.into() {
            Step::To(p) => {
                let start = self.end();
                let end = self.to_vector(&p, None);
                trace!(?start, ?end, "line to");
                self.shapes.push(Segment::line(start, end));
                Ok(())
            }
            Step::Shape(s) => {
                self.shapes.push(s);
                Ok(())
            }
            Step::Op(op) => self.apply_op(&op),
        }
    }

    /// Apply steps in order, stopping at the first failure.
    pub fn append<I>(&mut self, steps: I) -> DraftResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Step>,
    {
        for step in steps {
            self.apply(step)?;
        }
        Ok(self)
    }

    pub(crate) fn apply_op(&mut self, op: &OpDescriptor) -> DraftResult<()> {
        debug!(op = op.kind.name(), name = ?op.name, "applying operation");
        let produced = self.run_op(&op.kind)?;

        if let Some(name) = &op.name {
            match produced {
                Some(idx) => self.register(name, idx),
                None => warn!(op = op.kind.name(), name = %name, "operation produced no segment to name"),
            }
        }
        if op.reverse {
            self.reverse_last_chain();
        }
        if op.connect {
            self.connect_chains();
        }
        Ok(())
    }

    fn register(&mut self, name: &str, idx: usize) {
        for s in self.shapes.iter_mut() {
            if s.name.as_deref() == Some(name) {
                s.name = None;
            }
        }
        self.shapes[idx].name = Some(name.to_string());
        self.named.insert(name.to_string(), self.shapes[idx].clone());
    }

    fn reverse_last_chain(&mut self) {
        let Some(last) = self.chains().pop() else {
            return;
        };
        let flipped: Vec<Segment> = self.shapes[last.clone()].iter().rev().map(Segment::reversed).collect();
        self.shapes.splice(last, flipped);
    }

    /// Bridge every gap between consecutive chains with a straight line.
    fn connect_chains(&mut self) {
        let runs = self.chains();
        if runs.len() < 2 {
            return;
        }
        let mut joined = Vec::with_capacity(self.shapes.len() + runs.len() - 1);
        for (i, run) in runs.iter().enumerate() {
            if i > 0 {
                let from = self.shapes[run.start - 1].end();
                let to = self.shapes[run.start].start();
                debug!(?from, ?to, "bridging chains");
                joined.push(Segment::line(from, to));
            }
            joined.extend_from_slice(&self.shapes[run.clone()]);
        }
        self.shapes = joined;
    }

    // ===== State queries =====

    /// End of the last segment, or the start point while empty.
    pub fn end(&self) -> Point3 {
        self.shapes.last().map(Segment::end).unwrap_or(self.start_point)
    }

    /// Start of the first segment, or the start point while empty.
    pub fn start(&self) -> Point3 {
        self.shapes.first().map(Segment::start).unwrap_or(self.start_point)
    }

    /// End of the first segment.
    pub fn first_end(&self) -> Option<Point3> {
        self.shapes.first().map(Segment::end)
    }

    /// Start of the last segment.
    pub fn last_start(&self) -> Option<Point3> {
        self.shapes.last().map(Segment::start)
    }

    /// Running tangent: end tangent of the last segment, or the start tangent.
    pub fn tangent(&self) -> Vector3 {
        self.shapes.last().map(|s| s.tangent_at(1.0)).unwrap_or(self.start_tangent)
    }

    /// Tangent of segment `idx` at normalized position `param`.
    pub fn tangent_at(&self, idx: isize, param: f64) -> DraftResult<Vector3> {
        if self.shapes.is_empty() {
            return Ok(self.start_tangent);
        }
        Ok(self.segment_at(idx)?.tangent_at(param))
    }

    /// Running tangent turned a quarter turn to the left.
    pub fn normal(&self) -> Vector3 {
        rotate_vector(&self.tangent(), &self.plane.z_dir, 90.0)
    }

    pub fn normal_at(&self, idx: isize, param: f64) -> DraftResult<Vector3> {
        Ok(rotate_vector(&self.tangent_at(idx, param)?, &self.plane.z_dir, 90.0))
    }

    /// Frame on segment `idx` at `param`: X along the tangent (flipped if
    /// `flip`), Z along the in-plane normal.
    pub fn normal_location(&self, idx: isize, param: f64, flip: bool) -> DraftResult<Plane> {
        let seg = self.segment_at(idx)?;
        let t = if flip { -seg.tangent_at(param) } else { seg.tangent_at(param) };
        let n = rotate_vector(&t, &self.plane.z_dir, 90.0);
        Ok(Plane::new(seg.point_at(param), t, n))
    }

    fn segment_at(&self, idx: isize) -> DraftResult<&Segment> {
        self.get_by_index(idx)
            .ok_or_else(|| DraftError::NotFound(format!("no segment at index {idx}")))
    }

    // ===== Resolver =====

    /// Resolve a position to a global point.
    ///
    /// Relative markers count from `reference`, defaulting to the current
    /// end point.
    pub fn to_vector(&self, v: &Position, reference: Option<Point3>) -> Point3 {
        let reference = reference.unwrap_or_else(|| self.end());
        v.resolve(&self.plane, Some(&reference))
    }

    /// Resolve a direction-like argument to a global vector.
    pub fn to_direction(&self, v: &Position) -> Vector3 {
        v.direction(&self.plane)
    }

    /// Plane a target stands for when used as a cut.
    ///
    /// Markers give the plane through their resolved point, normal to their
    /// hint; axes give the plane containing them and perpendicular to the
    /// working plane.
    pub fn to_normal_plane(&self, target: &Target, start: Option<Point3>) -> DraftResult<Plane> {
        match target {
            Target::Axis(axis) | Target::Position(Position::Axis { axis }) => {
                Ok(axis.located(&self.plane).normal_plane(&self.plane))
            }
            Target::Position(p) => {
                let hint = p.normal_hint().ok_or(DraftError::MissingNormal)?;
                let origin = self.to_vector(p, start);
                Ok(Plane::from_normal(origin, self.plane.dir_to_global(&hint)))
            }
            Target::Plane(plane) => Ok(*plane),
            Target::Shape(_) => Err(DraftError::invalid("close", "a shape does not define a cut plane")),
        }
    }

    // ===== Segment access =====

    pub fn add_shape(&mut self, shape: impl Into<Segment>) -> &Segment {
        self.shapes.push(shape.into());
        &self.shapes[self.shapes.len() - 1]
    }

    /// Translate every segment, keeping names attached.
    pub fn translate(&mut self, delta: &Vector3) {
        self.translate_range(0..self.shapes.len(), delta);
    }

    fn translate_range(&mut self, range: Range<usize>, delta: &Vector3) {
        for i in range {
            self.shapes[i] = self.shapes[i].translated(delta);
            if let Some(name) = self.shapes[i].name.clone() {
                self.named.insert(name, self.shapes[i].clone());
            }
        }
    }

    /// Named segment: the live one carrying the name, else the one
    /// recorded when the name was given.
    pub fn get_by_name(&self, name: &str) -> Option<&Segment> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.name.as_deref() == Some(name))
            .or_else(|| self.named.get(name))
    }

    /// Segment at a signed index, `-1` being the most recent.
    pub fn get_by_index(&self, idx: isize) -> Option<&Segment> {
        crate::signed_index(self.shapes.len(), idx).map(|i| &self.shapes[i])
    }

    /// Index ranges of the current chains.
    pub fn chains(&self) -> Vec<Range<usize>> {
        chains::chains(&self.shapes, self.config.tolerance)
    }

    // ===== Finishing =====

    /// All segments joined into one.
    pub fn wire(&self) -> DraftResult<Segment> {
        Segment::join(&self.shapes)
    }

    /// Every edge in traversal order.
    pub fn edges(&self) -> Vec<Edge> {
        self.shapes.iter().flat_map(Segment::oriented_edges).collect()
    }

    /// The closed planar region bounded by the segments.
    pub fn face(&self) -> DraftResult<Profile> {
        Profile::from_segments(self.plane, &self.shapes, self.config.tolerance)
    }

    fn kernel(&self) -> TruckKernel {
        let mut kernel = default_kernel();
        kernel.tolerance = self.config.kernel_tolerance;
        kernel
    }

    /// Extrude along the plane normal; `both` extrudes the same amount backwards too.
    pub fn extrude(&self, amount: f64, both: bool) -> DraftResult<Part<TruckSolid>> {
        self.extrude_with(&self.kernel(), amount, both)
    }

    pub fn extrude_with<K: GeometryKernel>(&self, kernel: &K, amount: f64, both: bool) -> DraftResult<Part<K::Solid>> {
        Ok(self.face()?.extrude(kernel, amount, both)?.with_unit(self.config.unit))
    }

    /// Full revolution about the global X axis through the plane origin.
    ///
    /// When global X does not lie in the working plane, the plane's own X
    /// axis is used instead.
    pub fn revolve_x(&self) -> DraftResult<Part<TruckSolid>> {
        self.revolve_global_with(&self.kernel(), Vector3::x(), Vector3::x())
    }

    pub fn revolve_y(&self) -> DraftResult<Part<TruckSolid>> {
        self.revolve_global_with(&self.kernel(), Vector3::y(), Vector3::y())
    }

    pub fn revolve_z(&self) -> DraftResult<Part<TruckSolid>> {
        self.revolve_global_with(&self.kernel(), Vector3::z(), Vector3::z())
    }

    fn revolve_global_with<K: GeometryKernel>(&self, kernel: &K, global: Vector3, local: Vector3) -> DraftResult<Part<K::Solid>> {
        let in_plane = |d: &Vector3| d.dot(&self.plane.z_dir).abs() < 1e-9;
        let direction = if in_plane(&global) { global } else { self.plane.dir_to_global(&local) };
        let axis = Axis::new(self.plane.origin, direction);
        debug!(?axis, "revolving profile");
        Ok(self.face()?.revolve(kernel, &axis, 360.0)?.with_unit(self.config.unit))
    }

    /// Revolve about a plane-local axis by `degrees`.
    pub fn revolve(&self, axis: &Axis, degrees: f64) -> DraftResult<Part<TruckSolid>> {
        self.revolve_with(&self.kernel(), axis, degrees)
    }

    pub fn revolve_with<K: GeometryKernel>(&self, kernel: &K, axis: &Axis, degrees: f64) -> DraftResult<Part<K::Solid>> {
        let axis = axis.located(&self.plane);
        Ok(self.face()?.revolve(kernel, &axis, degrees)?.with_unit(self.config.unit))
    }

    /// Sweep `section` along the segments, its plane placed at the start
    /// point facing along the first tangent.
    pub fn sweep(&self, section: &Profile) -> DraftResult<Part<TruckSolid>> {
        self.sweep_with(&self.kernel(), section)
    }

    pub fn sweep_with<K: GeometryKernel>(&self, kernel: &K, section: &Profile) -> DraftResult<Part<K::Solid>> {
        let path = self.edges();
        let first = path.first().ok_or(DraftError::EmptyProfile)?;
        let frame = Plane::from_normal(first.start(), first.start_tangent());
        let placed = section.relocated(&frame);
        Ok(placed.sweep(kernel, &path)?.with_unit(self.config.unit))
    }
}
