//! Geometric construction behind each operation.
//!
//! Every `op_*` method mutates the segment list and reports the index of
//! the segment it produced, if any, so the caller can register names.

use super::ops::{
    ArcArgs, ArcCenter, ArcMode, ArcTangent, ChamferArgs, CloseArgs, DropArgs, EllipseArcArgs, ExtendArgs, Extension,
    FilletArgs, LineArgs, MoveArgs, OpKind, StartArgs, TrimArgs, TrimPoint,
};
use super::BuildLine;
use crate::error::{DraftError, DraftResult};
use crate::geometry::intersection::select_sorted;
use crate::geometry::{rotate_vector, same_point, Axis, Edge, Point3, Vector3};
use crate::position::{Position, Target};
use crate::wire::fillet::{chamfer_vertices, fillet_vertices, ChamferSide};
use crate::wire::param::{param_on_point, trim_wire};
use crate::wire::Segment;
use std::f64::consts::TAU;
use tracing::{debug, trace, warn};

impl BuildLine {
    pub(super) fn run_op(&mut self, kind: &OpKind) -> DraftResult<Option<usize>> {
        match kind {
            OpKind::Start(a) => self.op_start(a),
            OpKind::Line(a) => self.op_line(a),
            OpKind::Arc(a) => self.op_arc(a),
            OpKind::EllipseArc(a) => self.op_ellipse_arc(a),
            OpKind::Extend(a) => self.op_extend(a),
            OpKind::Close(a) => self.op_close(a),
            OpKind::Trim(a) => self.op_trim(a),
            OpKind::Fillet(a) => self.op_fillet(a),
            OpKind::Chamfer(a) => self.op_chamfer(a),
            OpKind::Drop(a) => self.op_drop(a),
            OpKind::Move(a) => self.op_move(a),
        }
    }

    fn push(&mut self, seg: Segment) -> Option<usize> {
        self.shapes.push(seg);
        Some(self.shapes.len() - 1)
    }

    fn last_index(&self, op: &'static str) -> DraftResult<usize> {
        self.shapes
            .len()
            .checked_sub(1)
            .ok_or_else(|| DraftError::invalid(op, "no segment to work on"))
    }

    /// Where a ray from `start` along `dir` meets `target`.
    ///
    /// Markers, axes and planes are met as infinite lines; shapes only by
    /// the first forward hit.
    fn until_point(&self, start: Point3, dir: Vector3, target: &Target) -> DraftResult<Point3> {
        let tol = self.config.tolerance;
        let hit = match target {
            Target::Axis(axis) | Target::Position(Position::Axis { axis }) => {
                Axis::new(start, dir).intersect_axis(&axis.located(&self.plane), tol)
            }
            Target::Position(_) | Target::Plane(_) => {
                let cut = self.to_normal_plane(target, Some(start))?;
                cut.intersect_line(&start, &dir)
            }
            Target::Shape(seg) => seg.ray_hit(&start, &dir, &self.plane, tol),
        };
        trace!(?start, ?dir, ?hit, "until");
        hit.ok_or_else(|| DraftError::NotFound("line never reaches its target".into()))
    }

    fn arc_tangent(&self, tangent: &ArcTangent) -> Option<Vector3> {
        match tangent {
            ArcTangent::Continue => Some(self.tangent()),
            ArcTangent::Off => None,
            ArcTangent::Direction(p) => Some(self.to_direction(p)),
        }
    }

    // ===== Operations =====

    fn op_start(&mut self, a: &StartArgs) -> DraftResult<Option<usize>> {
        if !self.shapes.is_empty() {
            warn!(segments = self.shapes.len(), "start changed after segments were added");
        }
        if let Some(p) = &a.start {
            self.start_point = self.to_vector(p, Some(self.plane.origin));
        }
        if let Some(t) = &a.tangent {
            self.start_tangent = self.to_direction(t);
        }
        Ok(None)
    }

    fn op_line(&mut self, a: &LineArgs) -> DraftResult<Option<usize>> {
        let (start, base) = match &a.start {
            Some(p) => (self.to_vector(p, None), self.plane.x_dir),
            None => (self.end(), self.tangent()),
        };

        if let Some(to) = &a.to {
            let end = self.to_vector(to, Some(start));
            return Ok(self.push(Segment::line(start, end)));
        }

        let dir = match &a.dir {
            Some(d) => self.to_direction(d),
            None => {
                let tangent = a.tangent.as_ref().map(|t| self.to_direction(t)).unwrap_or(base);
                rotate_vector(&tangent, &self.plane.z_dir, a.angle.unwrap_or(0.0))
            }
        };
        let dir = dir.try_normalize(f64::EPSILON).ok_or_else(|| DraftError::invalid("line", "zero direction"))?;

        let end = match (a.length, &a.until) {
            (Some(length), _) => start + dir * length,
            (None, Some(target)) => self.until_point(start, dir, target)?,
            (None, None) => return Err(DraftError::invalid("line", "needs `to`, `length` or `until`")),
        };
        Ok(self.push(Segment::line(start, end)))
    }

    fn op_arc(&mut self, a: &ArcArgs) -> DraftResult<Option<usize>> {
        let mode = a.mode().ok_or(DraftError::NoConstructionMode)?;
        let e = match &a.start {
            Some(p) => self.to_vector(p, None),
            None => self.end(),
        };
        let z = self.plane.z_dir;
        debug!(?mode, "arc");

        let edge = match (mode, a.radius, a.size, a.to) {
            (ArcMode::TangentSweep, Some(radius), Some(size), _) => {
                let t = self
                    .arc_tangent(&a.tangent)
                    .and_then(|t| t.try_normalize(f64::EPSILON))
                    .ok_or_else(|| DraftError::invalid("arc", "zero tangent"))?;
                let side = rotate_vector(&t, &z, 90.0_f64.copysign(size));
                let center = e + side * radius;
                let normal = z * size.signum() * radius.signum();
                Edge::arc(center, e, normal, sweep_radians(size))
            }
            (ArcMode::TangentTo, _, _, Some(to)) => {
                let t = self
                    .arc_tangent(&a.tangent)
                    .ok_or_else(|| DraftError::invalid("arc", "tangent arc needs a tangent"))?;
                let end = self.to_vector(&to, None);
                Edge::tangent_arc(e, &t, end, &z)
                    .ok_or_else(|| DraftError::Geometry("arc end lies on the start tangent".into()))?
            }
            (ArcMode::RadiusTo, Some(radius), _, Some(to)) => {
                let end = self.to_vector(&to, None);
                radius_arc(e, end, radius, a.short, &z)?
            }
            (ArcMode::Centered, Some(radius), Some(size), _) => {
                let center = match a.center {
                    Some(ArcCenter::At(p)) => self.to_vector(&p, None),
                    _ => self.end(),
                };
                let from = rotate_vector(&self.plane.x_dir, &z, a.start_angle.unwrap_or(0.0));
                Edge::arc(center, center + from * radius.abs(), z * size.signum(), sweep_radians(size))
            }
            _ => return Err(DraftError::NoConstructionMode),
        };
        Ok(self.push(edge.into()))
    }

    fn op_ellipse_arc(&mut self, a: &EllipseArcArgs) -> DraftResult<Option<usize>> {
        let edge = Edge::ellipse_arc(&self.plane, a.x_radius, a.y_radius, a.start_angle, a.end_angle);
        let delta = self.end() - edge.start();
        Ok(self.push(edge.translated(&delta).into()))
    }

    fn op_extend(&mut self, a: &ExtendArgs) -> DraftResult<Option<usize>> {
        let idx = self.last_index("extend")?;
        let seg = self.shapes[idx].clone();
        let (s, e) = (seg.start(), seg.end());
        let (t0, t1) = (seg.tangent_at(0.0), seg.tangent_at(1.0));

        let head = match &a.start {
            Some(Extension::Distance(d)) => Some(Segment::line(s - t0 * *d, s)),
            Some(Extension::Until(target)) => Some(Segment::line(self.until_point(s, -t0, target)?, s)),
            None => None,
        };
        let tail = match &a.end {
            Some(Extension::Distance(d)) => Some(Segment::line(e, e + t1 * *d)),
            Some(Extension::Until(target)) => Some(Segment::line(e, self.until_point(e, t1, target)?)),
            None => None,
        };

        self.shapes.pop();
        let mut at = idx;
        if let Some(h) = head {
            self.shapes.push(h);
            at += 1;
        }
        self.shapes.push(seg);
        self.shapes.extend(tail);
        Ok(Some(at))
    }

    fn op_close(&mut self, a: &CloseArgs) -> DraftResult<Option<usize>> {
        if self.shapes.is_empty() {
            return Err(DraftError::invalid("close", "nothing to close"));
        }
        let tol = self.config.tolerance;

        let (mut start_t, mut end_t) = (a.start.as_ref(), a.end.as_ref());
        if let Some(both) = &a.both {
            start_t = Some(both);
            end_t = Some(both);
        }
        if let Some(mirror) = &a.mirror {
            start_t = Some(mirror);
            end_t = Some(mirror);
        }
        let start_plane = start_t.map(|t| self.to_normal_plane(t, None)).transpose()?;
        let end_plane = end_t.map(|t| self.to_normal_plane(t, None)).transpose()?;

        let untouched = |p: &Point3, lb: &BuildLine| !same_point(p, &lb.end(), tol) && !same_point(p, &lb.start(), tol);
        if let Some(plane) = &end_plane {
            let p = plane.project_point(&self.end());
            if untouched(&p, self) {
                self.shapes.push(Segment::line(self.end(), p));
            }
        }
        if let Some(plane) = &start_plane {
            let p = plane.project_point(&self.start());
            if untouched(&p, self) {
                self.shapes.insert(0, Segment::line(p, self.start()));
            }
        }

        if let (Some(_), Some(plane)) = (&a.mirror, &start_plane) {
            let half = self.wire()?.mirrored(plane).reversed();
            debug!(edges = half.edges.len(), "mirroring profile");
            return Ok(self.push(half));
        }

        let (e, s) = (self.end(), self.start());
        if same_point(&e, &s, tol) {
            debug!("profile already closed");
            return Ok(None);
        }
        Ok(self.push(Segment::line(e, s)))
    }

    fn op_trim(&mut self, a: &TrimArgs) -> DraftResult<Option<usize>> {
        let idx = self.last_index("trim")?;
        let seg = self.shapes[idx].clone();
        let tol = self.config.tolerance;
        let sort_by = a.sort_by.located(&self.plane);

        let (point, connector) = match a.point {
            TrimPoint::Point(p) => (self.to_vector(&p, None), None),
            TrimPoint::Axis(axis) => {
                let probe = axis.located(&self.plane);
                let hits = seg.intersect_axis(&probe, &self.plane, tol);
                let p = select_sorted(hits, &sort_by, a.idx)
                    .ok_or_else(|| DraftError::NotFound("trim axis misses the last segment".into()))?;
                (p, Some(probe.origin))
            }
            TrimPoint::ByTangent(target) => {
                let center = seg
                    .arc_center()
                    .ok_or_else(|| DraftError::invalid("trim", "by_tangent needs an arc as the last segment"))?;
                let target = self.to_vector(&target, None);
                let mid = Point3::from((center.coords + target.coords) * 0.5);
                let radius = (target - center).norm() * 0.5;
                let hits = seg.intersect_circle(&mid, radius, &self.plane, tol);
                let p = select_sorted(hits, &sort_by, a.idx)
                    .ok_or_else(|| DraftError::NotFound("no tangent point on the last arc".into()))?;
                (p, Some(target))
            }
        };

        let param = param_on_point(&seg, &point)
            .ok_or_else(|| DraftError::NotFound("trim point is not on the last segment".into()))?;
        debug!(param, "trimming last segment");
        let trimmed = trim_wire(&seg, 0.0, param)?;
        let cut = trimmed.end();
        self.shapes[idx] = trimmed;

        if a.add {
            if let Some(to) = connector {
                self.shapes.push(Segment::line(cut, to));
            }
        }
        Ok(Some(idx))
    }

    /// Replace the last `count + 1` segments with one composite whose
    /// inner joints went through `corner`.
    fn replace_corners<F>(&mut self, op: &'static str, count: usize, corner: F) -> DraftResult<Option<usize>>
    where
        F: FnOnce(&[Edge], &[Point3]) -> DraftResult<Vec<Edge>>,
    {
        let n = self.shapes.len();
        if count >= n {
            return Err(DraftError::invalid(op, format!("{count} corners need more than {n} segments")));
        }
        let first = n - 1 - count;
        let joints: Vec<Point3> = self.shapes[first + 1..].iter().map(Segment::start).collect();
        let origin = self.shapes[first].start();
        let fused = Segment::join(&self.shapes[first..])?;

        let edges = corner(&fused.edges, &joints)?;
        let mut composite = Segment::from_edges(edges);
        if !same_point(&composite.start(), &origin, self.config.tolerance) {
            composite = composite.reversed();
        }
        self.shapes.truncate(first);
        Ok(self.push(composite))
    }

    fn op_fillet(&mut self, a: &FilletArgs) -> DraftResult<Option<usize>> {
        let (normal, tol) = (self.plane.z_dir, self.config.tolerance);
        self.replace_corners("fillet", a.count, |edges, at| fillet_vertices(edges, at, a.radius, &normal, tol))
    }

    fn op_chamfer(&mut self, a: &ChamferArgs) -> DraftResult<Option<usize>> {
        let (normal, tol) = (self.plane.z_dir, self.config.tolerance);
        let side = match (a.length2, a.angle) {
            (Some(l2), _) => ChamferSide::Length(l2),
            (None, Some(angle)) => ChamferSide::Angle(angle),
            (None, None) => ChamferSide::Length(a.length),
        };
        self.replace_corners("chamfer", a.count, |edges, at| chamfer_vertices(edges, at, a.length, side, &normal, tol))
    }

    fn op_drop(&mut self, a: &DropArgs) -> DraftResult<Option<usize>> {
        let i = crate::signed_index(self.shapes.len(), a.idx)
            .ok_or_else(|| DraftError::NotFound(format!("no segment at index {}", a.idx)))?;
        let dropped = self.shapes.remove(i);
        trace!(index = i, name = ?dropped.name, "dropped segment");
        Ok(None)
    }

    fn op_move(&mut self, a: &MoveArgs) -> DraftResult<Option<usize>> {
        let Some(chain) = self.chains().pop() else {
            return Err(DraftError::invalid("move", "nothing to move"));
        };
        let delta = match (&a.start, &a.end) {
            (Some(p), _) => self.to_vector(p, None) - self.shapes[chain.start].start(),
            (None, Some(p)) => self.to_vector(p, None) - self.shapes[chain.end - 1].end(),
            (None, None) => return Err(DraftError::invalid("move", "needs `start` or `end`")),
        };
        debug!(?delta, segments = chain.len(), "moving last chain");
        self.translate_range(chain, &delta);
        Ok(None)
    }
}

/// Sweep in radians for a signed size in degrees, capped at a full turn.
fn sweep_radians(size: f64) -> f64 {
    size.abs().to_radians().min(TAU)
}

/// Arc of `radius` from `a` to `b`.
///
/// The arc bulges to the left of the chord for positive radii, to the right
/// for negative ones; `short` picks the minor arc.
fn radius_arc(a: Point3, b: Point3, radius: f64, short: bool, normal: &Vector3) -> DraftResult<Edge> {
    let chord = b - a;
    let h = chord.norm() * 0.5;
    let r = radius.abs();
    if r * r < h * h {
        return Err(DraftError::Geometry(format!("radius {r} too small for a chord of {}", 2.0 * h)));
    }
    let rest = (r * r - h * h).sqrt();
    let mut sagitta = if short { r - rest } else { -r - rest };
    if radius < 0.0 {
        sagitta = -sagitta;
    }
    let mid = Point3::from((a.coords + b.coords) * 0.5);
    let dir = chord / (2.0 * h);
    let bulge = rotate_vector(&dir, normal, 90.0_f64.copysign(sagitta)) * sagitta.abs();
    Edge::three_point_arc(a, mid + bulge, b).ok_or_else(|| DraftError::Geometry("degenerate radius arc".into()))
}
