//! Operation descriptors.
//!
//! Every builder operation is a plain value: a factory (`op_line()`,
//! `op_arc()`, ...) returns an argument struct, setters fill it in, and
//! `.op()` checks that the arguments can mean anything at all before
//! producing an [`OpDescriptor`]. Nothing is resolved until the descriptor
//! is applied to a [`BuildLine`](super::BuildLine), since positions depend on
//! where the profile has got to by then.
//!
//! ```
//! use draft_core::{op_arc, op_line, xx, BuildLine, Plane};
//!
//! # fn main() -> draft_core::DraftResult<()> {
//! let plan = vec![
//!     op_line().length(40.0).op()?,
//!     op_arc().radius(20.0).size(180.0).op()?.named("nose"),
//!     op_line().until(xx(0.0)).op()?,
//! ];
//! let mut lb = BuildLine::new(Plane::xy());
//! for op in &plan {
//!     op.apply(&mut lb)?;
//! }
//! assert!(lb.get_by_name("nose").is_some());
//! # Ok(())
//! # }
//! ```

use super::BuildLine;
use crate::error::{DraftError, DraftResult};
use crate::geometry::Axis;
use crate::position::{Position, Target};
use serde::{Deserialize, Serialize};

fn one() -> usize {
    1
}

fn last() -> isize {
    -1
}

fn is_last(idx: &isize) -> bool {
    *idx == -1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartArgs {
    pub start: Option<Position>,
    pub tangent: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineArgs {
    pub length: Option<f64>,
    /// Degrees, counter-clockwise about the plane normal.
    pub angle: Option<f64>,
    pub dir: Option<Position>,
    pub start: Option<Position>,
    pub to: Option<Position>,
    pub until: Option<Target>,
    pub tangent: Option<Position>,
}

/// Direction an arc leaves its start point in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcTangent {
    /// Continue the running tangent.
    #[default]
    Continue,
    /// No tangent constraint.
    Off,
    Direction(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcCenter {
    /// The current end point.
    End,
    At(Position),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcArgs {
    /// Negative radii flip the side of a radius arc.
    pub radius: Option<f64>,
    /// Sweep in degrees; the sign picks the turning direction.
    pub size: Option<f64>,
    pub to: Option<Position>,
    pub tangent: ArcTangent,
    /// Short or long way round for radius arcs.
    pub short: bool,
    pub center: Option<ArcCenter>,
    pub start_angle: Option<f64>,
    pub start: Option<Position>,
}

impl Default for ArcArgs {
    fn default() -> Self {
        Self {
            radius: None,
            size: None,
            to: None,
            tangent: ArcTangent::Continue,
            short: true,
            center: None,
            start_angle: None,
            start: None,
        }
    }
}

/// How an arc is constructed, picked from the arguments present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcMode {
    /// Radius and sweep, continuing the tangent.
    TangentSweep,
    /// Tangent arc to an explicit end point.
    TangentTo,
    /// Arc of a given radius to an end point.
    RadiusTo,
    /// Center, radius, start angle and sweep.
    Centered,
}

impl ArcArgs {
    pub fn mode(&self) -> Option<ArcMode> {
        let tangent = self.tangent != ArcTangent::Off;
        match (self.radius, self.size, self.to, self.center) {
            (Some(_), Some(_), _, None) if tangent => Some(ArcMode::TangentSweep),
            (_, _, Some(_), _) if tangent => Some(ArcMode::TangentTo),
            (Some(_), _, Some(_), _) => Some(ArcMode::RadiusTo),
            (Some(_), Some(_), _, Some(_)) => Some(ArcMode::Centered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseArcArgs {
    pub x_radius: f64,
    pub y_radius: f64,
    /// Degrees.
    pub start_angle: f64,
    pub end_angle: f64,
}

/// How far one side of a segment is lengthened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    Distance(f64),
    Until(Target),
}

impl From<f64> for Extension {
    fn from(d: f64) -> Self {
        Extension::Distance(d)
    }
}

impl From<Target> for Extension {
    fn from(t: Target) -> Self {
        Extension::Until(t)
    }
}

impl From<Position> for Extension {
    fn from(p: Position) -> Self {
        Extension::Until(p.into())
    }
}

impl From<Axis> for Extension {
    fn from(a: Axis) -> Self {
        Extension::Until(a.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendArgs {
    pub start: Option<Extension>,
    pub end: Option<Extension>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseArgs {
    pub both: Option<Target>,
    pub start: Option<Target>,
    pub end: Option<Target>,
    pub mirror: Option<Target>,
}

/// Where a trim cuts the last segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPoint {
    Point(Position),
    /// Crossing with a plane-local axis.
    Axis(Axis),
    /// Where a line from `target` touches the last arc.
    ByTangent(Position),
}

impl From<Position> for TrimPoint {
    fn from(p: Position) -> Self {
        match p {
            Position::Axis { axis } => TrimPoint::Axis(axis),
            other => TrimPoint::Point(other),
        }
    }
}

impl From<Axis> for TrimPoint {
    fn from(a: Axis) -> Self {
        TrimPoint::Axis(a)
    }
}

impl From<(f64, f64)> for TrimPoint {
    fn from(t: (f64, f64)) -> Self {
        TrimPoint::Point(t.into())
    }
}

/// Trim point where a tangent from `target` touches the last arc.
pub fn by_tangent(target: impl Into<Position>) -> TrimPoint {
    TrimPoint::ByTangent(target.into())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimArgs {
    pub point: TrimPoint,
    /// Candidates are ordered along this plane-local axis.
    #[serde(default = "Axis::y")]
    pub sort_by: Axis,
    #[serde(default = "last", skip_serializing_if = "is_last")]
    pub idx: isize,
    #[serde(default)]
    pub add: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilletArgs {
    pub radius: f64,
    #[serde(default = "one")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamferArgs {
    pub length: f64,
    #[serde(default = "one")]
    pub count: usize,
    #[serde(default)]
    pub length2: Option<f64>,
    /// Degrees between the incoming edge and the chamfer.
    #[serde(default)]
    pub angle: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropArgs {
    #[serde(default = "last")]
    pub idx: isize,
}

impl Default for DropArgs {
    fn default() -> Self {
        Self { idx: -1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveArgs {
    pub start: Option<Position>,
    pub end: Option<Position>,
}

/// One operation and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpKind {
    Start(StartArgs),
    Line(LineArgs),
    Arc(ArcArgs),
    EllipseArc(EllipseArcArgs),
    Extend(ExtendArgs),
    Close(CloseArgs),
    Trim(TrimArgs),
    Fillet(FilletArgs),
    Chamfer(ChamferArgs),
    Drop(DropArgs),
    Move(MoveArgs),
}

impl OpKind {
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Start(_) => "start",
            OpKind::Line(_) => "line",
            OpKind::Arc(_) => "arc",
            OpKind::EllipseArc(_) => "ellipse_arc",
            OpKind::Extend(_) => "extend",
            OpKind::Close(_) => "close",
            OpKind::Trim(_) => "trim",
            OpKind::Fillet(_) => "fillet",
            OpKind::Chamfer(_) => "chamfer",
            OpKind::Drop(_) => "drop",
            OpKind::Move(_) => "move",
        }
    }

    /// Reject argument sets no builder state could make sense of.
    pub fn validate(&self) -> DraftResult<()> {
        let op = self.name();
        match self {
            OpKind::Start(_) | OpKind::Close(_) | OpKind::Trim(_) | OpKind::Drop(_) => Ok(()),
            OpKind::Line(a) => {
                if a.to.is_none() && a.length.is_none() && a.until.is_none() {
                    return Err(DraftError::invalid(op, "needs `to`, `length` or `until`"));
                }
                Ok(())
            }
            OpKind::Arc(a) => {
                a.mode().ok_or(DraftError::NoConstructionMode)?;
                if let Some(r) = a.radius {
                    if r == 0.0 || !r.is_finite() {
                        return Err(DraftError::invalid(op, format!("radius must be finite and non-zero, got {r}")));
                    }
                }
                if a.size.is_some_and(|s| !s.is_finite()) {
                    return Err(DraftError::invalid(op, "size must be finite"));
                }
                Ok(())
            }
            OpKind::EllipseArc(a) => {
                if a.x_radius <= 0.0 || a.y_radius <= 0.0 {
                    return Err(DraftError::invalid(op, "radii must be positive"));
                }
                Ok(())
            }
            OpKind::Extend(a) => {
                if a.start.is_none() && a.end.is_none() {
                    return Err(DraftError::invalid(op, "needs `start` or `end`"));
                }
                Ok(())
            }
            OpKind::Fillet(a) => {
                if a.radius <= 0.0 {
                    return Err(DraftError::invalid(op, format!("radius must be positive, got {}", a.radius)));
                }
                if a.count == 0 {
                    return Err(DraftError::invalid(op, "count must be at least 1"));
                }
                Ok(())
            }
            OpKind::Chamfer(a) => {
                if a.length <= 0.0 {
                    return Err(DraftError::invalid(op, format!("length must be positive, got {}", a.length)));
                }
                if a.count == 0 {
                    return Err(DraftError::invalid(op, "count must be at least 1"));
                }
                if a.length2.is_some() && a.angle.is_some() {
                    return Err(DraftError::invalid(op, "`length2` and `angle` are exclusive"));
                }
                Ok(())
            }
            OpKind::Move(a) => {
                if a.start.is_none() && a.end.is_none() {
                    return Err(DraftError::invalid(op, "needs `start` or `end`"));
                }
                Ok(())
            }
        }
    }
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(flatten)]
    kind: OpKind,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    reverse: bool,
    #[serde(default)]
    connect: bool,
}

/// A validated operation ready to be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct OpDescriptor {
    #[serde(flatten)]
    pub kind: OpKind,
    /// Register the produced segment under this name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Flip the last chain afterwards.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reverse: bool,
    /// Bridge every gap between chains afterwards.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub connect: bool,
}

impl TryFrom<RawDescriptor> for OpDescriptor {
    type Error = DraftError;

    fn try_from(raw: RawDescriptor) -> DraftResult<Self> {
        let mut op = OpDescriptor::new(raw.kind)?;
        op.name = raw.name;
        op.reverse = raw.reverse;
        op.connect = raw.connect;
        Ok(op)
    }
}

impl OpDescriptor {
    pub fn new(kind: OpKind) -> DraftResult<Self> {
        kind.validate()?;
        Ok(Self { kind, name: None, reverse: false, connect: false })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn connected(mut self) -> Self {
        self.connect = true;
        self
    }

    pub fn apply(&self, lb: &mut BuildLine) -> DraftResult<()> {
        lb.apply_op(self)
    }
}

macro_rules! into_op {
    ($($args:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$args> for OpKind {
                fn from(a: $args) -> Self {
                    OpKind::$variant(a)
                }
            }

            impl $args {
                /// Validate and wrap into a descriptor.
                pub fn op(self) -> DraftResult<OpDescriptor> {
                    OpDescriptor::new(self.into())
                }
            }
        )*
    };
}

into_op! {
    StartArgs => Start,
    LineArgs => Line,
    ArcArgs => Arc,
    EllipseArcArgs => EllipseArc,
    ExtendArgs => Extend,
    CloseArgs => Close,
    TrimArgs => Trim,
    FilletArgs => Fillet,
    ChamferArgs => Chamfer,
    DropArgs => Drop,
    MoveArgs => Move,
}

pub fn op_start() -> StartArgs {
    StartArgs::default()
}

pub fn op_line() -> LineArgs {
    LineArgs::default()
}

pub fn op_arc() -> ArcArgs {
    ArcArgs::default()
}

pub fn op_ellipse_arc(x_radius: f64, y_radius: f64, start_angle: f64, end_angle: f64) -> EllipseArcArgs {
    EllipseArcArgs { x_radius, y_radius, start_angle, end_angle }
}

pub fn op_extend() -> ExtendArgs {
    ExtendArgs::default()
}

pub fn op_close() -> CloseArgs {
    CloseArgs::default()
}

pub fn op_trim(point: impl Into<TrimPoint>) -> TrimArgs {
    TrimArgs { point: point.into(), sort_by: Axis::y(), idx: -1, add: false }
}

pub fn op_fillet(radius: f64) -> FilletArgs {
    FilletArgs { radius, count: 1 }
}

pub fn op_chamfer(length: f64) -> ChamferArgs {
    ChamferArgs { length, count: 1, length2: None, angle: None }
}

pub fn op_drop() -> DropArgs {
    DropArgs::default()
}

pub fn op_move() -> MoveArgs {
    MoveArgs::default()
}

impl StartArgs {
    pub fn start(mut self, p: impl Into<Position>) -> Self {
        self.start = Some(p.into());
        self
    }

    pub fn tangent(mut self, d: impl Into<Position>) -> Self {
        self.tangent = Some(d.into());
        self
    }
}

impl LineArgs {
    pub fn length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    pub fn dir(mut self, d: impl Into<Position>) -> Self {
        self.dir = Some(d.into());
        self
    }

    pub fn start(mut self, p: impl Into<Position>) -> Self {
        self.start = Some(p.into());
        self
    }

    pub fn to(mut self, p: impl Into<Position>) -> Self {
        self.to = Some(p.into());
        self
    }

    pub fn until(mut self, t: impl Into<Target>) -> Self {
        self.until = Some(t.into());
        self
    }

    pub fn tangent(mut self, d: impl Into<Position>) -> Self {
        self.tangent = Some(d.into());
        self
    }
}

impl ArcArgs {
    pub fn radius(mut self, r: f64) -> Self {
        self.radius = Some(r);
        self
    }

    pub fn size(mut self, degrees: f64) -> Self {
        self.size = Some(degrees);
        self
    }

    pub fn to(mut self, p: impl Into<Position>) -> Self {
        self.to = Some(p.into());
        self
    }

    /// Leave along `d` instead of the running tangent.
    pub fn tangent(mut self, d: impl Into<Position>) -> Self {
        self.tangent = ArcTangent::Direction(d.into());
        self
    }

    pub fn no_tangent(mut self) -> Self {
        self.tangent = ArcTangent::Off;
        self
    }

    pub fn long(mut self) -> Self {
        self.short = false;
        self
    }

    pub fn center(mut self, c: impl Into<Position>) -> Self {
        self.center = Some(ArcCenter::At(c.into()));
        self
    }

    /// Center the arc on the current end point.
    pub fn center_at_end(mut self) -> Self {
        self.center = Some(ArcCenter::End);
        self
    }

    pub fn start_angle(mut self, degrees: f64) -> Self {
        self.start_angle = Some(degrees);
        self
    }

    pub fn start(mut self, p: impl Into<Position>) -> Self {
        self.start = Some(p.into());
        self
    }
}

impl ExtendArgs {
    pub fn start(mut self, e: impl Into<Extension>) -> Self {
        self.start = Some(e.into());
        self
    }

    pub fn end(mut self, e: impl Into<Extension>) -> Self {
        self.end = Some(e.into());
        self
    }
}

impl CloseArgs {
    pub fn both(mut self, t: impl Into<Target>) -> Self {
        self.both = Some(t.into());
        self
    }

    pub fn start(mut self, t: impl Into<Target>) -> Self {
        self.start = Some(t.into());
        self
    }

    pub fn end(mut self, t: impl Into<Target>) -> Self {
        self.end = Some(t.into());
        self
    }

    pub fn mirror(mut self, t: impl Into<Target>) -> Self {
        self.mirror = Some(t.into());
        self
    }
}

impl TrimArgs {
    pub fn sort_by(mut self, axis: Axis) -> Self {
        self.sort_by = axis;
        self
    }

    pub fn idx(mut self, idx: isize) -> Self {
        self.idx = idx;
        self
    }

    /// Also append the cut-off connector.
    pub fn add(mut self) -> Self {
        self.add = true;
        self
    }
}

impl FilletArgs {
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

impl ChamferArgs {
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn length2(mut self, length: f64) -> Self {
        self.length2 = Some(length);
        self
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }
}

impl DropArgs {
    pub fn idx(mut self, idx: isize) -> Self {
        self.idx = idx;
        self
    }
}

impl MoveArgs {
    pub fn start(mut self, p: impl Into<Position>) -> Self {
        self.start = Some(p.into());
        self
    }

    pub fn end(mut self, p: impl Into<Position>) -> Self {
        self.end = Some(p.into());
        self
    }
}
