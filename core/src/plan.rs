//! Serialized part plans.
//!
//! A plan is the declarative form of a build script: a working plane, an
//! optional start, the ordered steps and how to turn the profile into a
//! solid. Plans are plain JSON so they can be written by hand or emitted by
//! other tools.
//!
//! ```
//! use draft_core::plan::PartPlan;
//!
//! # fn main() -> draft_core::DraftResult<()> {
//! let plan = PartPlan::from_json(r#"{
//!     "steps": [
//!         {"to": {"kind": "offset", "offset": [10.0, 0.0, 0.0]}},
//!         {"to": {"kind": "offset", "offset": [0.0, 5.0, 0.0]}},
//!         {"op": {"op": "close"}}
//!     ],
//!     "finish": {"extrude": {"amount": 2.0}}
//! }"#)?;
//! let lb = plan.line()?;
//! assert_eq!(lb.len(), 3);
//! assert!((lb.face()?.area() - 25.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

use crate::config::DraftConfig;
use crate::error::DraftResult;
use crate::geometry::{Axis, Plane};
use crate::kernel::TruckSolid;
use crate::line::{BuildLine, Step};
use crate::position::Position;
use crate::profile::{Part, Profile};
use serde::{Deserialize, Serialize};
use tracing::info;

fn full_turn() -> f64 {
    360.0
}

/// Cross-section for sweeps, built on the XY plane and carried to the path start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
    Ellipse { x_radius: f64, y_radius: f64 },
}

impl Section {
    pub fn profile(&self) -> Profile {
        match *self {
            Section::Circle { radius } => Profile::circle(Plane::xy(), radius),
            Section::Rectangle { width, height } => Profile::rectangle(Plane::xy(), width, height),
            Section::Ellipse { x_radius, y_radius } => Profile::ellipse(Plane::xy(), x_radius, y_radius),
        }
    }
}

/// What to make of the finished profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Extrude {
        amount: f64,
        #[serde(default)]
        both: bool,
    },
    /// Revolve about a plane-local axis.
    Revolve {
        axis: Axis,
        #[serde(default = "full_turn")]
        degrees: f64,
    },
    RevolveX,
    RevolveY,
    RevolveZ,
    /// Sweep a section along the profile.
    Sweep { section: Section },
}

/// A build script in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPlan {
    #[serde(default)]
    pub plane: Plane,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangent: Option<Position>,
    #[serde(default)]
    pub config: DraftConfig,
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<Finish>,
}

impl PartPlan {
    pub fn from_json(json: &str) -> DraftResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DraftResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replay the steps on a fresh builder.
    pub fn line(&self) -> DraftResult<BuildLine> {
        let mut lb = match self.start {
            Some(start) => BuildLine::starting_at(self.plane, start),
            None => BuildLine::new(self.plane),
        }
        .with_config(self.config);
        if let Some(tangent) = self.tangent {
            lb = lb.with_tangent(tangent);
        }
        lb.append(self.steps.iter().cloned())?;
        info!(segments = lb.len(), "replayed plan");
        Ok(lb)
    }

    /// Apply the finish to an already replayed builder.
    pub fn finish(&self, lb: &BuildLine) -> DraftResult<Option<Part<TruckSolid>>> {
        let Some(finish) = self.finish else {
            return Ok(None);
        };
        let part = match finish {
            Finish::Extrude { amount, both } => lb.extrude(amount, both)?,
            Finish::Revolve { axis, degrees } => lb.revolve(&axis, degrees)?,
            Finish::RevolveX => lb.revolve_x()?,
            Finish::RevolveY => lb.revolve_y()?,
            Finish::RevolveZ => lb.revolve_z()?,
            Finish::Sweep { section } => lb.sweep(&section.profile())?,
        };
        info!(volume = part.volume, unit = %part.unit, "built part");
        Ok(Some(part))
    }
}
