//! Line builder for scripting planar wire profiles and turning them into solids.
//!
//! A [`BuildLine`] owns a working plane and an ordered list of segments.
//! Steps are replayed one at a time: bare positions draw straight lines,
//! operation descriptors (`op_line`, `op_arc`, `op_close`, ...) build and
//! splice curves. The finished profile is handed to a [`GeometryKernel`]
//! for extrusion, revolution or sweeping.

pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod line;
pub mod plan;
pub mod position;
pub mod profile;
pub mod units;
pub mod wire;

pub use config::DraftConfig;
pub use error::{DraftError, DraftResult};
pub use geometry::{Axis, Curve, Edge, Plane, Point3, Vector3};
pub use kernel::{GeometryKernel, TruckKernel, TruckSolid};
pub use line::ops::*;
pub use line::{BuildLine, Step};
pub use position::*;
pub use profile::{Part, Profile};
pub use units::{LengthUnit, Material};
pub use wire::param::{param_on_point, param_on_point_abs, trim_wire};
pub use wire::Segment;

/// Resolve a signed index (`-1` is the last element).
pub(crate) fn signed_index(len: usize, idx: isize) -> Option<usize> {
    let i = if idx < 0 { len as isize + idx } else { idx };
    (0..len as isize).contains(&i).then_some(i as usize)
}
