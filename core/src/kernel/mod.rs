//! Kernel abstraction layer for solid modelling.
//!
//! Finished profiles are handed to a [`GeometryKernel`] to become solids.
//! The trait keeps the builder independent of the kernel behind it; Truck
//! is the default implementation.

pub mod types;
mod truck;

#[cfg(test)]
mod tests_truck;

pub use truck::TruckKernel;
pub use types::*;

use crate::geometry::Edge;
use crate::profile::Profile;
use thiserror::Error;

/// Errors that can occur during kernel operations.
#[derive(Debug, Error, Clone)]
pub enum KernelOpError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelOpError>;

/// Abstract interface for the solid-modelling operations a finished
/// profile needs.
pub trait GeometryKernel: Send + Sync {
    /// The kernel's internal solid representation.
    type Solid;

    /// Extrude a closed profile into a prism.
    fn extrude_profile(&self, profile: &Profile, params: &ExtrudeParams) -> KernelResult<Self::Solid>;

    /// Revolve a closed profile about an axis lying in its plane.
    fn revolve_profile(&self, profile: &Profile, params: &RevolveParams) -> KernelResult<Self::Solid>;

    /// Sweep a closed profile along a path.
    ///
    /// The profile must sit at the path start, its plane normal along the
    /// first tangent.
    fn sweep_profile(&self, profile: &Profile, path: &[Edge]) -> KernelResult<Self::Solid>;

    /// Compute the union of two solids (A ∪ B).
    fn boolean_union(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid>;

    /// Convert a solid to a triangle mesh.
    fn tessellate(&self, solid: &Self::Solid) -> KernelResult<TriangleMesh>;

    /// Export a solid to STEP format and return as a string.
    fn export_step(&self, solid: &Self::Solid) -> KernelResult<String>;
}

/// Solid type produced by the default kernel.
pub type TruckSolid = <TruckKernel as GeometryKernel>::Solid;

/// Get the default kernel implementation.
pub fn default_kernel() -> TruckKernel {
    TruckKernel::new()
}
