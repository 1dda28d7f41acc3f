//! Builder configuration.

use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};

/// Tolerances and units shared by a builder and the kernel it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Distance under which two points are the same vertex. Used for chain
    /// detection and fillet/chamfer vertex matching.
    pub tolerance: f64,
    /// Chord tolerance for kernel tessellation.
    pub kernel_tolerance: f64,
    /// Unit the script's numbers are written in.
    pub unit: LengthUnit,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            kernel_tolerance: 0.01,
            unit: LengthUnit::Millimeter,
        }
    }
}

impl DraftConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_kernel_tolerance(mut self, tolerance: f64) -> Self {
        self.kernel_tolerance = tolerance;
        self
    }

    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }
}
