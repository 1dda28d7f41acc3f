//! Error types for profile construction.

use crate::kernel::KernelOpError;
use thiserror::Error;

/// Errors raised while building or finishing a profile.
///
/// Precondition variants describe a malformed script and are never worth
/// retrying; `NotFound` reports a geometric search that came up empty;
/// `Kernel` carries solid-modelling failures through unchanged.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("invalid arguments for {op}: {reason}")]
    InvalidArguments { op: &'static str, reason: String },

    #[error("no arc construction mode matches the given arguments")]
    NoConstructionMode,

    #[error("position has no default normal direction")]
    MissingNormal,

    #[error("trim would remove every edge")]
    DegenerateTrim,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("profile has no segments")]
    EmptyProfile,

    #[error("profile is not closed: {0}")]
    OpenProfile(String),

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("invalid plan: {0}")]
    Plan(#[from] serde_json::Error),

    #[error(transparent)]
    Kernel(#[from] KernelOpError),
}

impl DraftError {
    pub fn invalid(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments { op, reason: reason.into() }
    }

    /// True for errors caused by the caller's script rather than geometry.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidArguments { .. }
                | Self::NoConstructionMode
                | Self::MissingNormal
                | Self::DegenerateTrim
                | Self::EmptyProfile
                | Self::Plan(_)
        )
    }
}

/// Result type for profile construction.
pub type DraftResult<T> = Result<T, DraftError>;
