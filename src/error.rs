//! Construction-time error taxonomy.
//!
//! Nothing on the solver hot path is fallible; these variants are only
//! ever returned from constructors that can be handed nonsensical
//! configuration.

use thiserror::Error;

/// Errors raised while constructing solver components.
#[derive(Debug, Error)]
pub enum SphError {
    #[error("target spacing must be positive, got {0}")]
    NonPositiveSpacing(f32),

    #[error("kernel radius ratio must be >= 1.0, got {0}")]
    InvalidKernelRatio(f32),

    #[error("surface set must contain at least one surface for a bounded emitter")]
    EmptySurfaceSet,

    #[error("degenerate box surface: lower bound must be <= upper bound on every axis")]
    DegenerateBox,

    #[error("bounding box lower bound must be <= upper bound on every axis")]
    DegenerateBoundingBox,

    #[error("hash grid resolution must be >= 1 on every axis, got ({0}, {1}, {2})")]
    InvalidGridResolution(i32, i32, i32),

    #[error("grid spacing must be positive, got {0}")]
    NonPositiveGridSpacing(f32),
}

/// Result alias for fallible construction paths.
pub type SphResult<T> = Result<T, SphError>;
