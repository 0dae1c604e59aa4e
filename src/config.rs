//! Immutable defaults shared across the solver.
//!
//! Collects tunable numerical constants into one place rather than
//! scattering them as magic numbers through the solver's phases.

/// Numerical tolerance used wherever "close enough to zero" matters:
/// sub-step loop termination, degenerate-direction checks, etc.
pub const EPSILON: f32 = 1e-9;

/// Default target density of water (kg/m^d).
pub const DEFAULT_TARGET_DENSITY: f32 = 1000.0;

/// Default particle spacing (m).
pub const DEFAULT_TARGET_SPACING: f32 = 0.02;

/// Default ratio of kernel radius to target spacing.
pub const DEFAULT_KERNEL_RADIUS_OVER_SPACING: f32 = 1.8;

/// Default Tait equation-of-state exponent (stiffness).
pub const DEFAULT_EOS_EXPONENT: f32 = 7.0;

/// Default fraction of negative pressure retained (0 = clamp to zero).
pub const DEFAULT_NEGATIVE_PRESSURE_SCALE: f32 = 0.0;

/// Default numerical speed of sound used for time-step stiffness.
pub const DEFAULT_SPEED_OF_SOUND: f32 = 100.0;

/// Default scale applied to the adaptive time-step limit.
pub const DEFAULT_TIME_STEP_LIMIT_SCALE: f32 = 1.0;

/// Default collider restitution coefficient.
pub const DEFAULT_RESTITUTION: f32 = 0.0;

/// Default collider friction coefficient.
pub const DEFAULT_FRICTION: f32 = 0.0;

/// Minimum hash-grid resolution on any axis.
pub const MIN_GRID_RESOLUTION: i32 = 1;

/// Sentinel value marking an empty hash-grid bucket.
pub const EMPTY_BUCKET: usize = usize::MAX;

/// `bySpeed` coefficient in the adaptive time-step heuristic.
pub const TIME_STEP_SPEED_FACTOR: f32 = 0.4;

/// `byForce` coefficient in the adaptive time-step heuristic.
pub const TIME_STEP_FORCE_FACTOR: f32 = 0.25;
