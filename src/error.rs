use thiserror::Error;

/// Failures raised by the evaluator, integrator and field sampler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhaseError {
    #[error("invalid state dimension: expected 2 components, got {0}")]
    InvalidStateDimension(usize),

    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),

    /// The field vanishes at the query point, so no direction exists.
    #[error("degenerate field direction at ({x1}, {x2}): field vector is zero")]
    DegenerateDirection { x1: f64, x2: f64 },

    #[error("non-finite field vector at ({x1}, {x2})")]
    NonFiniteField { x1: f64, x2: f64 },

    #[error("trajectory has no states")]
    EmptyTrajectory,

    /// First trajectory index holding an infinite or NaN component.
    #[error("trajectory diverged: state {index} is not finite")]
    NonFiniteExtent { index: usize },

    #[error("mesh bounds are not finite")]
    NonFiniteBounds,

    #[error("trajectory has zero extent along x{axis}")]
    ZeroExtent { axis: usize },

    #[error("mesh density must be at least 2, got {0}")]
    InvalidMeshDensity(usize),
}
