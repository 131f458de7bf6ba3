use crate::error::PhaseError;
use phase_common::{SystemParams, Vec2};

/// Phase-plane state `(x1, x2)`: position and velocity.
pub type State = Vec2;

/// A planar ODE `x' = f(t, x)`.
///
/// Implementations must be pure; the field sampler calls them from several
/// threads at once.
pub trait PlanarSystem: Sync {
    /// Evaluates the right-hand side at time `t` and state `x`.
    fn derivative(&self, t: f64, x: State) -> State;

    /// Like [`PlanarSystem::derivative`], but for an untyped state slice.
    fn evaluate(&self, t: f64, x: &[f64]) -> Result<State, PhaseError> {
        let state = state_from_slice(x)?;
        Ok(self.derivative(t, state))
    }
}

impl<F> PlanarSystem for F
where
    F: Fn(f64, State) -> State + Sync,
{
    fn derivative(&self, t: f64, x: State) -> State {
        self(t, x)
    }
}

/// Builds a state from exactly two components.
pub fn state_from_slice(values: &[f64]) -> Result<State, PhaseError> {
    match values {
        [x1, x2] => Ok(State::new(*x1, *x2)),
        _ => Err(PhaseError::InvalidStateDimension(values.len())),
    }
}

/// Unforced, damped Duffing oscillator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Duffing {
    params: SystemParams,
}

impl Duffing {
    pub fn new(params: SystemParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SystemParams {
        &self.params
    }
}

impl PlanarSystem for Duffing {
    fn derivative(&self, _t: f64, x: State) -> State {
        let SystemParams { alpha, beta, delta, .. } = self.params;
        let (x1, x2) = (x.x, x.y);
        State::new(x2, -delta * x2 - beta * x1 * x1 * x1 - alpha * x1)
    }
}
