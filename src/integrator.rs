use crate::error::PhaseError;
use crate::ode::{PlanarSystem, State};
use phase_common::TimingConfig;

// Tolerance on `(t_end - t0) / step` when deciding whether the last grid point
// lands on `t_end` or one step past it.
const GRID_EPSILON: f64 = 1e-9;

/// Uniform time grid `t0, t0 + h, t0 + 2h, ...` reaching `t_end`.
///
/// The grid owns the step size; [`integrate`] reads `h` from here so the
/// trajectory indices can never drift from the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    t0: f64,
    step: f64,
    len: usize,
}

impl TimeGrid {
    /// Builds the grid covering `[t0, t_end]`. When the span is not a whole
    /// number of steps the final point lies just past `t_end`.
    pub fn new(t0: f64, t_end: f64, step: f64) -> Result<Self, PhaseError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(PhaseError::InvalidTimeGrid(format!(
                "step must be positive and finite, got {step}"
            )));
        }
        if !t0.is_finite() || !t_end.is_finite() {
            return Err(PhaseError::InvalidTimeGrid("time bounds must be finite".to_string()));
        }
        if t_end < t0 {
            return Err(PhaseError::InvalidTimeGrid(format!(
                "t_end ({t_end}) precedes t0 ({t0})"
            )));
        }

        let span = (t_end - t0) / step;
        let intervals = (span - GRID_EPSILON).ceil().max(0.0);
        if intervals >= (usize::MAX - 1) as f64 {
            return Err(PhaseError::InvalidTimeGrid(format!("{span} steps do not fit in memory")));
        }

        Ok(Self { t0, step, len: intervals as usize + 1 })
    }

    pub fn from_timing(timing: &TimingConfig) -> Result<Self, PhaseError> {
        Self::new(timing.t0, timing.t_end, timing.step)
    }

    /// Number of grid points, always at least one.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn start(&self) -> f64 {
        self.t0
    }

    pub fn end(&self) -> f64 {
        self.time_at(self.len - 1)
    }

    /// Time of point `index`, computed directly rather than by accumulation.
    pub fn time_at(&self, index: usize) -> f64 {
        self.t0 + index as f64 * self.step
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.time_at(i))
    }
}

/// Componentwise bounding box of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: State,
    pub max: State,
}

/// Ordered states, one per grid point. The first state is the initial condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Vec<State>,
}

impl Trajectory {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<State> {
        self.states.first().copied()
    }

    pub fn last(&self) -> Option<State> {
        self.states.last().copied()
    }

    /// Index of the first state with an infinite or NaN component.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.states.iter().position(|s| !s.is_finite())
    }

    /// Observed min/max per axis.
    ///
    /// Rejects empty and diverged trajectories: `f64::min` would silently
    /// skip NaN and produce bounds that hide the blow-up.
    pub fn bounds(&self) -> Result<Bounds, PhaseError> {
        if let Some(index) = self.first_non_finite() {
            return Err(PhaseError::NonFiniteExtent { index });
        }
        let (first, rest) = self.states.split_first().ok_or(PhaseError::EmptyTrajectory)?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), s| (lo.min(*s), hi.max(*s)));
        Ok(Bounds { min, max })
    }
}

/// One classical RK4 step of size `h` from `(t, x)`.
pub fn rk4_step<S: PlanarSystem + ?Sized>(system: &S, t: f64, x: State, h: f64) -> State {
    let half = 0.5 * h;
    let k1 = system.derivative(t, x);
    let k2 = system.derivative(t + half, x + k1 * half);
    let k3 = system.derivative(t + half, x + k2 * half);
    let k4 = system.derivative(t + h, x + k3 * h);

    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
}

/// Integrates `system` over `grid` from `initial`.
///
/// State `i + 1` is one RK4 step from state `i`, taken at grid time `i`.
/// Divergence is not trapped: overflowed states stay in the output as
/// infinities or NaN.
pub fn integrate<S: PlanarSystem + ?Sized>(
    system: &S,
    grid: &TimeGrid,
    initial: State,
) -> Trajectory {
    let h = grid.step();
    let mut states = Vec::with_capacity(grid.len());
    let mut x = initial;
    states.push(x);

    for s in grid.iter().take(grid.len() - 1) {
        x = rk4_step(system, s, x, h);
        states.push(x);
    }

    log::trace!("Integrated {} states, final state {:?}", states.len(), x);
    Trajectory { states }
}
