use serde::{Deserialize, Serialize};

/// Physical constants of the Duffing oscillator, derived from the configuration.
///
/// The right-hand side reads `x1' = x2`, `x2' = -delta*x2 - beta*x1^3 - alpha*x1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemParams {
    pub alpha: f64, // Linear stiffness
    pub beta: f64,  // Cubic stiffness
    pub gamma: f64, // Forcing amplitude, reserved: the unforced system ignores it
    pub delta: f64, // Damping
    pub omega: f64, // Forcing frequency, reserved
}

impl Default for SystemParams {
    fn default() -> Self {
        SystemParams {
            alpha: 0.5,
            beta: 2.0 / 3.0,
            gamma: 5.0 / 6.0,
            delta: 1.0 / 8.0,
            omega: 10.0,
        }
    }
}
