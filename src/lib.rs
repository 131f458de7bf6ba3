//! RK4 integration and vector-field sampling for a damped Duffing oscillator.
//!
//! [`integrate`] produces the phase-plane trajectory over a [`TimeGrid`];
//! [`MeshGrid`] lays a lattice over its extent and [`sample_mesh`] turns every
//! lattice point into a short [`FieldSegment`] along the local flow.

pub mod error;
pub mod field;
pub mod grid;
pub mod integrator;
pub mod ode;

pub use error::PhaseError;
pub use field::{sample_field_segment, sample_mesh, FieldSegment};
pub use grid::{linspace, MeshGrid};
pub use integrator::{integrate, rk4_step, Bounds, TimeGrid, Trajectory};
pub use ode::{state_from_slice, Duffing, PlanarSystem, State};
