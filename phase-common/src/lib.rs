pub mod config;
pub mod params;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    AngleMode, InitialConditions, MeshConfig, PhasePortraitConfig, StyleConfig, SystemConfig,
    TimingConfig,
};
pub use params::SystemParams;
pub use vecmath::{angle_to_vec, vec_to_angle, Vec2};
