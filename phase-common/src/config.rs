use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use crate::params::SystemParams;
use std::path::Path;

// Physical constants of the oscillator; every field falls back to the textbook values.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_delta")]
    pub delta: f64,
    #[serde(default = "default_omega")]
    pub omega: f64,
}

// Configuration for the integration time span
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    #[serde(default)]
    pub t0: f64,
    pub t_end: f64,
    /// Step size shared by the time grid and the integrator.
    #[serde(default = "default_step")]
    pub step: f64,
}

// Initial conditions for the trajectory, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    /// Raw state components; the engine checks that exactly two are given.
    pub state: Vec<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    /// Single-argument arctangent of `v2 / v1`. Opposite field directions
    /// collapse onto the same angle.
    #[default]
    Principal,
    /// Two-argument arctangent; segment ends point downstream.
    Quadrant,
}

// Vector-field sampling settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MeshConfig {
    #[serde(default = "default_density")]
    pub density: usize,
    #[serde(default)]
    pub angle_mode: AngleMode,
}

// Output figure settings. Colors are names or `#rrggbb` hex codes.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StyleConfig {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_trajectory_color")]
    pub trajectory: String,
    #[serde(default = "default_mesh_color")]
    pub mesh: String,
    #[serde(default = "default_field_color")]
    pub field: String,
    #[serde(default = "default_figure_size")]
    pub width: u32,
    #[serde(default = "default_figure_size")]
    pub height: u32,
    #[serde(default = "default_axis_labels")]
    pub axis_labels: bool,
}

// Main configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhasePortraitConfig {
    #[serde(default)]
    pub system: SystemConfig,
    pub timing: TimingConfig,
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
            delta: default_delta(),
            omega: default_omega(),
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        MeshConfig {
            density: default_density(),
            angle_mode: AngleMode::Principal,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            background: default_background(),
            trajectory: default_trajectory_color(),
            mesh: default_mesh_color(),
            field: default_field_color(),
            width: default_figure_size(),
            height: default_figure_size(),
            axis_labels: default_axis_labels(),
        }
    }
}

impl PhasePortraitConfig {
    /// Loads the configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid configuration in '{}'", path_ref.display()))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: PhasePortraitConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        if !timing.step.is_finite() || timing.step <= 0.0 {
            anyhow::bail!("timing.step must be positive and finite, got {}.", timing.step);
        }
        if !timing.t0.is_finite() || !timing.t_end.is_finite() {
            anyhow::bail!("timing.t0 and timing.t_end must be finite.");
        }
        if timing.t_end <= timing.t0 {
            anyhow::bail!(
                "timing.t_end ({}) must be greater than timing.t0 ({}).",
                timing.t_end,
                timing.t0
            );
        }
        if self.initial_conditions.state.iter().any(|v| !v.is_finite()) {
            anyhow::bail!("initial_conditions.state must contain only finite values.");
        }
        let s = &self.system;
        if [s.alpha, s.beta, s.gamma, s.delta, s.omega].iter().any(|v| !v.is_finite()) {
            anyhow::bail!("system parameters must be finite.");
        }
        if self.mesh.density < 2 {
            anyhow::bail!("mesh.density must be at least 2, got {}.", self.mesh.density);
        }
        if self.style.width == 0 || self.style.height == 0 {
            anyhow::bail!("style.width and style.height must be greater than 0.");
        }
        Ok(())
    }

    /// Converts the configuration into the parameters used by the evaluator.
    pub fn get_system_params(&self) -> SystemParams {
        SystemParams {
            alpha: self.system.alpha,
            beta: self.system.beta,
            gamma: self.system.gamma,
            delta: self.system.delta,
            omega: self.system.omega,
        }
    }
}

fn default_alpha() -> f64 {
    SystemParams::default().alpha
}

fn default_beta() -> f64 {
    SystemParams::default().beta
}

fn default_gamma() -> f64 {
    SystemParams::default().gamma
}

fn default_delta() -> f64 {
    SystemParams::default().delta
}

fn default_omega() -> f64 {
    SystemParams::default().omega
}

fn default_step() -> f64 {
    0.001
}

fn default_density() -> usize {
    30
}

fn default_background() -> String {
    "black".to_string()
}

fn default_trajectory_color() -> String {
    "yellow".to_string()
}

fn default_mesh_color() -> String {
    "white".to_string()
}

fn default_field_color() -> String {
    "cyan".to_string()
}

fn default_figure_size() -> u32 {
    800 // Square figure
}

fn default_axis_labels() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [timing]
        t_end = 10.0

        [initial_conditions]
        state = [0.0, 1.0]
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = PhasePortraitConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.timing.t0, 0.0);
        assert_eq!(config.timing.step, 0.001);
        assert_eq!(config.mesh.density, 30);
        assert_eq!(config.mesh.angle_mode, AngleMode::Principal);
        assert_eq!(config.style.background, "black");
        assert_eq!((config.style.width, config.style.height), (800, 800));
        assert_eq!(config.get_system_params(), SystemParams::default());
    }

    #[test]
    fn parses_every_section() {
        // Hex colors contain `"#`, so this needs the `r##` delimiter.
        let text = r##"
            [system]
            alpha = 1.0
            delta = 0.25

            [timing]
            t0 = 1.0
            t_end = 2.0
            step = 0.01

            [initial_conditions]
            state = [0.5, -0.5]

            [mesh]
            density = 12
            angle_mode = "quadrant"

            [style]
            background = "#101010"
            axis_labels = false
        "##;
        let config = PhasePortraitConfig::from_toml_str(text).unwrap();
        let params = config.get_system_params();
        assert_eq!(params.alpha, 1.0);
        assert_eq!(params.delta, 0.25);
        assert_eq!(params.beta, 2.0 / 3.0);
        assert_eq!(config.timing.step, 0.01);
        assert_eq!(config.initial_conditions.state, vec![0.5, -0.5]);
        assert_eq!(config.mesh.density, 12);
        assert_eq!(config.mesh.angle_mode, AngleMode::Quadrant);
        assert_eq!(config.style.background, "#101010");
        assert_eq!(config.style.trajectory, "yellow");
        assert!(!config.style.axis_labels);
    }

    #[test]
    fn rejects_non_positive_step() {
        let text = MINIMAL.replace("t_end = 10.0", "t_end = 10.0\nstep = 0.0");
        let err = PhasePortraitConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("timing.step"));
    }

    #[test]
    fn rejects_reversed_time_span() {
        let text = MINIMAL.replace("t_end = 10.0", "t0 = 5.0\nt_end = 1.0");
        let err = PhasePortraitConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("t_end"));
    }

    #[test]
    fn rejects_sparse_mesh() {
        let text = format!("{MINIMAL}\n[mesh]\ndensity = 1\n");
        let err = PhasePortraitConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("mesh.density"));
    }

    #[test]
    fn rejects_unknown_angle_mode() {
        let text = format!("{MINIMAL}\n[mesh]\nangle_mode = \"sideways\"\n");
        assert!(PhasePortraitConfig::from_toml_str(&text).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PhasePortraitConfig::load("does/not/exist.toml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
