use anyhow::Result;
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use log::{debug, info, warn};
use phase_common::{AngleMode, PhasePortraitConfig};
use std::path::PathBuf;
use std::time::Instant;

mod portrait;
mod render;

use portrait::build_portrait;
use render::render_phase_portrait;

/// Command-line arguments for the phase-portrait renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config.toml file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Output image file path (.png)
    #[arg(short, long, default_value = "phase_portrait.png")]
    output: PathBuf,

    /// Width of the output image in pixels (overrides style.width)
    #[arg(long)]
    width: Option<u32>,

    /// Height of the output image in pixels (overrides style.height)
    #[arg(long)]
    height: Option<u32>,

    /// How field segment angles are computed (overrides mesh.angle_mode)
    #[arg(long, value_enum)]
    angle_mode: Option<AngleModeArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AngleModeArg {
    /// atan(v2 / v1): opposite directions draw identically
    Principal,
    /// atan2(v2, v1): segment ends point downstream
    Quadrant,
}

impl From<AngleModeArg> for AngleMode {
    fn from(arg: AngleModeArg) -> Self {
        match arg {
            AngleModeArg::Principal => AngleMode::Principal,
            AngleModeArg::Quadrant => AngleMode::Quadrant,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    Builder::from_env(Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

/// Applies command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut PhasePortraitConfig, args: &Args) -> Result<()> {
    if let Some(width) = args.width {
        config.style.width = width;
    }
    if let Some(height) = args.height {
        config.style.height = height;
    }
    if let Some(mode) = args.angle_mode {
        config.mesh.angle_mode = mode.into();
    }
    if config.style.width == 0 || config.style.height == 0 {
        anyhow::bail!("Image dimensions must be greater than 0.");
    }
    Ok(())
}

fn run_with_args(args: Args) -> Result<()> {
    info!("Starting Phase Portrait Renderer...");
    info!("Config file: {}", args.config.display());
    info!("Output image: {}", args.output.display());

    let mut config = PhasePortraitConfig::load(&args.config)?;
    apply_overrides(&mut config, &args)?;
    debug!("Configuration: {:#?}", config);

    info!("Using {} Rayon threads.", rayon::current_num_threads());
    info!("Image dimensions: {}x{}", config.style.width, config.style.height);

    let start_time = Instant::now();
    let portrait = build_portrait(&config)?;
    if !portrait.skipped.is_empty() {
        warn!(
            "Skipped {} mesh points with no field direction: {:?}",
            portrait.skipped.len(),
            portrait.skipped_points()
        );
    }
    render_phase_portrait(&args.output, &portrait, &config.style)?;

    info!("Done in {:.2?}.", start_time.elapsed());
    Ok(())
}

// Unit tests
#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["phase-visualizer"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let args = args(&[]);
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert_eq!(args.output, PathBuf::from("phase_portrait.png"));
        assert!(args.width.is_none() && args.angle_mode.is_none());
    }

    #[test]
    fn overrides_win_over_config() {
        let mut config = PhasePortraitConfig::from_toml_str(
            "[timing]\nt_end = 1.0\n[initial_conditions]\nstate = [0.0, 1.0]\n",
        )
        .unwrap();
        let args = args(&["--width", "640", "--angle-mode", "quadrant"]);
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(config.style.width, 640);
        assert_eq!(config.style.height, 800);
        assert_eq!(config.mesh.angle_mode, AngleMode::Quadrant);
    }

    #[test]
    fn zero_size_override_is_rejected() {
        let mut config = PhasePortraitConfig::from_toml_str(
            "[timing]\nt_end = 1.0\n[initial_conditions]\nstate = [0.0, 1.0]\n",
        )
        .unwrap();
        assert!(apply_overrides(&mut config, &args(&["--height", "0"])).is_err());
    }

    #[test]
    fn rejects_unknown_angle_mode() {
        assert!(Args::try_parse_from(["phase-visualizer", "--angle-mode", "sideways"]).is_err());
    }
}
