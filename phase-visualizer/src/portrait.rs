use anyhow::{Context, Result};
use log::{debug, info};
use phase_common::{AngleMode, PhasePortraitConfig, Vec2};
use phase_engine::{
    integrate, sample_mesh, state_from_slice, Duffing, FieldSegment, MeshGrid, PhaseError, TimeGrid,
    Trajectory,
};
use std::time::Instant;

// Number of leading grid times echoed at debug level.
const GRID_PREVIEW_LEN: usize = 5;

/// Everything the renderer draws, computed once per run.
pub struct PhasePortrait {
    pub trajectory: Trajectory,
    pub mesh: MeshGrid,
    pub segments: Vec<FieldSegment>,
    /// Mesh points where the field had no usable direction.
    pub skipped: Vec<PhaseError>,
    pub angle_mode: AngleMode,
}

impl PhasePortrait {
    /// Mesh points that got no field segment.
    pub fn skipped_points(&self) -> Vec<Vec2> {
        self.skipped
            .iter()
            .filter_map(|e| match *e {
                PhaseError::DegenerateDirection { x1, x2 }
                | PhaseError::NonFiniteField { x1, x2 } => Some(Vec2::new(x1, x2)),
                _ => None,
            })
            .collect()
    }
}

/// Integrates the configured system and samples its field over the trajectory's extent.
pub fn build_portrait(config: &PhasePortraitConfig) -> Result<PhasePortrait> {
    let system = Duffing::new(config.get_system_params());
    debug!("System parameters: {:#?}", system.params());

    let initial = state_from_slice(&config.initial_conditions.state)
        .context("Invalid initial_conditions.state")?;
    let grid = TimeGrid::from_timing(&config.timing).context("Invalid timing section")?;
    info!(
        "Time grid: {} points from t = {:.4} to t = {:.4} (h = {})",
        grid.len(),
        grid.start(),
        grid.end(),
        grid.step()
    );
    debug!(
        "First grid times: {:?}",
        grid.iter().take(GRID_PREVIEW_LEN).collect::<Vec<_>>()
    );

    // --- Integrate ---
    let start_time = Instant::now();
    let trajectory = integrate(&system, &grid, initial);
    info!(
        "Integrated {} states in {:.2} ms. Final state: ({:.6}, {:.6})",
        trajectory.len(),
        start_time.elapsed().as_secs_f64() * 1000.0,
        trajectory.last().map_or(f64::NAN, |s| s.x),
        trajectory.last().map_or(f64::NAN, |s| s.y)
    );

    // --- Mesh over the observed extent ---
    let bounds = trajectory.bounds().context("Cannot size the field mesh")?;
    info!(
        "Trajectory extent: x1 in [{:.4}, {:.4}], x2 in [{:.4}, {:.4}]",
        bounds.min.x, bounds.max.x, bounds.min.y, bounds.max.y
    );
    let mesh = MeshGrid::from_bounds(&bounds, config.mesh.density)
        .context("Cannot build the field mesh")?;

    // --- Field segments (parallel) ---
    let start_time = Instant::now();
    let angle_mode = config.mesh.angle_mode;
    let mut segments = Vec::with_capacity(mesh.len());
    let mut skipped = Vec::new();
    for result in sample_mesh(&system, &mesh, grid.start(), angle_mode) {
        match result {
            Ok(segment) => segments.push(segment),
            Err(e) => {
                debug!("Skipping field segment: {}", e);
                skipped.push(e);
            }
        }
    }
    info!(
        "Sampled {} field segments on a {}x{} mesh ({:?} angles, radius {:.4}) in {:.2} ms.",
        segments.len(),
        mesh.x1_values().len(),
        mesh.x2_values().len(),
        angle_mode,
        mesh.radius(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(PhasePortrait { trajectory, mesh, segments, skipped, angle_mode })
}
