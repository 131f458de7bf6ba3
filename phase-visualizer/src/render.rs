use crate::portrait::PhasePortrait;
use anyhow::{Context, Result};
use log::{info, warn};
use palette::Srgb;
use phase_common::{AngleMode, StyleConfig};
use plotters::prelude::*;
use std::path::Path;

// Marker radii in pixels
const MESH_MARKER_PX: i32 = 2;
const HEAD_MARKER_PX: i32 = 2;

/// Resolved colors for each layer of the figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub background: RGBColor,
    pub trajectory: RGBColor,
    pub mesh: RGBColor,
    pub field: RGBColor,
}

impl ColorScheme {
    pub fn from_style(style: &StyleConfig) -> Self {
        ColorScheme {
            background: parse_color(&style.background, BLACK),
            trajectory: parse_color(&style.trajectory, YELLOW),
            mesh: parse_color(&style.mesh, WHITE),
            field: parse_color(&style.field, CYAN),
        }
    }
}

/// Parses a CSS color name or a `#rrggbb` / `#rgb` hex code.
fn parse_color(color_name: &str, fallback: RGBColor) -> RGBColor {
    let name = color_name.trim().to_ascii_lowercase();
    let parsed: Option<Srgb<u8>> = palette::named::from_str(&name).or_else(|| name.parse().ok());
    match parsed {
        Some(rgb) => RGBColor(rgb.red, rgb.green, rgb.blue),
        None => {
            warn!("Color '{}' not recognized, using {:?}.", color_name, fallback);
            fallback
        }
    }
}

/// Draws the trajectory, mesh markers and field segments into a PNG at `path`.
pub fn render_phase_portrait(
    path: &Path,
    portrait: &PhasePortrait,
    style: &StyleConfig,
) -> Result<()> {
    let colors = ColorScheme::from_style(style);
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&colors.background)?;

    let (x_range, y_range) = portrait.mesh.plot_ranges();
    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if style.axis_labels {
        builder.x_label_area_size(40).y_label_area_size(50);
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    if style.axis_labels {
        chart
            .configure_mesh()
            .disable_mesh()
            .axis_style(&colors.mesh)
            .label_style(("sans-serif", 14).into_font().color(&colors.mesh))
            .axis_desc_style(("sans-serif", 16).into_font().color(&colors.mesh))
            .x_desc("x1")
            .y_desc("x2")
            .draw()?;
    }

    // Solution curve
    chart.draw_series(LineSeries::new(
        portrait.trajectory.states().iter().map(|s| (s.x, s.y)),
        &colors.trajectory,
    ))?;

    // Mesh markers
    chart.draw_series(
        portrait
            .mesh
            .points()
            .map(|p| Circle::new((p.x, p.y), MESH_MARKER_PX, colors.mesh.filled())),
    )?;

    // Field segments
    chart.draw_series(portrait.segments.iter().map(|s| {
        PathElement::new(vec![(s.start.x, s.start.y), (s.end.x, s.end.y)], &colors.field)
    }))?;

    // Only quadrant-aware angles know which end is downstream.
    if portrait.angle_mode == AngleMode::Quadrant {
        chart.draw_series(
            portrait
                .segments
                .iter()
                .map(|s| Circle::new((s.end.x, s.end.y), HEAD_MARKER_PX, colors.field.filled())),
        )?;
    }

    root.present()
        .with_context(|| format!("Failed to write image to {}", path.display()))?;
    info!("Phase portrait saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portrait::build_portrait;
    use phase_common::PhasePortraitConfig;

    #[test]
    fn parses_names_and_hex() {
        assert_eq!(parse_color("cyan", BLACK), RGBColor(0, 255, 255));
        assert_eq!(parse_color("Yellow", BLACK), RGBColor(255, 255, 0));
        assert_eq!(parse_color("#102030", BLACK), RGBColor(0x10, 0x20, 0x30));
        assert_eq!(parse_color("not-a-color", RED), RED);
    }

    #[test]
    fn default_scheme_is_dark() {
        let colors = ColorScheme::from_style(&StyleConfig::default());
        assert_eq!(colors.background, RGBColor(0, 0, 0));
        assert_eq!(colors.trajectory, RGBColor(255, 255, 0));
        assert_eq!(colors.mesh, RGBColor(255, 255, 255));
        assert_eq!(colors.field, RGBColor(0, 255, 255));
    }

    #[test]
    fn writes_png() {
        let text = r#"
            [timing]
            t_end = 6.0
            step = 0.01

            [initial_conditions]
            state = [0.0, 1.0]

            [mesh]
            density = 8
            angle_mode = "quadrant"

            [style]
            width = 200
            height = 200
            axis_labels = false
        "#;
        let config = PhasePortraitConfig::from_toml_str(text).unwrap();
        let portrait = build_portrait(&config).unwrap();
        let file_name = format!("phase_portrait_test_{}.png", std::process::id());
        let path = std::env::temp_dir().join(file_name);

        render_phase_portrait(&path, &portrait, &config.style).unwrap();

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
        std::fs::remove_file(&path).unwrap();
    }
}
