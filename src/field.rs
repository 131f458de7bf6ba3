use crate::error::PhaseError;
use crate::grid::MeshGrid;
use crate::ode::{PlanarSystem, State};
use log::trace;
use phase_common::{angle_to_vec, vec_to_angle, AngleMode, Vec2};
use rayon::prelude::*;
use std::f64::consts::FRAC_PI_2;

/// Short line centered on a sample point, aligned with the local field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl FieldSegment {
    pub fn midpoint(&self) -> Vec2 {
        self.start.midpoint(self.end)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Direction angle of a finite, non-zero field vector.
///
/// `Principal` reproduces `atan(v2 / v1)` and so maps `v` and `-v` to the
/// same angle in `[-pi/2, pi/2]`. A vertical field (`v1 == 0`) gets `±pi/2`
/// by the sign of `v2` instead of dividing by zero.
fn direction_angle(v: Vec2, mode: AngleMode) -> Option<f64> {
    if v.x == 0.0 && v.y == 0.0 {
        return None;
    }
    let angle = match mode {
        AngleMode::Principal if v.x == 0.0 => FRAC_PI_2.copysign(v.y),
        AngleMode::Principal => (v.y / v.x).atan(),
        AngleMode::Quadrant => vec_to_angle(v),
    };
    Some(angle)
}

/// Segment of length `2 * radius` centered at `(x1, x2)` and oriented along
/// the field of `system` at time `t`.
pub fn sample_field_segment<S: PlanarSystem + ?Sized>(
    system: &S,
    t: f64,
    x1: f64,
    x2: f64,
    radius: f64,
    mode: AngleMode,
) -> Result<FieldSegment, PhaseError> {
    let point = State::new(x1, x2);
    let v = system.derivative(t, point);
    if !v.is_finite() {
        return Err(PhaseError::NonFiniteField { x1, x2 });
    }
    let angle = direction_angle(v, mode).ok_or(PhaseError::DegenerateDirection { x1, x2 })?;

    let circle_pt = angle_to_vec(angle) * radius;
    Ok(FieldSegment {
        start: point - circle_pt,
        end: point + circle_pt,
    })
}

/// Samples one segment per mesh point in parallel, using the mesh radius.
///
/// Results come back in [`MeshGrid::points`] order. Points where the field
/// has no direction keep their error so the caller can decide to skip them.
pub fn sample_mesh<S: PlanarSystem + ?Sized>(
    system: &S,
    mesh: &MeshGrid,
    t: f64,
    mode: AngleMode,
) -> Vec<Result<FieldSegment, PhaseError>> {
    let radius = mesh.radius();
    let points: Vec<Vec2> = mesh.points().collect();
    points
        .par_iter()
        .map(|p| {
            let segment = sample_field_segment(system, t, p.x, p.y, radius, mode);
            trace!("Field segment at ({:.4}, {:.4}): {:?}", p.x, p.y, segment);
            segment
        })
        .collect()
}
