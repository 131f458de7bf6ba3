use crate::error::PhaseError;
use crate::integrator::{Bounds, Trajectory};
use phase_common::Vec2;
use std::ops::Range;

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let spacing = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + i as f64 * spacing })
                .collect()
        }
    }
}

/// Regular lattice of field sample points spanning a trajectory's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    x1: Vec<f64>,
    x2: Vec<f64>,
}

impl MeshGrid {
    /// Lays `density` points along each axis of the trajectory's observed extent.
    pub fn from_trajectory(trajectory: &Trajectory, density: usize) -> Result<Self, PhaseError> {
        Self::from_bounds(&trajectory.bounds()?, density)
    }

    pub fn from_bounds(bounds: &Bounds, density: usize) -> Result<Self, PhaseError> {
        if density < 2 {
            return Err(PhaseError::InvalidMeshDensity(density));
        }
        if !bounds.min.is_finite() || !bounds.max.is_finite() {
            return Err(PhaseError::NonFiniteBounds);
        }
        if bounds.max.x <= bounds.min.x {
            return Err(PhaseError::ZeroExtent { axis: 1 });
        }
        if bounds.max.y <= bounds.min.y {
            return Err(PhaseError::ZeroExtent { axis: 2 });
        }

        Ok(Self {
            x1: linspace(bounds.min.x, bounds.max.x, density),
            x2: linspace(bounds.min.y, bounds.max.y, density),
        })
    }

    pub fn x1_values(&self) -> &[f64] {
        &self.x1
    }

    pub fn x2_values(&self) -> &[f64] {
        &self.x2
    }

    /// Total number of lattice points.
    pub fn len(&self) -> usize {
        self.x1.len() * self.x2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Half the spacing between neighbouring x1 values; segments drawn with
    /// this radius just touch along the x1 axis.
    pub fn radius(&self) -> f64 {
        (self.x1[1] - self.x1[0]) / 2.0
    }

    /// Lattice points, x1-major: all x2 values for the first x1, then the next.
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.x1
            .iter()
            .flat_map(move |&p| self.x2.iter().map(move |&q| Vec2::new(p, q)))
    }

    /// Axis ranges for plotting, padded by the segment radius so edge
    /// segments stay inside the frame.
    pub fn plot_ranges(&self) -> (Range<f64>, Range<f64>) {
        let pad = self.radius();
        let (x1_min, x1_max) = (self.x1[0], self.x1[self.x1.len() - 1]);
        let (x2_min, x2_max) = (self.x2[0], self.x2[self.x2.len() - 1]);
        (x1_min - pad..x1_max + pad, x2_min - pad..x2_max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::{integrate, TimeGrid};
    use crate::ode::{Duffing, State};
    use approx::assert_abs_diff_eq;

    fn square(min: f64, max: f64) -> Bounds {
        Bounds { min: Vec2::new(min, min), max: Vec2::new(max, max) }
    }

    #[test]
    fn linspace_hits_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(-1.0, 0.3, 7).last(), Some(&0.3));
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn mesh_spans_bounds() {
        let mesh = MeshGrid::from_bounds(&square(-1.0, 1.0), 5).unwrap();
        assert_eq!(mesh.x1_values(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(mesh.len(), 25);
        assert_eq!(mesh.radius(), 0.25);
        let (xr, yr) = mesh.plot_ranges();
        assert_eq!((xr.start, xr.end), (-1.25, 1.25));
        assert_eq!((yr.start, yr.end), (-1.25, 1.25));
    }

    #[test]
    fn points_are_x1_major() {
        let mesh = MeshGrid::from_bounds(&square(0.0, 1.0), 2).unwrap();
        let points: Vec<_> = mesh.points().collect();
        assert_eq!(
            points,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn rejects_sparse_and_flat_meshes() {
        assert_eq!(
            MeshGrid::from_bounds(&square(0.0, 1.0), 1),
            Err(PhaseError::InvalidMeshDensity(1))
        );
        let open = Bounds { min: Vec2::new(0.0, 0.0), max: Vec2::new(f64::INFINITY, 1.0) };
        assert_eq!(MeshGrid::from_bounds(&open, 10), Err(PhaseError::NonFiniteBounds));
        let flat = Bounds { min: Vec2::new(0.0, -1.0), max: Vec2::new(0.0, 1.0) };
        assert_eq!(MeshGrid::from_bounds(&flat, 10), Err(PhaseError::ZeroExtent { axis: 1 }));
    }

    #[test]
    fn trajectory_at_rest_has_no_extent() {
        let grid = TimeGrid::new(0.0, 1.0, 0.1).unwrap();
        let trajectory = integrate(&Duffing::default(), &grid, State::zero());
        assert_eq!(
            MeshGrid::from_trajectory(&trajectory, 30),
            Err(PhaseError::ZeroExtent { axis: 1 })
        );
    }

    #[test]
    fn mesh_follows_trajectory_extent() {
        let grid = TimeGrid::new(0.0, 10.0, 0.001).unwrap();
        let trajectory = integrate(&Duffing::default(), &grid, State::new(0.0, 1.0));
        let bounds = trajectory.bounds().unwrap();
        let mesh = MeshGrid::from_trajectory(&trajectory, 30).unwrap();
        assert_eq!(mesh.x1_values()[0], bounds.min.x);
        assert_eq!(mesh.x2_values()[29], bounds.max.y);
        assert_abs_diff_eq!(mesh.radius(), (bounds.max.x - bounds.min.x) / 58.0, epsilon = 1e-12);
    }
}
