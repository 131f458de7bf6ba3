use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D vector, used both for phase-plane points `(x1, x2)` and for field values.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2.
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Calculates the squared length (magnitude) of the vector.
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Calculates the distance to another vector (point).
    pub fn distance(&self, other: Vec2) -> f64 {
        (*self - other).length()
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Vec2) -> Vec2 {
        Vec2::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    /// Componentwise minimum.
    pub fn min(&self, other: Vec2) -> Self {
        Vec2 { x: self.x.min(other.x), y: self.y.min(other.y) }
    }

    /// Componentwise maximum.
    pub fn max(&self, other: Vec2) -> Self {
        Vec2 { x: self.x.max(other.x), y: self.y.max(other.y) }
    }

    /// True when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self { x: self.x * scalar, y: self.y * scalar }
    }
}

/// Converts an angle (in radians) to a unit vector.
pub fn angle_to_vec(angle_rad: f64) -> Vec2 {
    Vec2::new(angle_rad.cos(), angle_rad.sin())
}

/// Converts a vector to an angle (in radians).
/// Uses atan2 for quadrant correctness.
pub fn vec_to_angle(vec: Vec2) -> f64 {
    vec.y.atan2(vec.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn arithmetic_is_componentwise() {
        let a = Vec2::new(1.5, -2.0);
        let b = Vec2::new(0.5, 4.0);
        assert_eq!(a + b, Vec2::new(2.0, 2.0));
        assert_eq!(a - b, Vec2::new(1.0, -6.0));
        assert_eq!(a * 2.0, Vec2::new(3.0, -4.0));
        assert_eq!(a.midpoint(b), Vec2::new(1.0, 1.0));
        assert_eq!(a.min(b), Vec2::new(0.5, -2.0));
        assert_eq!(a.max(b), Vec2::new(1.5, 4.0));
    }

    #[test]
    fn angle_conversions_are_inverse() {
        let v = angle_to_vec(FRAC_PI_2);
        assert!(v.x.abs() < 1e-15);
        assert_eq!(v.y, 1.0);
        assert_eq!(vec_to_angle(Vec2::new(0.0, 3.0)), FRAC_PI_2);
    }

    #[test]
    fn detects_non_finite_components() {
        assert!(Vec2::new(1.0, 2.0).is_finite());
        assert!(!Vec2::new(f64::NAN, 2.0).is_finite());
        assert!(!Vec2::new(1.0, f64::INFINITY).is_finite());
    }
}
