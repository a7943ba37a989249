//! Common types and traits for 2D tray cross-section geometry.
//!
//! All coordinates are in millimetres in tray-local space: `x` runs across the
//! tray from its left wall, `y` runs upward from the tray floor (`y = 0`).

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Global numerical tolerance for floating-point comparisons.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Tolerance used when comparing derived percentages (fill ratios).
pub const EPSILON_RATIO: f64 = 1e-9;

/// A point in the tray cross-section.
///
/// # Examples
/// ```
/// use tray_fill::types::Point2;
///
/// let a = Point2::new(0.0, 0.0);
/// let b = Point2::new(3.0, 4.0);
/// assert_eq!(a.distance_to(&b), 5.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    ///
    /// # Parameters
    /// * `x` - Horizontal offset from the left tray wall
    /// * `y` - Height above the tray floor
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another point.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point at `radius` from this one in direction `angle_rad`
    /// (counter-clockwise from the positive x axis).
    #[inline]
    pub fn polar_offset(&self, radius: f64, angle_rad: f64) -> Self {
        Self::new(
            self.x + radius * angle_rad.cos(),
            self.y + radius * angle_rad.sin(),
        )
    }

    /// Checks that both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(p1: &Point2, p2: &Point2) -> f64 {
    p1.distance_to(p2)
}

/// Trait for objects with a circular cross-section.
pub trait Circular {
    /// Outer diameter in mm.
    fn diameter(&self) -> f64;

    /// Radius in mm.
    fn radius(&self) -> f64 {
        self.diameter() / 2.0
    }

    /// Cross-sectional area in mm².
    fn cross_section_area(&self) -> f64 {
        circle_area(self.diameter())
    }
}

/// Area of a circle with the given diameter.
#[inline]
pub fn circle_area(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    std::f64::consts::PI * r * r
}

/// Validation functions shared by the model and request parsing.
pub mod validation {
    /// Validates a strictly positive, finite length.
    ///
    /// # Returns
    /// `Ok(())` for valid values, otherwise error text
    pub fn validate_length(value: f64, name: &str) -> Result<(), String> {
        if value.is_nan() {
            return Err(format!("{} must not be NaN", name));
        }
        if value.is_infinite() {
            return Err(format!("{} must not be infinite", name));
        }
        if value <= 0.0 {
            return Err(format!("{} must be positive, got: {}", name, value));
        }
        Ok(())
    }

    /// Validates a percentage in the half-open range (0, 100].
    pub fn validate_percent(value: f64, name: &str) -> Result<(), String> {
        if !value.is_finite() || value <= 0.0 || value > 100.0 {
            return Err(format!("{} must be within (0, 100], got: {}", name, value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_operations() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(4.0, 6.0);

        assert_eq!(a + b, Point2::new(5.0, 8.0));
        assert_eq!(b - a, Point2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Point2::new(2.0, 4.0));
        assert!((distance(&a, &b) - 5.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn test_polar_offset_lands_on_circle() {
        let center = Point2::new(10.0, 5.0);
        for step in 1..12 {
            let angle = (step as f64 * 15.0).to_radians();
            let p = center.polar_offset(7.5, angle);
            assert!((p.distance_to(&center) - 7.5).abs() < EPSILON_GENERAL);
            assert!(p.y > center.y);
        }
    }

    #[test]
    fn test_circle_area() {
        assert!((circle_area(10.0) - 78.539_816).abs() < 1e-5);
        assert_eq!(circle_area(0.0), 0.0);
    }

    #[test]
    fn test_validation_length() {
        assert!(validation::validate_length(10.0, "Diameter").is_ok());
        assert!(validation::validate_length(0.0, "Diameter").is_err());
        assert!(validation::validate_length(-1.0, "Diameter").is_err());
        assert!(validation::validate_length(f64::NAN, "Diameter").is_err());
        assert!(validation::validate_length(f64::INFINITY, "Diameter").is_err());
    }

    #[test]
    fn test_validation_percent() {
        assert!(validation::validate_percent(40.0, "Fill").is_ok());
        assert!(validation::validate_percent(100.0, "Fill").is_ok());
        assert!(validation::validate_percent(0.0, "Fill").is_err());
        assert!(validation::validate_percent(100.5, "Fill").is_err());
    }
}
