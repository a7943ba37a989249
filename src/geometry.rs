//! Geometric helpers for circle placement inside a tray cross-section.
//!
//! Collision, support and layer queries between a prospective circle and the
//! circles already resting in the tray.

use crate::model::PlacedCable;
use crate::optimizer::SolverConfig;
use crate::types::{Circular, Point2};

/// Checks whether a circle of radius `r` at `p` overlaps any placed cable.
///
/// Two circles overlap when their center distance is smaller than the sum of
/// their radii minus `config.collision_epsilon`. Exact tangency is allowed.
///
/// # Parameters
/// * `placed` - Cables already in the tray
/// * `p` - Center of the prospective circle
/// * `r` - Radius of the prospective circle
///
/// # Returns
/// `true` if at least one placed cable is overlapped
pub fn collides(placed: &[PlacedCable], p: Point2, r: f64, config: &SolverConfig) -> bool {
    placed.iter().any(|c| {
        let min_dist = c.radius() + r - config.collision_epsilon;
        p.distance_to(&c.center) < min_dist
    })
}

/// Checks whether a circle of radius `r` at `p` would rest stably.
///
/// A circle is supported if it touches the floor, or if some placed cable whose
/// center is strictly lower lies within `radius_sum + support_tolerance` and is
/// horizontally offset by no more than `support_window_ratio * radius_sum`.
pub fn is_supported(placed: &[PlacedCable], p: Point2, r: f64, config: &SolverConfig) -> bool {
    if on_floor(p, r, config) {
        return true;
    }

    placed.iter().any(|c| {
        if c.center.y >= p.y {
            return false;
        }
        let radius_sum = c.radius() + r;
        let within_reach = p.distance_to(&c.center) <= radius_sum + config.support_tolerance;
        let within_window = (p.x - c.center.x).abs() <= radius_sum * config.support_window_ratio;
        within_reach && within_window
    })
}

/// Determines the stacking layer of a circle resting at `p`.
///
/// Floor-resting circles are layer 1. Otherwise the layer is one above the
/// highest layer among placed cables that are lower and horizontally overlap.
pub fn determine_layer(placed: &[PlacedCable], p: Point2, r: f64, config: &SolverConfig) -> u32 {
    if on_floor(p, r, config) {
        return 1;
    }

    placed
        .iter()
        .filter(|c| c.center.y < p.y && (c.center.x - p.x).abs() < c.radius() + r)
        .map(|c| c.layer)
        .max()
        .map_or(1, |layer| layer + 1)
}

/// Checks whether a circle's bottom touches the floor.
#[inline]
pub fn on_floor(p: Point2, r: f64, config: &SolverConfig) -> bool {
    p.y <= r + config.floor_tolerance
}

/// Floor point for a circle of radius `r` tangent to the right side of `c`.
///
/// Returns `None` if `c` sits too high for a floor-level circle to touch it.
pub fn floor_tangent_right(c: &PlacedCable, r: f64) -> Option<Point2> {
    let reach = c.radius() + r;
    let dy = (c.center.y - r).abs();
    if dy > reach {
        return None;
    }
    let dx = (reach * reach - dy * dy).sqrt();
    Some(Point2::new(c.center.x + dx, r))
}

/// Points on the tangent circle around `c` for a new circle of radius `r`.
///
/// Angles run from `step` to `180 - step` degrees (exclusive of the horizon),
/// so every point lies above the center of `c`.
pub fn tangent_ring(c: &PlacedCable, r: f64, step_degrees: f64) -> Vec<Point2> {
    let reach = c.radius() + r;
    if step_degrees <= 0.0 {
        return Vec::new();
    }
    let steps = (180.0 / step_degrees).ceil() as usize;
    (1..steps)
        .map(|i| i as f64 * step_degrees)
        .filter(|deg| *deg < 180.0)
        .map(|deg| c.center.polar_offset(reach, deg.to_radians()))
        .collect()
}
