//! Placement logic for laying circular cables into a tray cross-section.
//!
//! This module implements the gravity-greedy placer and the tray fit attempt:
//! - candidate resting points on the floor and around every placed cable
//! - rejection of out-of-bounds, overlapping and unsupported candidates
//! - large cables restricted to the floor
//! - lowest point wins, leftmost breaks ties

use std::cmp::Ordering;

use serde::Serialize;
use utoipa::ToSchema;

use crate::geometry::{collides, determine_layer, floor_tangent_right, is_supported, on_floor, tangent_ring};
use crate::model::{CableSpec, PlacedCable, sorted_for_placement};
use crate::types::{Circular, EPSILON_GENERAL, Point2};

/// Configuration for the placer and the width solvers.
///
/// Holds every tolerance, threshold and search bound. Passed by reference into
/// every engine call; there are no module-level knobs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Clearance kept free at both tray walls (mm)
    pub margin_x: f64,
    /// Overlap allowance when testing two circles for collision (mm)
    pub collision_epsilon: f64,
    /// A circle whose center is at most `radius + floor_tolerance` high rests on the floor
    pub floor_tolerance: f64,
    /// Allowed gap between a circle and the cable supporting it (mm)
    pub support_tolerance: f64,
    /// Max horizontal offset of a supporting cable, as a ratio of the radius sum
    pub support_window_ratio: f64,
    /// Tolerance for wall and ceiling bounds (mm)
    pub bounds_tolerance: f64,
    /// Height difference below which two candidates count as equally low (mm)
    pub tie_tolerance: f64,
    /// Cables at or above this diameter may only rest on the floor (mm)
    pub large_cable_threshold: f64,
    /// Physical ceiling of the placement simulation (mm)
    pub simulation_ceiling: f64,
    /// Angular resolution of the tangent ring around placed cables (degrees)
    pub angle_step_degrees: f64,
    /// Step between tried tray widths (mm)
    pub width_step: f64,
    /// Narrowest tray width considered (mm)
    pub min_width: f64,
    /// Widest tray width permitted (mm)
    pub max_width: f64,
    /// Highest tier count evaluated by the optimization matrix
    pub matrix_max_tiers: usize,
    /// Narrowest width evaluated by the optimization matrix (mm)
    pub matrix_min_width: f64,
    /// Widest width evaluated by the optimization matrix (mm)
    pub matrix_max_width: f64,
    /// Highest tier count tried by the automatic tier escalation
    pub max_auto_tiers: usize,
}

impl SolverConfig {
    pub const DEFAULT_MARGIN_X: f64 = 10.0;
    pub const DEFAULT_COLLISION_EPSILON: f64 = 0.05;
    pub const DEFAULT_FLOOR_TOLERANCE: f64 = 0.5;
    pub const DEFAULT_SUPPORT_TOLERANCE: f64 = 1.0;
    pub const DEFAULT_SUPPORT_WINDOW_RATIO: f64 = 1.0;
    pub const DEFAULT_BOUNDS_TOLERANCE: f64 = 0.1;
    pub const DEFAULT_TIE_TOLERANCE: f64 = 0.5;
    pub const DEFAULT_LARGE_CABLE_THRESHOLD: f64 = 20.0;
    pub const DEFAULT_SIMULATION_CEILING: f64 = 500.0;
    pub const DEFAULT_ANGLE_STEP_DEGREES: f64 = 15.0;
    pub const DEFAULT_WIDTH_STEP: f64 = 100.0;
    pub const DEFAULT_MIN_WIDTH: f64 = 100.0;
    pub const DEFAULT_MAX_WIDTH: f64 = 900.0;
    pub const DEFAULT_MATRIX_MAX_TIERS: usize = 6;
    pub const DEFAULT_MATRIX_MIN_WIDTH: f64 = 200.0;
    pub const DEFAULT_MATRIX_MAX_WIDTH: f64 = 900.0;
    pub const DEFAULT_MAX_AUTO_TIERS: usize = 9;

    /// Creates a builder for a custom configuration.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }

    /// Checks whether a cable counts as large.
    #[inline]
    pub fn is_large(&self, diameter: f64) -> bool {
        diameter >= self.large_cable_threshold
    }

    /// Usable horizontal span of a tray of the given width.
    #[inline]
    pub fn usable_width(&self, width: f64) -> f64 {
        width - 2.0 * self.margin_x
    }

    /// Widths from `from` to `to` inclusive in `width_step` increments.
    pub fn width_range(&self, from: f64, to: f64) -> Vec<f64> {
        let mut widths = Vec::new();
        if self.width_step <= 0.0 {
            return widths;
        }
        let mut w = from;
        while w <= to + EPSILON_GENERAL {
            widths.push(w);
            w += self.width_step;
        }
        widths
    }

    /// Rounds a theoretical width up to the next width step, floored at `min_width`.
    pub fn standard_width(&self, theoretical: f64) -> f64 {
        if !theoretical.is_finite() || theoretical <= self.min_width {
            return self.min_width;
        }
        let steps = (theoretical / self.width_step - EPSILON_GENERAL).ceil();
        (steps * self.width_step).max(self.min_width)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            margin_x: Self::DEFAULT_MARGIN_X,
            collision_epsilon: Self::DEFAULT_COLLISION_EPSILON,
            floor_tolerance: Self::DEFAULT_FLOOR_TOLERANCE,
            support_tolerance: Self::DEFAULT_SUPPORT_TOLERANCE,
            support_window_ratio: Self::DEFAULT_SUPPORT_WINDOW_RATIO,
            bounds_tolerance: Self::DEFAULT_BOUNDS_TOLERANCE,
            tie_tolerance: Self::DEFAULT_TIE_TOLERANCE,
            large_cable_threshold: Self::DEFAULT_LARGE_CABLE_THRESHOLD,
            simulation_ceiling: Self::DEFAULT_SIMULATION_CEILING,
            angle_step_degrees: Self::DEFAULT_ANGLE_STEP_DEGREES,
            width_step: Self::DEFAULT_WIDTH_STEP,
            min_width: Self::DEFAULT_MIN_WIDTH,
            max_width: Self::DEFAULT_MAX_WIDTH,
            matrix_max_tiers: Self::DEFAULT_MATRIX_MAX_TIERS,
            matrix_min_width: Self::DEFAULT_MATRIX_MIN_WIDTH,
            matrix_max_width: Self::DEFAULT_MATRIX_MAX_WIDTH,
            max_auto_tiers: Self::DEFAULT_MAX_AUTO_TIERS,
        }
    }
}

/// Builder for SolverConfig.
#[derive(Clone, Debug, Default)]
pub struct SolverConfigBuilder {
    config: SolverConfig,
}

impl SolverConfigBuilder {
    /// Sets the wall clearance.
    pub fn margin_x(mut self, margin: f64) -> Self {
        self.config.margin_x = margin;
        self
    }

    /// Sets the collision allowance.
    pub fn collision_epsilon(mut self, epsilon: f64) -> Self {
        self.config.collision_epsilon = epsilon;
        self
    }

    /// Sets the floor contact tolerance.
    pub fn floor_tolerance(mut self, tolerance: f64) -> Self {
        self.config.floor_tolerance = tolerance;
        self
    }

    /// Sets the support contact tolerance.
    pub fn support_tolerance(mut self, tolerance: f64) -> Self {
        self.config.support_tolerance = tolerance;
        self
    }

    /// Sets the large-cable threshold.
    pub fn large_cable_threshold(mut self, threshold: f64) -> Self {
        self.config.large_cable_threshold = threshold;
        self
    }

    /// Sets the simulation ceiling.
    pub fn simulation_ceiling(mut self, ceiling: f64) -> Self {
        self.config.simulation_ceiling = ceiling;
        self
    }

    /// Sets the tangent ring resolution.
    pub fn angle_step_degrees(mut self, step: f64) -> Self {
        self.config.angle_step_degrees = step;
        self
    }

    /// Sets the width search bounds and step.
    pub fn width_search(mut self, min_width: f64, max_width: f64, step: f64) -> Self {
        self.config.min_width = min_width;
        self.config.max_width = max_width;
        self.config.width_step = step;
        self
    }

    /// Sets the optimization matrix grid.
    pub fn matrix_grid(mut self, max_tiers: usize, min_width: f64, max_width: f64) -> Self {
        self.config.matrix_max_tiers = max_tiers;
        self.config.matrix_min_width = min_width;
        self.config.matrix_max_width = max_width;
        self
    }

    /// Sets the highest tier count tried by automatic escalation.
    pub fn max_auto_tiers(mut self, tiers: usize) -> Self {
        self.config.max_auto_tiers = tiers;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> SolverConfig {
        self.config
    }
}

/// Resting position chosen by the placer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub center: Point2,
    pub layer: u32,
}

/// Cable at which a tray fit attempt stopped.
///
/// `cable_index` is the position in placement order (0-based), which equals the
/// number of cables placed before the failure.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FitFailure {
    pub cable_index: usize,
    pub cable_id: String,
    pub diameter: f64,
}

/// Result of placing one cable list into one tray width.
#[derive(Clone, Debug)]
pub struct TrayFitOutcome {
    pub width: f64,
    pub placed: Vec<PlacedCable>,
    pub all_placed: bool,
    pub max_stack_height: f64,
    pub failed_at: Option<FitFailure>,
}

impl TrayFitOutcome {
    /// Number of cables that found a position.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }
}

/// Finds the resting position for one cable given the cables already placed.
///
/// Candidates are generated on the floor right of the right-most floor cable,
/// on the floor tangent to the right side of each placed cable, and on a ring
/// of discrete angles around each placed cable. Candidates that leave the tray,
/// exceed the simulation ceiling, overlap, or float are rejected. Large cables
/// must rest on the floor.
///
/// # Returns
/// `Some(Placement)` with the lowest (then leftmost) surviving candidate,
/// `None` if no candidate survives
pub fn find_resting_position(
    cable: &CableSpec,
    placed: &[PlacedCable],
    width: f64,
    config: &SolverConfig,
) -> Option<Placement> {
    let r = cable.radius();
    let large = config.is_large(cable.diameter);

    let admissible: Vec<Point2> = candidate_points(r, placed, config)
        .into_iter()
        .filter(|&p| is_admissible(p, r, large, placed, width, config))
        .collect();
    let lowest_y = admissible.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);

    let mut best: Option<Point2> = None;
    for candidate in admissible {
        if candidate.y > lowest_y + config.tie_tolerance {
            continue;
        }
        update_best(&mut best, candidate);
    }

    best.map(|center| Placement {
        center,
        layer: determine_layer(placed, center, r, config),
    })
}

/// Generates all candidate centers for a circle of radius `r`.
fn candidate_points(r: f64, placed: &[PlacedCable], config: &SolverConfig) -> Vec<Point2> {
    let ring_len = (180.0 / config.angle_step_degrees.max(1.0)).ceil() as usize;
    let mut candidates = Vec::with_capacity(1 + placed.len() * (1 + ring_len));

    let floor_edge = placed
        .iter()
        .filter(|c| c.rests_on_floor(config.floor_tolerance))
        .map(|c| c.right_x())
        .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.max(x))));
    let start_x = floor_edge.unwrap_or(config.margin_x);
    candidates.push(Point2::new(start_x + r, r));

    for c in placed {
        if let Some(p) = floor_tangent_right(c, r) {
            candidates.push(p);
        }
        candidates.extend(tangent_ring(c, r, config.angle_step_degrees));
    }

    candidates
}

/// Applies bounds, ceiling, large-cable, collision and support filters.
fn is_admissible(
    p: Point2,
    r: f64,
    large: bool,
    placed: &[PlacedCable],
    width: f64,
    config: &SolverConfig,
) -> bool {
    if !p.is_finite() {
        return false;
    }
    if p.x - r < config.margin_x - config.bounds_tolerance
        || p.x + r > width - config.margin_x + config.bounds_tolerance
    {
        return false;
    }
    if p.y - r < -config.bounds_tolerance
        || p.y + r > config.simulation_ceiling + config.bounds_tolerance
    {
        return false;
    }
    if large && !on_floor(p, r, config) {
        return false;
    }
    if collides(placed, p, r, config) {
        return false;
    }
    is_supported(placed, p, r, config)
}

/// Keeps the better of the current best and a new candidate.
fn update_best(best: &mut Option<Point2>, candidate: Point2) {
    match best {
        None => *best = Some(candidate),
        Some(current) => {
            if is_better_position(candidate, *current) {
                *best = Some(candidate);
            }
        }
    }
}

/// Compares two candidate centers that both lie within `tie_tolerance` of
/// the lowest admissible height.
///
/// Priority: x (low) > y (low)
fn is_better_position(new: Point2, current: Point2) -> bool {
    match compare_with_epsilon(new.x, current.x, EPSILON_GENERAL) {
        Ordering::Less => return true,
        Ordering::Greater => return false,
        Ordering::Equal => {}
    }

    compare_with_epsilon(new.y, current.y, EPSILON_GENERAL) == Ordering::Less
}

/// Compares two values with tolerance.
fn compare_with_epsilon(a: f64, b: f64, eps: f64) -> Ordering {
    if (a - b).abs() <= eps {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Attempts to place every cable into a tray of the given width.
///
/// Cables are sorted by system, diameter (descending) and from-node, then
/// placed one at a time. The attempt stops at the first cable without a
/// resting position; the partial placement is kept.
pub fn try_fit(cables: &[CableSpec], width: f64, config: &SolverConfig) -> TrayFitOutcome {
    let sorted = sorted_for_placement(cables);
    let mut placed: Vec<PlacedCable> = Vec::with_capacity(sorted.len());
    let mut max_stack_height: f64 = 0.0;

    for (idx, cable) in sorted.into_iter().enumerate() {
        match find_resting_position(&cable, &placed, width, config) {
            Some(placement) => {
                let order = placed.len() + 1;
                let entry = PlacedCable::new(cable, placement.center, placement.layer, order);
                max_stack_height = max_stack_height.max(entry.top_y());
                placed.push(entry);
            }
            None => {
                let failed_at = FitFailure {
                    cable_index: idx,
                    cable_id: cable.id.clone(),
                    diameter: cable.diameter,
                };
                return TrayFitOutcome {
                    width,
                    placed,
                    all_placed: false,
                    max_stack_height,
                    failed_at: Some(failed_at),
                };
            }
        }
    }

    TrayFitOutcome {
        width,
        placed,
        all_placed: true,
        max_stack_height,
        failed_at: None,
    }
}
