//! Post-hoc physical validation of a placed-cable set.
//!
//! Checks never mutate or repair the placement. `validate_gravity` answers the
//! single support question; `inspect` produces a full report covering overlap,
//! support, large-cable, layer and bounds rules.

use serde::Serialize;
use utoipa::ToSchema;

use crate::geometry::determine_layer;
use crate::model::PlacedCable;
use crate::optimizer::SolverConfig;
use crate::types::Circular;

/// Checks that every cable above the floor rests on a lower cable.
///
/// A cable is on the floor if `center.y <= radius + floor_tolerance`. Any other
/// cable must be tangent (within `support_tolerance`) to at least one cable whose
/// center is strictly lower.
///
/// # Returns
/// `true` if the support rule holds for the whole set
pub fn validate_gravity(placed: &[PlacedCable], config: &SolverConfig) -> bool {
    unsupported_cables(placed, config).is_empty()
}

/// Ids of cables that neither rest on the floor nor touch a lower cable.
pub fn unsupported_cables(placed: &[PlacedCable], config: &SolverConfig) -> Vec<String> {
    placed
        .iter()
        .enumerate()
        .filter(|(idx, cable)| !is_resting(*idx, cable, placed, config))
        .map(|(_, cable)| cable.id().to_string())
        .collect()
}

fn is_resting(idx: usize, cable: &PlacedCable, placed: &[PlacedCable], config: &SolverConfig) -> bool {
    if cable.rests_on_floor(config.floor_tolerance) {
        return true;
    }

    placed.iter().enumerate().any(|(other_idx, other)| {
        if other_idx == idx || other.center.y >= cable.center.y {
            return false;
        }
        let touch = cable.radius() + other.radius();
        (cable.center.distance_to(&other.center) - touch).abs() < config.support_tolerance
    })
}

/// Two cables whose cross-sections overlap.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverlapPair {
    pub first_id: String,
    pub second_id: String,
    /// How far the circles intrude into each other (mm)
    pub penetration: f64,
}

/// Returns every pair of cables closer than the sum of their radii minus
/// `collision_epsilon`.
pub fn find_overlaps(placed: &[PlacedCable], config: &SolverConfig) -> Vec<OverlapPair> {
    let mut overlaps = Vec::new();
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            let touch = a.radius() + b.radius();
            let dist = a.center.distance_to(&b.center);
            if dist < touch - config.collision_epsilon {
                overlaps.push(OverlapPair {
                    first_id: a.id().to_string(),
                    second_id: b.id().to_string(),
                    penetration: touch - dist,
                });
            }
        }
    }
    overlaps
}

/// A cable whose reported layer differs from the layer implied by the cables
/// placed before it.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayerMismatch {
    pub cable_id: String,
    pub reported: u32,
    pub expected: u32,
}

/// Full validation report for a placed-cable set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsReport {
    /// `true` if no rule is violated
    pub valid: bool,
    /// `true` if the support rule holds
    pub gravity_ok: bool,
    pub cable_count: usize,
    pub overlaps: Vec<OverlapPair>,
    pub unsupported: Vec<String>,
    /// Large cables found above layer 1 or off the floor
    pub large_cable_violations: Vec<String>,
    pub layer_mismatches: Vec<LayerMismatch>,
    /// Cables crossing the walls, the floor or the simulation ceiling
    pub bounds_violations: Vec<String>,
}

/// Inspects a placement against every physical rule.
///
/// Horizontal bounds are only checked when `width` is given. Layers are
/// recomputed in placement order, so cables supplied by a caller should carry
/// a meaningful `placement_order` (ties fall back to height).
pub fn inspect(placed: &[PlacedCable], width: Option<f64>, config: &SolverConfig) -> PhysicsReport {
    let overlaps = find_overlaps(placed, config);
    let unsupported = unsupported_cables(placed, config);

    let large_cable_violations: Vec<String> = placed
        .iter()
        .filter(|c| config.is_large(c.diameter()))
        .filter(|c| c.layer != 1 || !c.rests_on_floor(config.floor_tolerance))
        .map(|c| c.id().to_string())
        .collect();

    let bounds_violations: Vec<String> = placed
        .iter()
        .filter(|c| out_of_bounds(c, width, config))
        .map(|c| c.id().to_string())
        .collect();

    let layer_mismatches = layer_mismatches(placed, config);

    let gravity_ok = unsupported.is_empty();
    let valid = gravity_ok
        && overlaps.is_empty()
        && large_cable_violations.is_empty()
        && bounds_violations.is_empty()
        && layer_mismatches.is_empty();

    if !valid {
        log::debug!(
            "placement check failed: {} overlaps, {} unsupported, {} large, {} bounds, {} layers",
            overlaps.len(),
            unsupported.len(),
            large_cable_violations.len(),
            bounds_violations.len(),
            layer_mismatches.len()
        );
    }

    PhysicsReport {
        valid,
        gravity_ok,
        cable_count: placed.len(),
        overlaps,
        unsupported,
        large_cable_violations,
        layer_mismatches,
        bounds_violations,
    }
}

fn out_of_bounds(c: &PlacedCable, width: Option<f64>, config: &SolverConfig) -> bool {
    let tol = config.bounds_tolerance;
    if c.bottom_y() < -tol || c.top_y() > config.simulation_ceiling + tol {
        return true;
    }
    match width {
        Some(w) => c.left_x() < config.margin_x - tol || c.right_x() > w - config.margin_x + tol,
        None => false,
    }
}

fn layer_mismatches(placed: &[PlacedCable], config: &SolverConfig) -> Vec<LayerMismatch> {
    let mut ordered: Vec<&PlacedCable> = placed.iter().collect();
    ordered.sort_by(|a, b| {
        a.placement_order
            .cmp(&b.placement_order)
            .then_with(|| a.center.y.total_cmp(&b.center.y))
    });

    let mut prior: Vec<PlacedCable> = Vec::with_capacity(ordered.len());
    let mut mismatches = Vec::new();
    for cable in ordered {
        let expected = determine_layer(&prior, cable.center, cable.radius(), config);
        if expected != cable.layer {
            mismatches.push(LayerMismatch {
                cable_id: cable.id().to_string(),
                reported: cable.layer,
                expected,
            });
        }
        prior.push(cable.clone());
    }
    mismatches
}
