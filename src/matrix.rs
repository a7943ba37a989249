//! Tier-count × width feasibility matrix for decision support.
//!
//! Every cell distributes the cables over `tier_count` trays, takes the bucket
//! with the highest diameter sum as the worst case and runs one fit attempt
//! at the cell width. Cells are independent and computed in parallel.

use rayon::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{CableSpec, total_cable_area, total_diameter_sum};
use crate::optimizer::{SolverConfig, try_fit};
use crate::solver::{SolveParams, distribute};
use crate::types::EPSILON_RATIO;

/// One (tier count, width) combination.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub tier_count: usize,
    pub width: f64,
    /// Total tray cross-section over all tiers (mm²)
    pub area: f64,
    /// `totalCableArea / (width * height * tierCount) * 100`
    pub fill_ratio: f64,
    /// The worst bucket fits at this width
    pub physically_fits: bool,
    /// Fits and stays at or below the target fill ratio
    pub meets_target: bool,
}

/// Index of the bucket with the highest diameter sum (first one on ties).
fn worst_bucket(buckets: &[Vec<CableSpec>]) -> usize {
    let mut worst = 0;
    let mut worst_sum = f64::NEG_INFINITY;
    for (idx, bucket) in buckets.iter().enumerate() {
        let sum = total_diameter_sum(bucket);
        if sum > worst_sum {
            worst = idx;
            worst_sum = sum;
        }
    }
    worst
}

/// Generates the optimization matrix.
///
/// Rows are tier counts `1..=matrix_max_tiers`, columns are widths from
/// `matrix_min_width` to `matrix_max_width` in `width_step` increments. Row and
/// column order is preserved regardless of parallel evaluation.
pub fn generate_matrix(
    cables: &[CableSpec],
    params: &SolveParams,
    config: &SolverConfig,
) -> Vec<Vec<MatrixCell>> {
    let total_area = total_cable_area(cables);
    let widths = config.width_range(config.matrix_min_width, config.matrix_max_width);

    (1..=config.matrix_max_tiers)
        .into_par_iter()
        .map(|tier_count| {
            let buckets = distribute(cables, tier_count);
            let worst = &buckets[worst_bucket(&buckets)];
            widths
                .par_iter()
                .map(|&width| evaluate_cell(worst, tier_count, width, total_area, params, config))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn evaluate_cell(
    worst: &[CableSpec],
    tier_count: usize,
    width: f64,
    total_area: f64,
    params: &SolveParams,
    config: &SolverConfig,
) -> MatrixCell {
    let area = width * params.max_height_limit * tier_count as f64;
    let fill_ratio = total_area / area * 100.0;
    let physically_fits = try_fit(worst, width, config).all_placed;
    let meets_target =
        physically_fits && fill_ratio <= params.target_fill_ratio_percent + EPSILON_RATIO;

    MatrixCell {
        tier_count,
        width,
        area,
        fill_ratio,
        physically_fits,
        meets_target,
    }
}

/// Picks the cell with the smallest total area among those meeting the target.
///
/// Ties prefer fewer tiers, then the narrower width.
pub fn recommend(matrix: &[Vec<MatrixCell>]) -> Option<MatrixCell> {
    matrix
        .iter()
        .flatten()
        .filter(|cell| cell.meets_target)
        .min_by(|a, b| {
            a.area
                .total_cmp(&b.area)
                .then_with(|| a.tier_count.cmp(&b.tier_count))
                .then_with(|| a.width.total_cmp(&b.width))
        })
        .cloned()
}

/// Looks up the cell for a (tier count, width) pair.
pub fn find_cell(matrix: &[Vec<MatrixCell>], tier_count: usize, width: f64) -> Option<&MatrixCell> {
    matrix
        .iter()
        .flatten()
        .find(|cell| cell.tier_count == tier_count && (cell.width - width).abs() < EPSILON_RATIO)
}
