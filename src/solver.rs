//! Width search for single trays and multi-tier tray systems.
//!
//! The single-tier solver scans standard widths for the narrowest tray that
//! fits a cable bucket. The system solver distributes cables round-robin over
//! the tiers, solves every tier independently and re-fits all tiers at the
//! widest width found.

use serde::Serialize;
use utoipa::ToSchema;

use crate::matrix::MatrixCell;
use crate::model::{
    CableSpec, PlacedCable, ValidationError, sorted_for_placement, total_cable_area,
    total_diameter_sum,
};
use crate::optimizer::{SolverConfig, TrayFitOutcome, try_fit};
use crate::types::validation;

/// Caller-chosen parameters of a system solve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolveParams {
    pub number_of_tiers: usize,
    pub max_height_limit: f64,
    pub target_fill_ratio_percent: f64,
}

impl SolveParams {
    /// Creates validated solve parameters.
    ///
    /// # Examples
    /// ```
    /// use tray_fill::solver::SolveParams;
    ///
    /// assert!(SolveParams::new(2, 60.0, 40.0).is_ok());
    /// assert!(SolveParams::new(0, 60.0, 40.0).is_err());
    /// assert!(SolveParams::new(1, 60.0, 140.0).is_err());
    /// ```
    pub fn new(
        number_of_tiers: usize,
        max_height_limit: f64,
        target_fill_ratio_percent: f64,
    ) -> Result<Self, ValidationError> {
        if number_of_tiers == 0 {
            return Err(ValidationError::InvalidConfiguration(
                "numberOfTiers must be at least 1".to_string(),
            ));
        }
        validation::validate_length(max_height_limit, "maxHeightLimit")
            .map_err(ValidationError::InvalidConfiguration)?;
        validation::validate_percent(target_fill_ratio_percent, "targetFillRatioPercent")
            .map_err(ValidationError::InvalidConfiguration)?;

        Ok(Self {
            number_of_tiers,
            max_height_limit,
            target_fill_ratio_percent,
        })
    }

    /// Same parameters with a different tier count.
    pub fn with_tiers(self, number_of_tiers: usize) -> Self {
        Self {
            number_of_tiers: number_of_tiers.max(1),
            ..self
        }
    }
}

/// Reason a tier could not be solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A cable can never fit: it is taller than the simulation ceiling or wider
    /// than the usable span of the widest permitted tray.
    InfeasibleCable,
    /// No permitted width fits the whole bucket.
    WidthCapExhausted,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::InfeasibleCable => "infeasible_cable",
            FailureKind::WidthCapExhausted => "width_cap_exhausted",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::InfeasibleCable => {
                write!(f, "Cable cannot fit into any permitted tray")
            }
            FailureKind::WidthCapExhausted => {
                write!(f, "No permitted tray width fits all cables")
            }
        }
    }
}

/// Failure details of one tier.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TierFailure {
    pub kind: FailureKind,
    /// Position of the failing cable in placement order (0-based)
    pub cable_index: usize,
    pub cable_id: String,
    /// Width at which the failure was recorded (mm)
    pub width: f64,
}

/// Result of one tier.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TierResult {
    /// 0-based tier number
    pub tier_index: usize,
    pub width: f64,
    pub cables: Vec<PlacedCable>,
    pub success: bool,
    /// `totalCableArea / (width * maxHeightLimit) * 100`
    pub fill_ratio: f64,
    pub total_diameter_sum: f64,
    pub total_cable_area: f64,
    /// Highest point of any placed cable (mm)
    pub max_stack_height: f64,
    pub exceeds_height_limit: bool,
    pub cable_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TierFailure>,
}

/// Result of a complete system solve.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemResult {
    /// Width shared by all tiers (mm)
    pub system_width: f64,
    pub tiers: Vec<TierResult>,
    pub success: bool,
    pub max_height_per_tier: f64,
    pub target_fill_ratio_percent: f64,
    pub total_cable_area: f64,
    pub total_diameter_sum: f64,
    pub cable_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_matrix: Option<Vec<Vec<MatrixCell>>>,
}

impl SystemResult {
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Failures of all unsuccessful tiers.
    pub fn failures(&self) -> impl Iterator<Item = &TierFailure> {
        self.tiers.iter().filter_map(|t| t.failure.as_ref())
    }

    /// Attaches a precomputed optimization matrix.
    pub fn with_matrix(mut self, matrix: Vec<Vec<MatrixCell>>) -> Self {
        self.optimization_matrix = Some(matrix);
        self
    }
}

/// Progress events emitted while solving, suitable for live streaming.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SolveEvent {
    /// Independent solve of a tier begins.
    TierStarted {
        tier_index: usize,
        cable_count: usize,
        start_width: f64,
    },
    /// One width was tried for a tier.
    WidthAttempted {
        tier_index: usize,
        width: f64,
        placed: usize,
        total: usize,
        success: bool,
    },
    /// Final result of a tier at the shared system width.
    TierSolved {
        tier_index: usize,
        width: f64,
        success: bool,
        fill_ratio: f64,
    },
    /// The shared width was chosen.
    SystemWidthChosen { system_width: f64 },
    /// Solve finished.
    Finished {
        system_width: f64,
        success: bool,
        tiers: usize,
    },
}

/// Distributes cables round-robin over `tiers` buckets after sorting them
/// into placement order.
pub fn distribute(cables: &[CableSpec], tiers: usize) -> Vec<Vec<CableSpec>> {
    let tiers = tiers.max(1);
    let mut buckets: Vec<Vec<CableSpec>> = vec![Vec::new(); tiers];
    for (i, cable) in sorted_for_placement(cables).into_iter().enumerate() {
        buckets[i % tiers].push(cable);
    }
    buckets
}

/// First cable (in placement order) that can never be placed.
fn find_infeasible(cables: &[CableSpec], config: &SolverConfig) -> Option<(usize, CableSpec)> {
    let usable = config.usable_width(config.max_width);
    sorted_for_placement(cables)
        .into_iter()
        .enumerate()
        .find(|(_, c)| c.diameter > config.simulation_ceiling || c.diameter > usable)
}

/// Theoretical start width for a bucket, rounded up to a standard width.
pub fn start_width(total_area: f64, params: &SolveParams, config: &SolverConfig) -> f64 {
    let effective_height = params.max_height_limit * params.target_fill_ratio_percent / 100.0;
    config.standard_width(total_area / effective_height)
}

/// Finds the narrowest standard width that fits one cable bucket.
///
/// Widths are scanned upward from the start width to `max_width`; if none fits,
/// the narrower widths below the start are tried. An empty bucket succeeds at
/// `min_width`. A bucket holding an infeasible cable skips the scan and reports
/// the partial placement at `max_width`.
pub fn solve_single_tier(
    cables: &[CableSpec],
    tier_index: usize,
    params: &SolveParams,
    config: &SolverConfig,
) -> TierResult {
    solve_tier_with_progress(cables, tier_index, params, config, &mut |_: &SolveEvent| {})
}

fn solve_tier_with_progress(
    cables: &[CableSpec],
    tier_index: usize,
    params: &SolveParams,
    config: &SolverConfig,
    on_event: &mut impl FnMut(&SolveEvent),
) -> TierResult {
    let total_area = total_cable_area(cables);
    let start = start_width(total_area, params, config);
    on_event(&SolveEvent::TierStarted {
        tier_index,
        cable_count: cables.len(),
        start_width: start,
    });

    if cables.is_empty() {
        let outcome = try_fit(cables, config.min_width, config);
        return tier_result(tier_index, cables, outcome, params, None);
    }

    if let Some((idx, cable)) = find_infeasible(cables, config) {
        log::warn!(
            "tier {tier_index}: cable '{}' ({} mm) cannot fit any permitted tray",
            cable.id,
            cable.diameter
        );
        let outcome = try_fit(cables, config.max_width, config);
        let failure = TierFailure {
            kind: FailureKind::InfeasibleCable,
            cable_index: idx,
            cable_id: cable.id,
            width: config.max_width,
        };
        return tier_result(tier_index, cables, outcome, params, Some(failure));
    }

    let primary = config.width_range(start, config.max_width);
    let fallback_end = (start - config.width_step).min(config.max_width);
    let fallback = config.width_range(config.min_width, fallback_end);

    for width in primary.into_iter().chain(fallback) {
        let outcome = try_fit(cables, width, config);
        log::debug!(
            "tier {tier_index}: width {width} placed {}/{}",
            outcome.placed_count(),
            cables.len()
        );
        on_event(&SolveEvent::WidthAttempted {
            tier_index,
            width,
            placed: outcome.placed_count(),
            total: cables.len(),
            success: outcome.all_placed,
        });
        if outcome.all_placed {
            return tier_result(tier_index, cables, outcome, params, None);
        }
    }

    let outcome = try_fit(cables, config.max_width, config);
    log::warn!(
        "tier {tier_index}: no width up to {} mm fits {} cables",
        config.max_width,
        cables.len()
    );
    let failure = exhausted_failure(&outcome);
    tier_result(tier_index, cables, outcome, params, failure)
}

fn exhausted_failure(outcome: &TrayFitOutcome) -> Option<TierFailure> {
    outcome.failed_at.as_ref().map(|f| TierFailure {
        kind: FailureKind::WidthCapExhausted,
        cable_index: f.cable_index,
        cable_id: f.cable_id.clone(),
        width: outcome.width,
    })
}

fn tier_result(
    tier_index: usize,
    cables: &[CableSpec],
    outcome: TrayFitOutcome,
    params: &SolveParams,
    failure: Option<TierFailure>,
) -> TierResult {
    let total_area = total_cable_area(cables);
    let fill_ratio = total_area / (outcome.width * params.max_height_limit) * 100.0;
    let success = outcome.all_placed && failure.is_none();

    TierResult {
        tier_index,
        width: outcome.width,
        success,
        fill_ratio,
        total_diameter_sum: total_diameter_sum(cables),
        total_cable_area: total_area,
        max_stack_height: outcome.max_stack_height,
        exceeds_height_limit: outcome.max_stack_height > params.max_height_limit,
        cable_count: cables.len(),
        failure,
        cables: outcome.placed,
    }
}

/// Re-fits one bucket at a given width.
///
/// A cable that cannot fit any permitted tray keeps its infeasible
/// classification; other failures count as width-cap exhaustion.
fn refit_tier(
    bucket: &[CableSpec],
    tier_index: usize,
    width: f64,
    params: &SolveParams,
    config: &SolverConfig,
) -> TierResult {
    let outcome = try_fit(bucket, width, config);
    if outcome.all_placed {
        return tier_result(tier_index, bucket, outcome, params, None);
    }

    let failure = match find_infeasible(bucket, config) {
        Some((idx, cable)) => Some(TierFailure {
            kind: FailureKind::InfeasibleCable,
            cable_index: idx,
            cable_id: cable.id,
            width,
        }),
        None => exhausted_failure(&outcome),
    };
    tier_result(tier_index, bucket, outcome, params, failure)
}

fn system_result(
    cables: &[CableSpec],
    system_width: f64,
    tiers: Vec<TierResult>,
    params: &SolveParams,
) -> SystemResult {
    SystemResult {
        system_width,
        success: tiers.iter().all(|t| t.success),
        tiers,
        max_height_per_tier: params.max_height_limit,
        target_fill_ratio_percent: params.target_fill_ratio_percent,
        total_cable_area: total_cable_area(cables),
        total_diameter_sum: total_diameter_sum(cables),
        cable_count: cables.len(),
        optimization_matrix: None,
    }
}

/// Solves a multi-tier system.
///
/// # Parameters
/// * `cables` - All cables of the tray run
/// * `params` - Tier count, height limit and target fill ratio
/// * `config` - Placer and search configuration
///
/// # Returns
/// `SystemResult` whose tiers all share `system_width`
pub fn solve_system(cables: &[CableSpec], params: &SolveParams, config: &SolverConfig) -> SystemResult {
    solve_system_with_progress(cables, params, config, |_| {})
}

/// System solve with a live progress callback.
///
/// Every tier is first solved independently. The widest resulting width becomes
/// the system width and every tier is re-fitted at it; success requires every
/// re-fit to succeed.
pub fn solve_system_with_progress(
    cables: &[CableSpec],
    params: &SolveParams,
    config: &SolverConfig,
    mut on_event: impl FnMut(&SolveEvent),
) -> SystemResult {
    let buckets = distribute(cables, params.number_of_tiers);

    let independent: Vec<TierResult> = buckets
        .iter()
        .enumerate()
        .map(|(idx, bucket)| solve_tier_with_progress(bucket, idx, params, config, &mut on_event))
        .collect();

    let system_width = independent
        .iter()
        .map(|t| t.width)
        .fold(config.min_width, f64::max);
    on_event(&SolveEvent::SystemWidthChosen { system_width });

    let tiers: Vec<TierResult> = buckets
        .iter()
        .enumerate()
        .map(|(idx, bucket)| {
            let tier = refit_tier(bucket, idx, system_width, params, config);
            on_event(&SolveEvent::TierSolved {
                tier_index: idx,
                width: tier.width,
                success: tier.success,
                fill_ratio: tier.fill_ratio,
            });
            tier
        })
        .collect();

    let result = system_result(cables, system_width, tiers, params);
    on_event(&SolveEvent::Finished {
        system_width: result.system_width,
        success: result.success,
        tiers: result.tier_count(),
    });
    result
}

/// Solves a system at a caller-provided width, bypassing the search.
///
/// The width is clamped to `max_width`.
pub fn solve_system_at_width(
    cables: &[CableSpec],
    params: &SolveParams,
    width: f64,
    config: &SolverConfig,
) -> SystemResult {
    let width = width.min(config.max_width);
    let tiers: Vec<TierResult> = distribute(cables, params.number_of_tiers)
        .iter()
        .enumerate()
        .map(|(idx, bucket)| refit_tier(bucket, idx, width, params, config))
        .collect();
    system_result(cables, width, tiers, params)
}

/// Escalates the tier count until the system fits.
///
/// Tries 1 to `max_auto_tiers` tiers and returns the first successful result
/// with a width within `max_width`, otherwise the result for `max_auto_tiers`.
pub fn auto_solve_system(cables: &[CableSpec], params: &SolveParams, config: &SolverConfig) -> SystemResult {
    auto_solve_system_with_progress(cables, params, config, |_| {})
}

/// Auto tier escalation with a live progress callback.
///
/// Events of every attempted tier count are forwarded in order.
pub fn auto_solve_system_with_progress(
    cables: &[CableSpec],
    params: &SolveParams,
    config: &SolverConfig,
    mut on_event: impl FnMut(&SolveEvent),
) -> SystemResult {
    let max_tiers = config.max_auto_tiers.max(1);
    for tiers in 1..max_tiers {
        let result = solve_system_with_progress(cables, &params.with_tiers(tiers), config, &mut on_event);
        if result.success && result.system_width <= config.max_width {
            log::debug!("auto solve settled on {tiers} tiers at {} mm", result.system_width);
            return result;
        }
    }
    solve_system_with_progress(cables, &params.with_tiers(max_tiers), config, &mut on_event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, diameter: f64) -> Vec<CableSpec> {
        (0..n)
            .map(|i| CableSpec::new(format!("C{i:03}"), diameter).unwrap())
            .collect()
    }

    fn params(tiers: usize) -> SolveParams {
        SolveParams::new(tiers, 60.0, 40.0).unwrap()
    }

    #[test]
    fn params_reject_invalid_height() {
        assert!(matches!(
            SolveParams::new(1, 0.0, 40.0),
            Err(ValidationError::InvalidConfiguration(_))
        ));
        assert!(SolveParams::new(1, 60.0, 0.0).is_err());
    }

    #[test]
    fn round_robin_distribution() {
        let buckets = distribute(&uniform(7, 10.0), 3);
        let sizes: Vec<_> = buckets.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 2]);
        assert_eq!(buckets[0][1].id, "C003");
    }

    #[test]
    fn start_width_is_a_standard_width() {
        let config = SolverConfig::default();
        // 5 x 10 mm: 392.7 mm² / 24 mm effective height = 16.4 mm
        let area = total_cable_area(&uniform(5, 10.0));
        assert_eq!(start_width(area, &params(1), &config), 100.0);
    }

    #[test]
    fn empty_tier_succeeds_at_min_width() {
        let config = SolverConfig::default();
        let tier = solve_single_tier(&[], 2, &params(1), &config);

        assert!(tier.success);
        assert_eq!(tier.width, config.min_width);
        assert_eq!(tier.fill_ratio, 0.0);
        assert_eq!(tier.tier_index, 2);
    }

    #[test]
    fn small_bucket_fits_narrowest_tray() {
        let config = SolverConfig::default();
        let tier = solve_single_tier(&uniform(5, 10.0), 0, &params(1), &config);

        assert!(tier.success);
        assert_eq!(tier.width, 100.0);
        assert_eq!(tier.cable_count, 5);
        let expected = tier.total_cable_area / (100.0 * 60.0) * 100.0;
        assert!((tier.fill_ratio - expected).abs() < 1e-9);
        assert!(!tier.exceeds_height_limit);
    }

    #[test]
    fn oversized_cable_is_classified_infeasible() {
        let config = SolverConfig::default();
        let mut cables = uniform(3, 10.0);
        cables.push(CableSpec::new("HUGE", 9999.0).unwrap());

        let tier = solve_single_tier(&cables, 0, &params(1), &config);
        assert!(!tier.success);
        assert_eq!(tier.width, config.max_width);
        let failure = tier.failure.expect("failure details");
        assert_eq!(failure.kind, FailureKind::InfeasibleCable);
        assert_eq!(failure.cable_id, "HUGE");
        assert_eq!(failure.cable_index, 0);
        assert_eq!(failure.kind.code(), "infeasible_cable");
    }

    #[test]
    fn exhausted_width_is_reported() {
        let config = SolverConfig::builder().width_search(100.0, 200.0, 100.0).build();
        // Fifty 30 mm cables are floor-only and need far more than 200 mm
        let tier = solve_single_tier(&uniform(50, 30.0), 0, &params(1), &config);

        assert!(!tier.success);
        let failure = tier.failure.expect("failure details");
        assert_eq!(failure.kind, FailureKind::WidthCapExhausted);
        assert_eq!(failure.width, 200.0);
        assert_eq!(failure.cable_index, tier.cables.len());
    }

    #[test]
    fn falls_back_below_start_width_beyond_max() {
        let config = SolverConfig::default();
        // 1 % of a 30 mm tray puts the start width far above max_width
        let params = SolveParams::new(1, 30.0, 1.0).unwrap();
        let cables = uniform(5, 10.0);
        let start = start_width(total_cable_area(&cables), &params, &config);
        assert!(start > config.max_width);

        let mut attempted = Vec::new();
        let tier = solve_tier_with_progress(&cables, 0, &params, &config, &mut |e: &SolveEvent| {
            if let SolveEvent::WidthAttempted { width, .. } = e {
                attempted.push(*width);
            }
        });

        assert!(tier.success);
        assert!(tier.width < start);
        assert_eq!(tier.width, config.min_width);
        assert_eq!(attempted, vec![config.min_width]);
    }

    #[test]
    fn events_serialize_with_camel_case_fields() {
        let event = SolveEvent::TierStarted {
            tier_index: 1,
            cable_count: 4,
            start_width: 200.0,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "TierStarted");
        assert_eq!(value["tierIndex"], 1);
        assert_eq!(value["cableCount"], 4);
        assert_eq!(value["startWidth"], 200.0);

        let value = serde_json::to_value(SolveEvent::SystemWidthChosen { system_width: 300.0 }).unwrap();
        assert_eq!(value["systemWidth"], 300.0);
    }

    #[test]
    fn system_tiers_share_width() {
        let config = SolverConfig::default();
        let mut cables = uniform(12, 10.0);
        cables.extend((0..4).map(|i| CableSpec::new(format!("P{i}"), 25.0).unwrap()));

        let result = solve_system(&cables, &params(2), &config);
        assert_eq!(result.tier_count(), 2);
        assert!(result.tiers.iter().all(|t| t.width == result.system_width));
        assert_eq!(result.cable_count, 16);
        assert_eq!(result.max_height_per_tier, 60.0);
    }

    #[test]
    fn progress_events_bracket_the_solve() {
        let config = SolverConfig::default();
        let mut events = Vec::new();
        let result = solve_system_with_progress(&uniform(6, 10.0), &params(2), &config, |e| {
            events.push(e.clone())
        });

        assert!(result.success);
        assert!(matches!(events.first(), Some(SolveEvent::TierStarted { tier_index: 0, .. })));
        assert!(matches!(events.last(), Some(SolveEvent::Finished { tiers: 2, success: true, .. })));
        let solved = events
            .iter()
            .filter(|e| matches!(e, SolveEvent::TierSolved { .. }))
            .count();
        assert_eq!(solved, 2);
    }

    #[test]
    fn fixed_width_is_clamped() {
        let config = SolverConfig::default();
        let result = solve_system_at_width(&uniform(4, 10.0), &params(1), 2000.0, &config);
        assert_eq!(result.system_width, config.max_width);
        assert!(result.success);
    }

    #[test]
    fn fixed_width_too_narrow_fails() {
        let config = SolverConfig::default();
        let result = solve_system_at_width(&uniform(4, 30.0), &params(1), 100.0, &config);
        assert!(!result.success);
        assert_eq!(result.failures().count(), 1);
    }

    #[test]
    fn auto_solve_adds_tiers_until_it_fits() {
        let config = SolverConfig::builder().width_search(100.0, 300.0, 100.0).build();
        // 16 floor-only 30 mm cables: at most 9 fit on 280 mm of usable floor
        let result = auto_solve_system(&uniform(16, 30.0), &params(1), &config);

        assert!(result.success);
        assert_eq!(result.tier_count(), 2);
        assert!(result.system_width <= 300.0);
    }
}
