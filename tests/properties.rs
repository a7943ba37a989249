//! Randomized checks of the placement rules.

use proptest::prelude::*;
use tray_fill::model::CableSpec;
use tray_fill::optimizer::{SolverConfig, try_fit};
use tray_fill::physics::{find_overlaps, validate_gravity};
use tray_fill::solver::{SolveParams, solve_single_tier};

fn cables_from(diameters: &[f64]) -> Vec<CableSpec> {
    diameters
        .iter()
        .enumerate()
        .map(|(i, &d)| CableSpec::new(format!("R{i}"), d).expect("positive diameter"))
        .collect()
}

fn diameters() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(3.0f64..40.0, 0..24)
}

fn widths() -> impl Strategy<Value = f64> {
    (1u32..=9).prop_map(|step| step as f64 * 100.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn placed_cables_never_overlap(ds in diameters(), width in widths()) {
        let config = SolverConfig::default();
        let outcome = try_fit(&cables_from(&ds), width, &config);
        prop_assert!(find_overlaps(&outcome.placed, &config).is_empty());
    }

    #[test]
    fn placed_cables_are_supported(ds in diameters(), width in widths()) {
        let config = SolverConfig::default();
        let outcome = try_fit(&cables_from(&ds), width, &config);
        prop_assert!(validate_gravity(&outcome.placed, &config));
    }

    #[test]
    fn large_cables_rest_on_layer_one(ds in diameters(), width in widths()) {
        let config = SolverConfig::default();
        let outcome = try_fit(&cables_from(&ds), width, &config);
        for cable in outcome.placed.iter().filter(|c| config.is_large(c.cable.diameter)) {
            prop_assert_eq!(cable.layer, 1);
        }
    }

    #[test]
    fn fit_attempts_are_deterministic(ds in diameters(), width in widths()) {
        let config = SolverConfig::default();
        let cables = cables_from(&ds);
        let first = try_fit(&cables, width, &config);
        let second = try_fit(&cables, width, &config);
        prop_assert_eq!(first.placed, second.placed);
        prop_assert_eq!(first.all_placed, second.all_placed);
    }

    #[test]
    fn fill_ratio_matches_area_over_tray(
        ds in diameters(),
        height in 30.0f64..150.0,
        target in 10.0f64..90.0,
    ) {
        let config = SolverConfig::default();
        let params = SolveParams::new(1, height, target).expect("valid parameters");
        let tier = solve_single_tier(&cables_from(&ds), 0, &params, &config);
        let expected = tier.total_cable_area / (tier.width * height) * 100.0;
        prop_assert!((tier.fill_ratio - expected).abs() <= 1e-9 * expected.max(1.0));
    }
}
