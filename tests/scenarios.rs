//! End-to-end sizing scenarios against the public engine API.

use tray_fill::matrix::{find_cell, generate_matrix};
use tray_fill::model::CableSpec;
use tray_fill::optimizer::SolverConfig;
use tray_fill::physics::{find_overlaps, inspect, validate_gravity};
use tray_fill::solver::{
    FailureKind, SolveParams, distribute, solve_single_tier, solve_system, solve_system_at_width,
};

fn uniform(n: usize, diameter: f64) -> Vec<CableSpec> {
    (0..n)
        .map(|i| CableSpec::new(format!("C{i:03}"), diameter).unwrap())
        .collect()
}

mod sizing_scenarios {
    use super::*;

    #[test]
    fn small_uniform_set_fits_a_standard_width() {
        let config = SolverConfig::default();
        let params = SolveParams::new(1, 60.0, 40.0).unwrap();
        let result = solve_system(&uniform(5, 10.0), &params, &config);

        assert!(result.success);
        assert_eq!(result.system_width % 100.0, 0.0);
        assert!(result.tiers[0].fill_ratio < 100.0);
        assert_eq!(result.tiers[0].cables.len(), 5);
    }

    #[test]
    fn oversized_cable_fails_at_every_width() {
        let config = SolverConfig::default();
        let params = SolveParams::new(1, 60.0, 40.0).unwrap();
        let cables = vec![CableSpec::new("GIANT", 9999.0).unwrap()];

        let result = solve_system(&cables, &params, &config);
        assert!(!result.success);
        let failure = result.failures().next().expect("failure details");
        assert_eq!(failure.kind, FailureKind::InfeasibleCable);
        assert_eq!(failure.cable_id, "GIANT");

        for width in config.width_range(config.min_width, config.max_width) {
            let fixed = solve_system_at_width(&cables, &params, width, &config);
            assert!(!fixed.success, "width {width} must not fit");
        }
    }

    #[test]
    fn large_cables_stay_on_the_floor() {
        let config = SolverConfig::default();
        let params = SolveParams::new(1, 100.0, 40.0).unwrap();
        let result = solve_system(&uniform(20, 35.0), &params, &config);

        assert!(result.success);
        // Twenty 35 mm cables side by side need 700 mm of usable floor
        assert_eq!(result.system_width, 800.0);
        for cable in &result.tiers[0].cables {
            assert_eq!(cable.layer, 1, "cable {} left the floor", cable.id());
        }
    }

    #[test]
    fn system_width_is_widest_independent_tier() {
        let config = SolverConfig::default();
        let params = SolveParams::new(3, 60.0, 40.0).unwrap();
        let cables = uniform(100, 10.0);

        let result = solve_system(&cables, &params, &config);
        assert_eq!(result.tier_count(), 3);

        let independent = distribute(&cables, 3)
            .iter()
            .enumerate()
            .map(|(idx, bucket)| solve_single_tier(bucket, idx, &params, &config).width)
            .fold(f64::MIN, f64::max);
        assert_eq!(result.system_width, independent);
        assert!(result.tiers.iter().all(|t| t.width == result.system_width));
        assert!(result.success);
    }

    #[test]
    fn matrix_agrees_with_solver_choice() {
        let config = SolverConfig::default();
        let params = SolveParams::new(3, 60.0, 40.0).unwrap();
        let cables = uniform(100, 10.0);

        let result = solve_system(&cables, &params, &config);
        let matrix = generate_matrix(&cables, &params, &config);
        let cell = find_cell(&matrix, 3, result.system_width).expect("cell in matrix range");

        assert!(cell.physically_fits);
        assert!(cell.meets_target);
    }
}

mod solver_properties {
    use super::*;

    #[test]
    fn adding_cables_never_narrows_the_tray() {
        let config = SolverConfig::default();
        let params = SolveParams::new(1, 60.0, 40.0).unwrap();
        let all = uniform(120, 10.0);

        let mut previous = 0.0;
        for count in [1, 5, 10, 30, 31, 60, 90, 120] {
            let tier = solve_single_tier(&all[..count], 0, &params, &config);
            assert!(tier.success);
            assert!(
                tier.width >= previous,
                "{count} cables gave {} mm after {previous} mm",
                tier.width
            );
            previous = tier.width;
        }
    }

    #[test]
    fn solved_tiers_are_physically_valid() {
        let config = SolverConfig::default();
        let params = SolveParams::new(2, 60.0, 40.0).unwrap();
        let mut cables = uniform(30, 8.0);
        cables.extend((0..6).map(|i| {
            CableSpec::new(format!("P{i}"), 24.0)
                .unwrap()
                .with_name(format!("Feeder {i}"))
                .with_type("MY4")
                .with_system("POWER")
                .with_route("ER-01", format!("SWBD-{}", i % 2))
        }));

        let result = solve_system(&cables, &params, &config);
        assert!(result.success);
        for tier in &result.tiers {
            assert!(validate_gravity(&tier.cables, &config));
            assert!(find_overlaps(&tier.cables, &config).is_empty());
            let report = inspect(&tier.cables, Some(tier.width), &config);
            assert!(report.valid, "tier {} report: {report:?}", tier.tier_index);
        }
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let config = SolverConfig::default();
        let params = SolveParams::new(2, 60.0, 40.0).unwrap();
        let cables: Vec<CableSpec> = (0..40)
            .map(|i| CableSpec::new(format!("M{i}"), 6.0 + (i % 7) as f64 * 3.0).unwrap())
            .collect();

        let first = solve_system(&cables, &params, &config);
        let second = solve_system(&cables, &params, &config);

        assert_eq!(first.system_width, second.system_width);
        for (a, b) in first.tiers.iter().zip(&second.tiers) {
            assert_eq!(a.cables, b.cables);
        }
    }
}
