//! Benchmarks for tray fitting and system sizing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tray_fill::model::CableSpec;
use tray_fill::optimizer::{SolverConfig, try_fit};
use tray_fill::solver::{SolveParams, solve_system};

fn mixed_cables(n: usize) -> Vec<CableSpec> {
    (0..n)
        .map(|i| {
            let diameter = 6.0 + (i % 9) as f64 * 3.0;
            CableSpec::new(format!("B{i}"), diameter).expect("positive diameter")
        })
        .collect()
}

fn solver_benchmark(c: &mut Criterion) {
    let config = SolverConfig::default();
    let cables = mixed_cables(60);

    c.bench_function("try_fit_60_mixed_cables", |b| {
        b.iter(|| {
            let outcome = try_fit(black_box(&cables), black_box(400.0), &config);
            black_box(outcome)
        })
    });

    let params = SolveParams::new(3, 60.0, 40.0).expect("valid parameters");
    c.bench_function("solve_system_60_cables_3_tiers", |b| {
        b.iter(|| {
            let result = solve_system(black_box(&cables), &params, &config);
            black_box(result)
        })
    });
}

criterion_group!(benches, solver_benchmark);
criterion_main!(benches);
