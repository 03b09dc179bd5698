//! Benchmarks for the three short-rate engines.
//!
//! Run with: cargo bench -p callable-engines

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal_macros::dec;

use callable_bonds::{BondGeometry, CallableBondSpec};
use callable_core::types::{Date, Frequency};
use callable_curves::CurveHandle;
use callable_engines::prelude::*;

// =============================================================================
// TEST DATA
// =============================================================================

fn create_test_geometry() -> BondGeometry {
    let issue = Date::from_ymd(2025, 1, 15).unwrap();
    CallableBondSpec::builder()
        .face(dec!(100))
        .coupon_rate(dec!(0.035))
        .frequency(Frequency::SemiAnnual)
        .issue_date(issue)
        .maturity_date(Date::from_ymd(2045, 1, 15).unwrap())
        .add_call(Date::from_ymd(2037, 1, 15).unwrap(), 100.0)
        .build()
        .unwrap()
        .geometry(issue)
        .unwrap()
}

// =============================================================================
// ENGINE BENCHMARKS
// =============================================================================

fn bench_hull_white_lsmc(c: &mut Criterion) {
    let curve = CurveHandle::flat(0.04).unwrap();
    let geometry = create_test_geometry();
    let params = HullWhiteParams::new(0.03, 0.01);

    let mut group = c.benchmark_group("hull_white_lsmc");
    group.sample_size(10);

    for paths in [2_000, 10_000] {
        let engine = HullWhiteLsmcEngine::new(McConfig::default().with_paths(paths));
        group.bench_with_input(BenchmarkId::new("base_run", paths), &engine, |b, engine| {
            b.iter(|| engine.price(black_box(&curve), &geometry, &params, None))
        });

        let base = engine.price(&curve, &geometry, &params, None).unwrap();
        let bumped = curve.with_parallel_spread(0.0025);
        group.bench_with_input(BenchmarkId::new("cached_bump", paths), &engine, |b, engine| {
            b.iter(|| engine.price(black_box(&bumped), &geometry, &params, Some(base.cache.clone())))
        });
    }
    group.finish();
}

fn bench_cir_pde(c: &mut Criterion) {
    let curve = CurveHandle::flat(0.04).unwrap();
    let geometry = create_test_geometry();
    let params = CirParams::new(0.04, 0.2, 0.05);

    let mut group = c.benchmark_group("cir_pde");
    group.sample_size(10);

    for grid_size in [200, 800] {
        let engine = CirPdeEngine::new(PdeConfig {
            grid_size,
            ..PdeConfig::default()
        });
        group.bench_with_input(BenchmarkId::from_parameter(grid_size), &engine, |b, engine| {
            b.iter(|| engine.price(black_box(&curve), &geometry, &params, None))
        });
    }
    group.finish();
}

fn bench_black_karasinski_tree(c: &mut Criterion) {
    let curve = CurveHandle::flat(0.04).unwrap();
    let geometry = create_test_geometry();
    let params = BlackKarasinskiParams::new(0.03, 0.01);

    let mut group = c.benchmark_group("black_karasinski_tree");
    group.sample_size(10);

    for steps_per_year in [12, 52] {
        let engine = BlackKarasinskiTreeEngine::new(TreeConfig { steps_per_year });
        group.bench_with_input(
            BenchmarkId::from_parameter(steps_per_year),
            &engine,
            |b, engine| b.iter(|| engine.price(black_box(&curve), &geometry, &params, None)),
        );
    }
    group.finish();
}

criterion_group!(
    engines,
    bench_hull_white_lsmc,
    bench_cir_pde,
    bench_black_karasinski_tree,
);

criterion_main!(engines);
