//! Benchmarks for marker refreshes.
//!
//! Run with: cargo bench --package marker-engine --bench refresh_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use marker_engine::{build_legend, compute_domain, RenderPlan, WorldMap};
use test_utils::{create_observation_grid, create_observation_grid_with, test_panel};
use worldmap_common::PanelConfig;

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_create");
    let config = test_panel(&[100.0, 1000.0]);

    for count in [10, 100, 1000, 5000] {
        let data = create_observation_grid(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                let mut map = WorldMap::new(RenderPlan::new());
                map.refresh(black_box(data), &config).ok();
                map
            })
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_update");
    let config = PanelConfig {
        log_scale: true,
        ..test_panel(&[100.0, 1000.0])
    };

    for count in [10, 100, 1000, 5000] {
        let first = create_observation_grid(count);
        let second = create_observation_grid_with(count, |i| ((count - i) * 3) as f64);
        let mut map = WorldMap::new(RenderPlan::new());
        map.refresh(&first, &config).ok();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let data = if flip { &second } else { &first };
                map.refresh(black_box(data), &config).ok()
            })
        });
    }
    group.finish();
}

fn bench_domain(c: &mut Criterion) {
    let values: Vec<f64> = (1..=10_000).map(|i| i as f64).collect();
    c.bench_function("compute_domain_log_10k", |b| {
        b.iter(|| compute_domain(black_box(&values), true))
    });
}

fn bench_legend(c: &mut Criterion) {
    let config = test_panel(&[2.0, 4.0]);
    c.bench_function("build_legend", |b| {
        b.iter(|| build_legend(black_box(&config.style.thresholds), &config.style.colors))
    });
}

criterion_group!(benches, bench_create, bench_update, bench_domain, bench_legend);
criterion_main!(benches);
