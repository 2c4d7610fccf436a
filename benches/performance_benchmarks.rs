use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cellrs::eol::EolEstimator;
use cellrs::models::{BatteryRecordSet, CycleRecord};
use cellrs::report::BatteryAnalyzer;
use cellrs::soh::SohSeriesBuilder;
use cellrs::statistics::StatisticalSummarizer;

/// Performance benchmarks for the degradation analysis pipeline
///
/// Core estimation is linear in the cycle count; these benchmarks verify
/// that the pipeline scales over record sets of increasing size.

fn create_record_set(cycles: usize, samples_per_cycle: usize) -> BatteryRecordSet {
    let cycle_data = (0..cycles)
        .map(|i| {
            let fade = 0.15 * i as f64 / cycles as f64;
            CycleRecord {
                cycle_number: Some(i as u32 + 1),
                current_in_a: (0..samples_per_cycle)
                    .map(|s| if s % 2 == 0 { 1.0 } else { -1.0 })
                    .collect(),
                voltage_in_v: (0..samples_per_cycle)
                    .map(|s| 3.2 + 0.8 * s as f64 / samples_per_cycle as f64)
                    .collect(),
                time_in_s: (0..samples_per_cycle).map(|s| s as f64).collect(),
                charge_capacity_in_ah: Some(vec![0.0, 2.0 * (1.0 - fade) * 1.005]),
                discharge_capacity_in_ah: Some(vec![0.0, 2.0 * (1.0 - fade)]),
                temperature_in_c: Some(vec![25.0, 25.5]),
            }
        })
        .collect();

    BatteryRecordSet {
        cycle_data,
        nominal_capacity_in_ah: Some(2.0),
        ..BatteryRecordSet::default()
    }
}

fn bench_soh_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("SOH Series");
    let builder = SohSeriesBuilder::new();

    for &cycles in &[100, 1_000, 10_000] {
        let set = create_record_set(cycles, 10);

        group.throughput(Throughput::Elements(cycles as u64));
        group.bench_with_input(BenchmarkId::new("build", cycles), &set, |b, set| {
            b.iter(|| {
                let _ = builder.build(black_box(set), None);
            });
        });
    }

    group.finish();
}

fn bench_eol_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("EOL Estimation");
    let estimator = EolEstimator::new();

    for &cycles in &[100, 1_000, 10_000] {
        // Linear descent ending in the regression band, the costliest branch
        let soh: Vec<f64> = (0..cycles)
            .map(|i| 0.99 - 0.18 * i as f64 / cycles as f64)
            .collect();

        group.throughput(Throughput::Elements(cycles as u64));
        group.bench_with_input(BenchmarkId::new("estimate", cycles), &soh, |b, soh| {
            b.iter(|| {
                let _ = estimator.estimate_values(black_box(soh));
            });
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("Statistical Summary");
    let summarizer = StatisticalSummarizer::new();

    for &cycles in &[100, 1_000] {
        let set = create_record_set(cycles, 100);

        group.throughput(Throughput::Elements(cycles as u64));
        group.bench_with_input(BenchmarkId::new("summarize", cycles), &set, |b, set| {
            b.iter(|| {
                let _ = summarizer.summarize(black_box(set));
            });
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Full Analysis");
    let analyzer = BatteryAnalyzer::new();

    for &cycles in &[100, 1_000] {
        let set = create_record_set(cycles, 50);

        group.throughput(Throughput::Elements(cycles as u64));
        group.bench_with_input(BenchmarkId::new("analyze", cycles), &set, |b, set| {
            b.iter(|| {
                let _ = analyzer.analyze(black_box(set), Some("bench-cell"));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_soh_series,
    bench_eol_estimation,
    bench_statistics,
    bench_full_pipeline
);
criterion_main!(benches);
