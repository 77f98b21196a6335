use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use astrometers::{
    Astrometers, EngineConstants, MeterConfig, MeterRegistry, SyntheticEphemeris,
};
use astrometers_calibration::synthetic_fleet;
use engine_meters::PercentileTable;

fn bench_engine() -> Astrometers {
    let configs: Vec<MeterConfig> = MeterConfig::builtin()
        .into_iter()
        .map(|mut c| {
            c.dti_samples = (0..1000).map(|v| v as f64 * 0.05).collect();
            c.hqs_samples = (-500..500).map(|v| v as f64 * 0.05).collect();
            c
        })
        .collect();
    Astrometers::new(
        EngineConstants::default(),
        MeterRegistry::from_configs(configs).unwrap(),
    )
}

fn full_evaluation_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let engine = bench_engine();
    let source = SyntheticEphemeris::new();
    let chart = synthetic_fleet(1).pop().unwrap();
    let instant = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    c.bench_function("evaluate_all_meters", |b| {
        b.iter(|| {
            let reading = runtime
                .block_on(engine.evaluate(&source, black_box(&chart), black_box(instant)))
                .unwrap();
            black_box(reading)
        })
    });
}

fn percentile_rank_benchmark(c: &mut Criterion) {
    let table = PercentileTable::from_unsorted((0..2000).map(|v| (v as f64).sin() * 40.0).collect())
        .unwrap();
    c.bench_function("percentile_rank", |b| {
        b.iter(|| black_box(table.rank(black_box(17.3))))
    });
}

criterion_group!(benches, full_evaluation_benchmark, percentile_rank_benchmark);
criterion_main!(benches);
