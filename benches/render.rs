use chromasense::calibration::{fit, CalibrationRecord, PatchSample};
use chromasense::pipeline::render;
use chromasense::sensing::RawSample;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let sample = RawSample::new(21_432, 18_977, 12_405, 44_810);

    let identity = CalibrationRecord::default();
    group.bench_function("identity_record", |b| {
        b.iter(|| render(black_box(&sample), black_box(&identity)))
    });

    let mut full = CalibrationRecord::default()
        .with_white_balance([1.12, 0.97, 1.31])
        .adjust_saturation(0.25);
    full.ccm = [
        [1.18, -0.09, 0.02],
        [-0.14, 1.21, -0.07],
        [0.01, -0.12, 1.09],
    ];
    group.bench_function("full_record", |b| {
        b.iter(|| render(black_box(&sample), black_box(&full)))
    });

    group.finish();
}

fn benchmark_ccm_fit(c: &mut Criterion) {
    let map = nalgebra::Matrix3::new(1.2, -0.1, 0.05, -0.2, 1.1, 0.0, 0.03, -0.04, 0.9);
    let sensors = [
        Vector3::new(0.33, 0.33, 0.33),
        Vector3::new(0.8, 0.1, 0.05),
        Vector3::new(0.1, 0.75, 0.1),
        Vector3::new(0.05, 0.1, 0.7),
        Vector3::new(0.1, 0.5, 0.5),
        Vector3::new(0.45, 0.05, 0.5),
        Vector3::new(0.4, 0.5, 0.08),
    ];
    let samples: Vec<PatchSample> = sensors
        .iter()
        .map(|s| PatchSample {
            sensor_normalized: *s,
            reference_linear: map * s,
        })
        .collect();

    c.bench_function("ccm_fit_seven_patches", |b| {
        b.iter(|| fit(black_box(&samples)))
    });
}

criterion_group!(benches, benchmark_render, benchmark_ccm_fit);
criterion_main!(benches);
