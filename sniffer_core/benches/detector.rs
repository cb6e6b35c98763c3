use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use sniffer_core::motion::{SMOOTHING_WINDOW, StepVector, smooth_vectors};
use sniffer_core::{DetectionParams, Detector, GeometryCfg, SettingDefaults, locate};

// Ranges of an object walking toward the sensors with a little jitter.
fn approach_trace(n: usize, seed: u32) -> Vec<(f64, f64)> {
    let mut state = seed.max(1);
    let mut jitter = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (f64::from(x) / (f64::from(u32::MAX) + 1.0) - 0.5) * 2.0
    };
    (0..n)
        .map(|i| {
            let x = -4.0 + 0.03 * (i % 120) as f64;
            let y = 0.1;
            let r1 = x.hypot(y - 0.25) - 0.15;
            let r2 = x.hypot(y + 0.25) - 0.15;
            (r1 * 100.0 + jitter(), r2 * 100.0 + jitter())
        })
        .collect()
}

fn bench_locate(c: &mut Criterion) {
    c.bench_function("locate", |b| {
        b.iter(|| locate(black_box(63.4), black_box(59.1), 0.5, -0.15, -0.15));
    });
}

fn bench_smooth(c: &mut Criterion) {
    let steps: Vec<StepVector> = (0..9)
        .map(|i| StepVector {
            dx: 0.05 + f64::from(i) * 0.001,
            dy: -0.002,
        })
        .collect();
    c.bench_function("smooth_vectors_9", |b| {
        b.iter(|| smooth_vectors(black_box(&steps), SMOOTHING_WINDOW));
    });
}

fn bench_tick(c: &mut Criterion) {
    let trace = approach_trace(1_000, 0xC0FFEE);
    let params = DetectionParams::from(SettingDefaults::default());
    c.bench_function("detector_tick_1000", |b| {
        b.iter_batched(
            || Detector::new(GeometryCfg::default(), 50),
            |mut d| {
                for r in &trace {
                    black_box(d.tick(*r, &params));
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_locate, bench_smooth, bench_tick);
criterion_main!(benches);
