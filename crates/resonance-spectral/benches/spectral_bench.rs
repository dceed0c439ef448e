// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Spectral Classifier Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for per-replicate classification at the default
//! measurement window (15 000 samples).

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use resonance_spectral::{count_upward_crossings, robust_standardize, RingingClassifier, WelchEstimator};
use resonance_types::SweepConfig;

const SAMPLES: usize = 15_000;
const FS: f64 = 100.0;

// ── Helpers ───────────────────────────────────────────────────────────

fn make_synchrony() -> Vec<f64> {
    (0..SAMPLES)
        .map(|i| 0.6 + 0.2 * (std::f64::consts::TAU * 0.8 * i as f64 / FS).sin())
        .collect()
}

fn make_dispersion() -> Vec<f64> {
    (0..SAMPLES)
        .map(|i| 0.3 + 0.05 * (i as f64 * 0.013).sin())
        .collect()
}

// ── Benchmarks ────────────────────────────────────────────────────────

fn bench_welch(c: &mut Criterion) {
    let x = make_synchrony();
    let mut est = WelchEstimator::default_params();
    c.bench_function("welch_15000", |b| b.iter(|| est.estimate(black_box(&x), FS)));
}

fn bench_crossings(c: &mut Criterion) {
    let x = make_dispersion();
    c.bench_function("robust_crossings_15000", |b| {
        b.iter(|| count_upward_crossings(&robust_standardize(black_box(&x)), 1.0))
    });
}

fn bench_classify(c: &mut Criterion) {
    let r = make_synchrony();
    let w = make_dispersion();
    let mut clf = RingingClassifier::from_config(&SweepConfig::default());
    c.bench_function("classify_15000", |b| {
        b.iter(|| clf.classify(black_box(&r), black_box(&w)))
    });
}

criterion_group!(benches, bench_welch, bench_crossings, bench_classify);
criterion_main!(benches);
