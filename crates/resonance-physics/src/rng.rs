// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Per-Run Noise Generator
// ─────────────────────────────────────────────────────────────────────

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Seeded generator owned by exactly one simulation run.
///
/// Never shared: each run constructs its own from the derived seed, so
/// runs can execute on any thread in any order.
pub struct NoiseRng {
    inner: StdRng,
}

impl NoiseRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Standard normal draw.
    pub fn next_normal(&mut self) -> f64 {
        self.inner.sample(StandardNormal)
    }

    /// Normal with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        mean + std * self.next_normal()
    }
}
