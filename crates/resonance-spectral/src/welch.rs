// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Welch Power Spectral Density
// ─────────────────────────────────────────────────────────────────────
//! Averaged one-sided periodogram over overlapping Hann-windowed
//! segments, each mean-removed before windowing:
//!
//!   P_k = |FFT(w · (x_seg − mean))_k|² / (fs · Σ w²)
//!
//! and the peak prominence of the result in dB, DC bin excluded.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::crossings::median;

/// Series shorter than this produce a single zero bin.
const MIN_SAMPLES: usize = 8;

/// One-sided spectrum: `freqs[k] = k · fs / nperseg`.
#[derive(Debug, Clone, PartialEq)]
pub struct Psd {
    pub freqs: Vec<f64>,
    pub power: Vec<f64>,
}

impl Psd {
    fn degenerate() -> Self {
        Self {
            freqs: vec![0.0],
            power: vec![0.0],
        }
    }

    /// Frequency of the strongest non-DC bin.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.power
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| self.freqs[k])
    }
}

/// Symmetric Hann window w[i] = 0.5·(1 − cos(2πi/(n−1))).
pub fn hann_window_symmetric(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (n - 1) as f64;
            (0..n)
                .map(|i| 0.5 * (1.0 - (std::f64::consts::TAU * i as f64 / denom).cos()))
                .collect()
        }
    }
}

/// Welch estimator with a cached FFT plan.
pub struct WelchEstimator {
    nperseg: usize,
    noverlap: usize,
    planner: FftPlanner<f64>,
}

impl WelchEstimator {
    /// `noverlap` is clamped below `nperseg` at estimation time.
    pub fn new(nperseg: usize, noverlap: usize) -> Self {
        Self {
            nperseg: nperseg.max(1),
            noverlap,
            planner: FftPlanner::new(),
        }
    }

    /// 256-sample segments with 50% overlap.
    pub fn default_params() -> Self {
        Self::new(256, 128)
    }

    pub fn nperseg(&self) -> usize {
        self.nperseg
    }

    /// Estimate the PSD of `x` sampled at `fs`.
    ///
    /// The segment length shrinks to the series length when the series
    /// is shorter than one segment.
    pub fn estimate(&mut self, x: &[f64], fs: f64) -> Psd {
        let n = x.len();
        if n < MIN_SAMPLES {
            return Psd::degenerate();
        }

        let nperseg = self.nperseg.min(n);
        let noverlap = self.noverlap.min(nperseg.saturating_sub(1));
        let step = match nperseg - noverlap {
            0 => (nperseg / 2).max(1),
            s => s,
        };

        let window = hann_window_symmetric(nperseg);
        let win_norm: f64 = window.iter().map(|w| w * w).sum();
        let scale = 1.0 / (fs * win_norm);
        let n_bins = nperseg / 2 + 1;

        let fft: Arc<dyn Fft<f64>> = self.planner.plan_fft_forward(nperseg);
        let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];
        let mut accum = vec![0.0; n_bins];
        let mut segments = 0usize;

        for start in (0..=n - nperseg).step_by(step) {
            let seg = &x[start..start + nperseg];
            segments += 1;
            // A flat segment has no power; skipping it keeps the mean's
            // rounding residue from leaking a window-shaped spectrum.
            let (lo, hi) = seg
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            if hi - lo == 0.0 {
                continue;
            }
            let mean = seg.iter().sum::<f64>() / nperseg as f64;
            for ((slot, &v), &w) in buffer.iter_mut().zip(seg).zip(&window) {
                *slot = Complex::new((v - mean) * w, 0.0);
            }
            fft.process(&mut buffer);
            for (acc, c) in accum.iter_mut().zip(&buffer) {
                *acc += c.norm_sqr() * scale;
            }
        }

        let inv = 1.0 / segments.max(1) as f64;
        let power: Vec<f64> = accum.into_iter().map(|p| p * inv).collect();
        let freqs: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * fs / nperseg as f64)
            .collect();
        Psd { freqs, power }
    }
}

/// Δ_PSD_dB = 10·log10(max / median) over the non-DC bins.
///
/// 0 when fewer than two bins exist or no non-DC bin has positive power.
pub fn peak_prominence_db(psd: &Psd) -> f64 {
    if psd.power.len() < 2 {
        return 0.0;
    }
    let bins = &psd.power[1..];
    if bins.iter().all(|&p| p <= 0.0) {
        return 0.0;
    }
    let peak = bins.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let base = median(bins);
    if base <= 0.0 {
        return 0.0;
    }
    10.0 * (peak / base).log10()
}
