// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Spectral Ringing Classifier
// ─────────────────────────────────────────────────────────────────────
//! Turns the two measurement-window series of one run into the three
//! ringing metrics and a binary label:
//!
//!   r_mean   = mean r(t)
//!   Δ_PSD_dB = 10·log10(max / median) of the Welch PSD of r(t), DC excluded
//!   N_over   = upward crossings of (R − median) / (MAD + ε) through `level`
//!
//! ring ⇔ Δ_PSD_dB ≥ psd_db ∧ N_over ≥ n_over ∧ r_mean ≥ r_mean_min

use resonance_types::{
    InvalidReason, PointMetrics, RingingThresholds, SpectralParams, SweepConfig,
};

use crate::crossings::{count_upward_crossings, robust_standardize};
use crate::welch::{peak_prominence_db, WelchEstimator};

/// Metrics of one replicate and the label they imply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub metrics: PointMetrics,
    pub ring_label: bool,
}

/// Stateless apart from the cached FFT plan; one per worker thread.
pub struct RingingClassifier {
    thresholds: RingingThresholds,
    welch: WelchEstimator,
    crossing_level: f64,
    sample_rate: f64,
}

impl RingingClassifier {
    pub fn new(thresholds: RingingThresholds, spectral: &SpectralParams, sample_rate: f64) -> Self {
        Self {
            thresholds,
            welch: WelchEstimator::new(spectral.nperseg, spectral.noverlap),
            crossing_level: spectral.crossing_level,
            sample_rate,
        }
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config.thresholds.clone(),
            &config.spectral,
            config.dynamics.sample_rate(),
        )
    }

    pub fn thresholds(&self) -> &RingingThresholds {
        &self.thresholds
    }

    /// Compute metrics and label for one run.
    ///
    /// Empty input yields `EmptyMeasureWindow`; a non-finite metric is
    /// reported by name rather than labelled.
    pub fn classify(
        &mut self,
        synchrony: &[f64],
        dispersion: &[f64],
    ) -> Result<Classification, InvalidReason> {
        if synchrony.is_empty() || dispersion.is_empty() {
            return Err(InvalidReason::EmptyMeasureWindow);
        }

        let r_mean = synchrony.iter().sum::<f64>() / synchrony.len() as f64;
        if !r_mean.is_finite() {
            return Err(InvalidReason::NonFiniteMetric {
                metric: "r_mean".to_string(),
            });
        }

        let psd = self.welch.estimate(synchrony, self.sample_rate);
        let delta_psd_db = peak_prominence_db(&psd);
        if !delta_psd_db.is_finite() {
            return Err(InvalidReason::NonFiniteMetric {
                metric: "delta_psd_db".to_string(),
            });
        }

        let z = robust_standardize(dispersion);
        let n_over = count_upward_crossings(&z, self.crossing_level);

        let metrics = PointMetrics {
            r_mean,
            delta_psd_db,
            n_over,
        };
        let ring_label = self
            .thresholds
            .is_ringing(delta_psd_db, f64::from(n_over), r_mean);
        log::trace!(
            "classified: r_mean={r_mean:.4} psd={delta_psd_db:.2}dB n_over={n_over} ring={ring_label}"
        );
        Ok(Classification {
            metrics,
            ring_label,
        })
    }
}
