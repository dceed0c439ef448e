// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Sweep Result Records
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RingingThresholds;

/// The three scalar ringing metrics of one replicate (or a cell mean).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointMetrics {
    /// Mean Kuramoto order parameter over the measurement window.
    pub r_mean: f64,
    /// Welch peak prominence of r(t), dB above the median bin.
    pub delta_psd_db: f64,
    /// Upward crossings of the robustly standardised dispersion series.
    pub n_over: u32,
}

impl PointMetrics {
    pub fn is_finite(&self) -> bool {
        self.r_mean.is_finite() && self.delta_psd_db.is_finite()
    }
}

/// Why a replicate produced no metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidReason {
    /// Burn-in consumed every step, or the measurement cap is zero.
    EmptyMeasureWindow,
    /// A phase became NaN or infinite during integration.
    NonFinitePhase { step: usize },
    /// A coupling weight became NaN or infinite during integration.
    NonFiniteWeights { step: usize },
    /// A recorded metric came out non-finite.
    NonFiniteMetric { metric: String },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMeasureWindow => f.write_str("empty_measure_window"),
            Self::NonFinitePhase { step } => write!(f, "non_finite_phase@{step}"),
            Self::NonFiniteWeights { step } => write!(f, "non_finite_weights@{step}"),
            Self::NonFiniteMetric { metric } => write!(f, "non_finite_metric:{metric}"),
        }
    }
}

/// Either metrics plus a label, or a typed failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PointOutcome {
    Valid {
        metrics: PointMetrics,
        ring_label: bool,
    },
    Invalid {
        reason: InvalidReason,
    },
}

/// One replicate's outcome at one (K, γ) grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointResult {
    pub k: f64,
    pub gamma: f64,
    pub rep: usize,
    pub seed: u64,
    pub outcome: PointOutcome,
}

impl PointResult {
    pub fn valid(k: f64, gamma: f64, rep: usize, seed: u64, metrics: PointMetrics, ring: bool) -> Self {
        Self {
            k,
            gamma,
            rep,
            seed,
            outcome: PointOutcome::Valid {
                metrics,
                ring_label: ring,
            },
        }
    }

    pub fn invalid(k: f64, gamma: f64, rep: usize, seed: u64, reason: InvalidReason) -> Self {
        Self {
            k,
            gamma,
            rep,
            seed,
            outcome: PointOutcome::Invalid { reason },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, PointOutcome::Valid { .. })
    }

    /// Ring label; invalid replicates never ring.
    pub fn ring_label(&self) -> bool {
        match self.outcome {
            PointOutcome::Valid { ring_label, .. } => ring_label,
            PointOutcome::Invalid { .. } => false,
        }
    }

    pub fn metrics(&self) -> Option<&PointMetrics> {
        match &self.outcome {
            PointOutcome::Valid { metrics, .. } => Some(metrics),
            PointOutcome::Invalid { .. } => None,
        }
    }

    pub fn invalid_reason(&self) -> Option<&InvalidReason> {
        match &self.outcome {
            PointOutcome::Valid { .. } => None,
            PointOutcome::Invalid { reason } => Some(reason),
        }
    }

    pub fn seed_record(&self) -> SeedRecord {
        SeedRecord {
            k: self.k,
            gamma: self.gamma,
            rep: self.rep,
            seed: self.seed,
        }
    }
}

/// Seed manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub k: f64,
    pub gamma: f64,
    pub rep: usize,
    pub seed: u64,
}

/// Aggregate of all replicates at one (K, γ) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub k: f64,
    pub gamma: f64,
    /// Row index (γ).
    pub gamma_index: usize,
    /// Column index (K).
    pub k_index: usize,
    /// Strict-majority vote over valid replicates.
    pub ring_label: bool,
    /// Mean r over valid replicates (0 when none are valid).
    pub r_mean: f64,
    /// Mean spectral prominence over valid replicates.
    pub delta_psd_db: f64,
    /// Mean crossing count over valid replicates.
    pub n_over: f64,
    pub replicates: usize,
    pub valid_replicates: usize,
    pub invalid_fraction: f64,
    /// Forced to "not ringing" by the invalid-replicate policy.
    pub excluded: bool,
}

impl GridCell {
    /// Re-apply the point-level rule to the cell means.
    pub fn passes(&self, thresholds: &RingingThresholds) -> bool {
        thresholds.is_ringing(self.delta_psd_db, self.n_over, self.r_mean)
    }
}

/// Outcome of one null check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        })
    }
}

/// Supporting numbers for each null check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum NullDetails {
    NoRinging {
        thresholds: RingingThresholds,
        passing_cells: usize,
    },
    RegionMinimum {
        area_frac: f64,
        area_frac_min: f64,
        largest_cc: usize,
        cc_min: usize,
    },
    BoundedSpan {
        span_frac_max: f64,
        /// Span fraction per γ row; `None` for rows without ringing cells.
        row_span_fracs: Vec<Option<f64>>,
        qualifying_rows: usize,
    },
    NegativeControl {
        true_cells: usize,
        control_true_cells: usize,
        ratio: f64,
        ratio_min: f64,
    },
    Skipped {
        reason: String,
    },
}

/// One named falsification check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullCheck {
    pub name: String,
    pub status: CheckStatus,
    pub details: NullDetails,
}

impl NullCheck {
    pub fn new(name: &str, failed: bool, details: NullDetails) -> Self {
        Self {
            name: name.to_string(),
            status: if failed {
                CheckStatus::Fail
            } else {
                CheckStatus::Pass
            },
            details,
        }
    }

    pub fn skipped(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Skip,
            details: NullDetails::Skipped {
                reason: reason.to_string(),
            },
        }
    }

    pub fn failed(&self) -> bool {
        self.status == CheckStatus::Fail
    }
}

/// Grid-level counts reported alongside the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    /// γ rows.
    pub rows: usize,
    /// K columns.
    pub cols: usize,
    pub true_cells: usize,
    pub total_cells: usize,
    pub area_fraction: f64,
    pub largest_component: usize,
}

/// Terminal artifact of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullEvaluationReport {
    pub no_ringing: NullCheck,
    pub region_minimum: NullCheck,
    pub bounded_span: NullCheck,
    pub negative_control: NullCheck,
    /// True iff any non-skipped check failed.
    pub rejected: bool,
    pub summary: GridSummary,
}

impl NullEvaluationReport {
    pub fn new(
        no_ringing: NullCheck,
        region_minimum: NullCheck,
        bounded_span: NullCheck,
        negative_control: NullCheck,
        summary: GridSummary,
    ) -> Self {
        let rejected = [&no_ringing, &region_minimum, &bounded_span, &negative_control]
            .iter()
            .any(|c| c.failed());
        Self {
            no_ringing,
            region_minimum,
            bounded_span,
            negative_control,
            rejected,
            summary,
        }
    }

    /// Checks in reporting order.
    pub fn checks(&self) -> [&NullCheck; 4] {
        [
            &self.no_ringing,
            &self.region_minimum,
            &self.bounded_span,
            &self.negative_control,
        ]
    }
}
