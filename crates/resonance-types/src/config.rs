// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Resonance Sweep Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};

/// Oscillator population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    /// Number of oscillators N. Default: 50.
    pub n: usize,
    /// Mean natural frequency (rad/s). Default: 1.0.
    pub omega_mean: f64,
    /// Standard deviation of natural frequencies. Default: 0.1.
    pub omega_std: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            n: 50,
            omega_mean: 1.0,
            omega_std: 0.1,
        }
    }
}

/// Integration schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsParams {
    /// Euler-Maruyama step size. Default: 0.01.
    pub dt: f64,
    /// Steps integrated per run. Default: 20_000.
    pub steps_total: usize,
    /// Leading steps discarded before recording. Default: 5_000.
    pub steps_burnin: usize,
    /// Maximum number of recorded samples after burn-in. Default: 15_000.
    pub steps_measure: usize,
}

impl Default for DynamicsParams {
    fn default() -> Self {
        Self {
            dt: 0.01,
            steps_total: 20_000,
            steps_burnin: 5_000,
            steps_measure: 15_000,
        }
    }
}

impl DynamicsParams {
    /// Number of samples a run will record; zero means an empty window.
    pub fn measured_samples(&self) -> usize {
        self.steps_total
            .saturating_sub(self.steps_burnin)
            .min(self.steps_measure)
    }

    /// Sampling rate of the recorded series (1/dt).
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.dt
    }
}

/// External sinusoidal forcing D·sin(Ω·t − θ_i).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveParams {
    /// Drive amplitude D. Default: 0.5.
    pub amplitude: f64,
    /// Drive angular frequency Ω. Default: 1.0.
    pub frequency: f64,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            frequency: 1.0,
        }
    }
}

/// Hebbian plasticity dW_ij/dt = α·cos(θ_j − θ_i) − β·W_ij, clipped to [0, W_max].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlasticityParams {
    /// Hebbian growth rate α. Default: 0.1.
    pub alpha: f64,
    /// Weight decay rate β. Default: 0.05.
    pub beta: f64,
    /// Initial off-diagonal weight. Default: 1.0.
    pub w_init: f64,
    /// Weight cap W_max. Default: 2.0.
    pub w_max: f64,
}

impl Default for PlasticityParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.05,
            w_init: 1.0,
            w_max: 2.0,
        }
    }
}

/// One sweep axis: `num` evenly spaced values from `min` to `max` inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub min: f64,
    pub max: f64,
    pub num: usize,
}

impl GridAxis {
    pub fn new(min: f64, max: f64, num: usize) -> Self {
        Self { min, max, num }
    }

    /// Axis from explicit points: `[a, b]` with `num = 2`, etc.
    /// Only evenly spaced inputs round-trip exactly.
    pub fn span(min: f64, max: f64) -> Self {
        Self::new(min, max, 2)
    }

    /// Materialise the axis values. A single-point axis yields `[min]`.
    pub fn values(&self) -> Vec<f64> {
        match self.num {
            0 => Vec::new(),
            1 => vec![self.min],
            num => {
                let step = (self.max - self.min) / (num - 1) as f64;
                let mut v: Vec<f64> = (0..num).map(|i| self.min + step * i as f64).collect();
                v[num - 1] = self.max;
                v
            }
        }
    }

    /// Three-point axis: min, midpoint, max.
    pub fn quick(&self) -> Self {
        Self::new(self.min, self.max, 3)
    }

    fn validate(&self, name: &str) -> SweepResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SweepError::Config(format!(
                "{name} bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(SweepError::Config(format!(
                "{name}.min must be <= {name}.max, got {} > {}",
                self.min, self.max
            )));
        }
        if self.num < 1 {
            return Err(SweepError::Config(format!(
                "{name}.num must be >= 1, got {}",
                self.num
            )));
        }
        Ok(())
    }
}

/// Point-level ringing rule: all three must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingingThresholds {
    /// Minimum spectral prominence of r(t) in dB. Default: 6.0.
    pub psd_db: f64,
    /// Minimum number of upward crossings of standardised R(t). Default: 2.
    pub n_over: u32,
    /// Minimum mean synchrony. Default: 0.35.
    pub r_mean: f64,
}

impl Default for RingingThresholds {
    fn default() -> Self {
        Self {
            psd_db: 6.0,
            n_over: 2,
            r_mean: 0.35,
        }
    }
}

impl RingingThresholds {
    /// Apply the conjunctive rule to raw metric values.
    ///
    /// `n_over` is taken as `f64` so cell means (fractional) can be
    /// re-checked with the same rule.
    pub fn is_ringing(&self, delta_psd_db: f64, n_over: f64, r_mean: f64) -> bool {
        delta_psd_db >= self.psd_db && n_over >= f64::from(self.n_over) && r_mean >= self.r_mean
    }
}

/// Grid-level falsification bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullThresholds {
    /// Minimum fraction of ringing cells. Default: 0.02.
    pub area_frac_min: f64,
    /// Minimum size of the largest 4-connected ringing component. Default: 20.
    pub cc_min: usize,
    /// Maximum fraction of the K range one row's ringing cells may span. Default: 0.60.
    pub span_frac_max: f64,
    /// Negative control fails the claim at this fraction of the real count. Default: 0.80.
    pub negative_control_ratio: f64,
}

impl Default for NullThresholds {
    fn default() -> Self {
        Self {
            area_frac_min: 0.02,
            cc_min: 20,
            span_frac_max: 0.60,
            negative_control_ratio: 0.80,
        }
    }
}

/// Welch segmentation and crossing level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralParams {
    /// Samples per Welch segment. Default: 256.
    pub nperseg: usize,
    /// Overlap between consecutive segments. Default: 128.
    pub noverlap: usize,
    /// Level crossed upward by the standardised dispersion series. Default: 1.0.
    pub crossing_level: f64,
}

impl Default for SpectralParams {
    fn default() -> Self {
        Self {
            nperseg: 256,
            noverlap: 128,
            crossing_level: 1.0,
        }
    }
}

/// How replicates that failed to produce metrics affect a cell's label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InvalidPolicy {
    /// Vote over the valid replicates only; an all-invalid cell is not ringing.
    VoteValid,
    /// As `VoteValid`, but a cell whose invalid fraction exceeds the bound
    /// is excluded from the ringing region outright.
    ExcludeAbove { max_invalid_fraction: f64 },
}

impl Default for InvalidPolicy {
    fn default() -> Self {
        Self::VoteValid
    }
}

/// A parameter overridden when deriving a reduced configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDeviation {
    pub field: String,
    pub from: String,
    pub to: String,
}

impl ConfigDeviation {
    fn new(field: &str, from: impl ToString, to: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Immutable parameters of one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub network: NetworkParams,
    pub dynamics: DynamicsParams,
    pub drive: DriveParams,
    pub plasticity: PlasticityParams,
    /// Coupling strength axis (columns). Default: 0..10, 81 points.
    pub k_axis: GridAxis,
    /// Noise level axis (rows). Default: 0..1.5, 61 points.
    pub gamma_axis: GridAxis,
    /// Replicates per grid cell. Default: 3.
    pub replicates: usize,
    /// Base seed combined with the per-point hash. Default: 1337.
    pub base_seed: u64,
    pub thresholds: RingingThresholds,
    pub nulls: NullThresholds,
    pub spectral: SpectralParams,
    pub invalid_policy: InvalidPolicy,
    /// Replicates per cell for the plasticity-off rerun. Default: 1.
    pub negative_control_replicates: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            network: NetworkParams::default(),
            dynamics: DynamicsParams::default(),
            drive: DriveParams::default(),
            plasticity: PlasticityParams::default(),
            k_axis: GridAxis::new(0.0, 10.0, 81),
            gamma_axis: GridAxis::new(0.0, 1.5, 61),
            replicates: 3,
            base_seed: 1337,
            thresholds: RingingThresholds::default(),
            nulls: NullThresholds::default(),
            spectral: SpectralParams::default(),
            invalid_policy: InvalidPolicy::default(),
            negative_control_replicates: 1,
        }
    }
}

impl SweepConfig {
    /// Validate configuration parameters. Every error here is fatal at
    /// sweep start; nothing is recoverable per point.
    pub fn validate(&self) -> SweepResult<()> {
        if self.network.n < 2 {
            return Err(SweepError::Config(format!(
                "network.n must be >= 2, got {}",
                self.network.n
            )));
        }
        if !self.network.omega_mean.is_finite() {
            return Err(SweepError::Config(
                "network.omega_mean must be finite".to_string(),
            ));
        }
        if !(self.network.omega_std >= 0.0 && self.network.omega_std.is_finite()) {
            return Err(SweepError::Config(format!(
                "network.omega_std must be finite and >= 0, got {}",
                self.network.omega_std
            )));
        }
        if !(self.dynamics.dt > 0.0 && self.dynamics.dt.is_finite()) {
            return Err(SweepError::Config(format!(
                "dynamics.dt must be finite and > 0, got {}",
                self.dynamics.dt
            )));
        }
        if self.dynamics.steps_total == 0 {
            return Err(SweepError::Config(
                "dynamics.steps_total must be > 0".to_string(),
            ));
        }
        if !self.drive.amplitude.is_finite() || !self.drive.frequency.is_finite() {
            return Err(SweepError::Config(
                "drive amplitude and frequency must be finite".to_string(),
            ));
        }
        let p = &self.plasticity;
        if !p.alpha.is_finite() {
            return Err(SweepError::Config("plasticity.alpha must be finite".to_string()));
        }
        if !(p.beta >= 0.0 && p.beta.is_finite()) {
            return Err(SweepError::Config(format!(
                "plasticity.beta must be finite and >= 0, got {}",
                p.beta
            )));
        }
        if !(p.w_max > 0.0 && p.w_max.is_finite()) {
            return Err(SweepError::Config(format!(
                "plasticity.w_max must be finite and > 0, got {}",
                p.w_max
            )));
        }
        if !(0.0..=p.w_max).contains(&p.w_init) {
            return Err(SweepError::Config(format!(
                "plasticity.w_init must be in [0, {}], got {}",
                p.w_max, p.w_init
            )));
        }
        self.k_axis.validate("k_axis")?;
        self.gamma_axis.validate("gamma_axis")?;
        if self.gamma_axis.min < 0.0 {
            return Err(SweepError::Config(format!(
                "gamma_axis.min must be >= 0, got {}",
                self.gamma_axis.min
            )));
        }
        if self.replicates < 1 {
            return Err(SweepError::Config("replicates must be >= 1".to_string()));
        }
        if self.negative_control_replicates < 1 {
            return Err(SweepError::Config(
                "negative_control_replicates must be >= 1".to_string(),
            ));
        }
        if !self.thresholds.psd_db.is_finite() {
            return Err(SweepError::Config("thresholds.psd_db must be finite".to_string()));
        }
        if !(0.0..=1.0).contains(&self.thresholds.r_mean) {
            return Err(SweepError::Config(format!(
                "thresholds.r_mean must be in [0, 1], got {}",
                self.thresholds.r_mean
            )));
        }
        if !(0.0..=1.0).contains(&self.nulls.area_frac_min) {
            return Err(SweepError::Config(format!(
                "nulls.area_frac_min must be in [0, 1], got {}",
                self.nulls.area_frac_min
            )));
        }
        if !(self.nulls.span_frac_max > 0.0 && self.nulls.span_frac_max <= 1.0) {
            return Err(SweepError::Config(format!(
                "nulls.span_frac_max must be in (0, 1], got {}",
                self.nulls.span_frac_max
            )));
        }
        if !(self.nulls.negative_control_ratio > 0.0 && self.nulls.negative_control_ratio.is_finite())
        {
            return Err(SweepError::Config(format!(
                "nulls.negative_control_ratio must be finite and > 0, got {}",
                self.nulls.negative_control_ratio
            )));
        }
        if self.spectral.nperseg < 2 {
            return Err(SweepError::Config(format!(
                "spectral.nperseg must be >= 2, got {}",
                self.spectral.nperseg
            )));
        }
        if self.spectral.noverlap >= self.spectral.nperseg {
            return Err(SweepError::Config(format!(
                "spectral.noverlap must be < nperseg, got {} >= {}",
                self.spectral.noverlap, self.spectral.nperseg
            )));
        }
        if !self.spectral.crossing_level.is_finite() {
            return Err(SweepError::Config(
                "spectral.crossing_level must be finite".to_string(),
            ));
        }
        if let InvalidPolicy::ExcludeAbove {
            max_invalid_fraction,
        } = self.invalid_policy
        {
            if !(0.0..=1.0).contains(&max_invalid_fraction) {
                return Err(SweepError::Config(format!(
                    "invalid_policy.max_invalid_fraction must be in [0, 1], got {max_invalid_fraction}"
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SweepResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SweepError::Config(format!("JSON parse error: {e}")))
    }

    /// Coupling strengths, one per grid column.
    pub fn k_values(&self) -> Vec<f64> {
        self.k_axis.values()
    }

    /// Noise levels, one per grid row.
    pub fn gamma_values(&self) -> Vec<f64> {
        self.gamma_axis.values()
    }

    /// Reduced smoke-test configuration: 3×3 grid over the same bounds,
    /// 1000 steps with 200 burn-in, one replicate.
    ///
    /// Returns the derived config and the deviations it records.
    pub fn quick(&self) -> (Self, Vec<ConfigDeviation>) {
        const STEPS_TOTAL: usize = 1000;
        const STEPS_BURNIN: usize = 200;

        let mut q = self.clone();
        q.dynamics.steps_total = STEPS_TOTAL;
        q.dynamics.steps_burnin = STEPS_BURNIN;
        q.dynamics.steps_measure = STEPS_TOTAL - STEPS_BURNIN;
        q.replicates = 1;
        q.k_axis = self.k_axis.quick();
        q.gamma_axis = self.gamma_axis.quick();

        let deviations = vec![
            ConfigDeviation::new("mode", "full", "quick"),
            ConfigDeviation::new("steps_total", self.dynamics.steps_total, STEPS_TOTAL),
            ConfigDeviation::new("steps_burnin", self.dynamics.steps_burnin, STEPS_BURNIN),
            ConfigDeviation::new(
                "steps_measure",
                self.dynamics.steps_measure,
                q.dynamics.steps_measure,
            ),
            ConfigDeviation::new("replicates", self.replicates, 1),
            ConfigDeviation::new(
                "grid",
                format!("{}x{}", self.k_axis.num, self.gamma_axis.num),
                format!("{}x{}", q.k_axis.num, q.gamma_axis.num),
            ),
        ];
        log::debug!("derived quick config with {} deviations", deviations.len());
        (q, deviations)
    }
}
