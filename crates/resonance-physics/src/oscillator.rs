// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Driven Plastic Kuramoto Integrator
// ─────────────────────────────────────────────────────────────────────
//! Euler-Maruyama integrator for the forced, noisy, plastic network:
//!
//!   dθ_i = [ω_i + (K/N) Σ_j W_ij sin(θ_j − θ_i) + D sin(Ω t − θ_i)] dt + γ dW_i
//!   dW_ij/dt = α cos(θ_j − θ_i) − β W_ij,   W_ij ∈ [0, W_max],  W_ii = 0
//!
//! After burn-in each step records the order parameter r(t) and the
//! relative weight dispersion R(t) = std(W) / mean(W).

use serde::{Deserialize, Serialize};

use resonance_types::{
    DriveParams, DynamicsParams, InvalidReason, NetworkParams, PlasticityParams, SweepConfig,
};

use crate::rng::NoiseRng;

const TAU: f64 = std::f64::consts::TAU;

/// Guard against a zero-mean weight matrix in R(t).
const DISPERSION_EPS: f64 = 1e-12;

/// Measurement-window output of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    /// Kuramoto order parameter r(t) ∈ [0, 1].
    pub synchrony: Vec<f64>,
    /// Relative weight dispersion R(t).
    pub dispersion: Vec<f64>,
}

impl RawSeries {
    pub fn len(&self) -> usize {
        self.synchrony.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synchrony.is_empty() || self.dispersion.is_empty()
    }
}

/// Phases, natural frequencies and coupling weights of one run.
///
/// Created and dropped inside [`OscillatorSimulator::run`].
#[derive(Debug, Clone)]
pub struct OscillatorState {
    n: usize,
    /// Phases θ_i ∈ [0, 2π).
    pub theta: Vec<f64>,
    /// Natural frequencies ω_i, fixed for the run.
    pub omega: Vec<f64>,
    /// n×n row-major, non-negative, zero diagonal.
    pub weights: Vec<f64>,
}

impl OscillatorState {
    /// Draw the initial state: θ ~ U[0, 2π), then ω ~ N(mean, std),
    /// with every off-diagonal weight set to `w_init`.
    pub fn initialise(network: &NetworkParams, w_init: f64, rng: &mut NoiseRng) -> Self {
        let n = network.n;
        let theta: Vec<f64> = (0..n).map(|_| wrap_phase(rng.uniform(0.0, TAU))).collect();
        let omega: Vec<f64> = (0..n)
            .map(|_| rng.normal(network.omega_mean, network.omega_std))
            .collect();
        let mut weights = vec![w_init; n * n];
        for i in 0..n {
            weights[i * n + i] = 0.0;
        }
        Self {
            n,
            theta,
            omega,
            weights,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Kuramoto order parameter r = |⟨e^{iθ}⟩|.
    pub fn order_parameter(&self) -> f64 {
        order_parameter(&self.theta)
    }

    /// std(W) / mean(W) over all n² entries (diagonal included).
    pub fn weight_dispersion(&self) -> f64 {
        let count = self.weights.len() as f64;
        if count < 1.0 {
            return 0.0;
        }
        let mean = self.weights.iter().sum::<f64>() / count;
        let var = self
            .weights
            .iter()
            .map(|&w| (w - mean).powi(2))
            .sum::<f64>()
            / count;
        var.sqrt() / (mean + DISPERSION_EPS)
    }
}

/// Kuramoto order parameter R = |⟨e^{iθ}⟩| ∈ [0, 1].
pub fn order_parameter(theta: &[f64]) -> f64 {
    let n = theta.len() as f64;
    if n < 1.0 {
        return 0.0;
    }
    let (sum_sin, sum_cos) = theta
        .iter()
        .fold((0.0, 0.0), |(s, c), &th| (s + th.sin(), c + th.cos()));
    ((sum_sin / n).powi(2) + (sum_cos / n).powi(2))
        .sqrt()
        .clamp(0.0, 1.0)
}

/// Reduce a phase into [0, 2π).
#[inline]
pub fn wrap_phase(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid of a tiny negative value can round up to exactly 2π.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Integrates one (K, γ, seed) run.
///
/// Holds only configuration and scratch buffers; all run state lives in
/// a local [`OscillatorState`], and each run seeds its own [`NoiseRng`].
/// One simulator per worker thread.
pub struct OscillatorSimulator {
    network: NetworkParams,
    dynamics: DynamicsParams,
    drive: DriveParams,
    plasticity: PlasticityParams,
    // Pre-allocated scratch
    sin_theta: Vec<f64>,
    cos_theta: Vec<f64>,
    dtheta: Vec<f64>,
}

impl OscillatorSimulator {
    pub fn new(
        network: NetworkParams,
        dynamics: DynamicsParams,
        drive: DriveParams,
        plasticity: PlasticityParams,
    ) -> Self {
        let n = network.n;
        Self {
            network,
            dynamics,
            drive,
            plasticity,
            sin_theta: vec![0.0; n],
            cos_theta: vec![0.0; n],
            dtheta: vec![0.0; n],
        }
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config.network.clone(),
            config.dynamics.clone(),
            config.drive.clone(),
            config.plasticity.clone(),
        )
    }

    pub fn dynamics(&self) -> &DynamicsParams {
        &self.dynamics
    }

    /// Run one simulation and return the measurement-window series.
    ///
    /// Numerical blow-up and an empty window come back as an
    /// [`InvalidReason`]; nothing here panics on bad dynamics.
    pub fn run(
        &mut self,
        k: f64,
        gamma: f64,
        seed: u64,
        plasticity_enabled: bool,
    ) -> Result<RawSeries, InvalidReason> {
        self.integrate(k, gamma, seed, plasticity_enabled)
            .map(|(series, _)| series)
    }

    fn integrate(
        &mut self,
        k: f64,
        gamma: f64,
        seed: u64,
        plasticity_enabled: bool,
    ) -> Result<(RawSeries, OscillatorState), InvalidReason> {
        let window = self.dynamics.measured_samples();
        if window == 0 {
            return Err(InvalidReason::EmptyMeasureWindow);
        }

        let n = self.network.n;
        let dt = self.dynamics.dt;
        let coupling_scale = k / n as f64;
        let sigma = gamma * dt.sqrt();
        let DriveParams {
            amplitude: drive_amp,
            frequency: drive_freq,
        } = self.drive;
        let PlasticityParams {
            alpha,
            beta,
            w_init,
            w_max,
        } = self.plasticity;
        let hebbian = plasticity_enabled && alpha != 0.0;

        let mut rng = NoiseRng::new(seed);
        let mut state = OscillatorState::initialise(&self.network, w_init, &mut rng);

        let mut series = RawSeries {
            synchrony: Vec::with_capacity(window),
            dispersion: Vec::with_capacity(window),
        };
        // W is constant without plasticity, so R(t) is too.
        let static_dispersion = if hebbian {
            None
        } else {
            Some(state.weight_dispersion())
        };

        for step in 0..self.dynamics.steps_total {
            let t = step as f64 * dt;

            // sin(θ_j − θ_i) = sin θ_j cos θ_i − cos θ_j sin θ_i, so per-oscillator
            // sin/cos replace the n² pairwise trig evaluations.
            for (i, &th) in state.theta.iter().enumerate() {
                let (s, c) = th.sin_cos();
                self.sin_theta[i] = s;
                self.cos_theta[i] = c;
            }

            for i in 0..n {
                let row = &state.weights[i * n..(i + 1) * n];
                let (si, ci) = (self.sin_theta[i], self.cos_theta[i]);
                let mut coupling = 0.0;
                for j in 0..n {
                    coupling += row[j] * (self.sin_theta[j] * ci - self.cos_theta[j] * si);
                }
                let drive = drive_amp * (drive_freq * t - state.theta[i]).sin();
                self.dtheta[i] = state.omega[i] + coupling_scale * coupling + drive;
            }

            // Hebbian update uses the pre-step phase differences.
            if hebbian {
                for i in 0..n {
                    let (si, ci) = (self.sin_theta[i], self.cos_theta[i]);
                    for j in 0..n {
                        let idx = i * n + j;
                        if i == j {
                            state.weights[idx] = 0.0;
                            continue;
                        }
                        let cos_diff = self.cos_theta[j] * ci + self.sin_theta[j] * si;
                        let w = state.weights[idx];
                        let updated = w + dt * (alpha * cos_diff - beta * w);
                        if !updated.is_finite() {
                            return Err(InvalidReason::NonFiniteWeights { step });
                        }
                        state.weights[idx] = updated.clamp(0.0, w_max);
                    }
                }
            }

            for i in 0..n {
                let noise = if sigma > 0.0 {
                    sigma * rng.next_normal()
                } else {
                    0.0
                };
                let next = state.theta[i] + dt * self.dtheta[i] + noise;
                if !next.is_finite() {
                    return Err(InvalidReason::NonFinitePhase { step });
                }
                state.theta[i] = wrap_phase(next);
            }

            if step >= self.dynamics.steps_burnin {
                series.synchrony.push(state.order_parameter());
                series
                    .dispersion
                    .push(static_dispersion.unwrap_or_else(|| state.weight_dispersion()));
                if series.synchrony.len() >= window {
                    break;
                }
            }
        }

        if series.is_empty() {
            return Err(InvalidReason::EmptyMeasureWindow);
        }
        if let Some(bad) = series.dispersion.iter().find(|v| !v.is_finite()) {
            log::debug!("non-finite dispersion {bad} at K={k}, gamma={gamma}");
            return Err(InvalidReason::NonFiniteMetric {
                metric: "dispersion".to_string(),
            });
        }
        Ok((series, state))
    }
}
