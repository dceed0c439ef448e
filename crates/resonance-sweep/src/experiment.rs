// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Ringing Experiment Driver
// ─────────────────────────────────────────────────────────────────────
//! One complete experiment: main sweep, optional plasticity-off rerun,
//! and the null evaluation of the finished mask.

use serde::{Deserialize, Serialize};

use resonance_types::{
    ConfigDeviation, NullEvaluationReport, SeedRecord, SweepConfig, SweepResult,
};

use crate::cancel::CancelToken;
use crate::nulls::NullEvaluator;
use crate::sink::{DiscardSink, SweepSink};
use crate::sweep::{ExecutionMode, GridSweep, SweepGrid};

/// Full or reduced smoke-test run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Full,
    Quick,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Quick => "quick",
        }
    }
}

/// Run-level switches that are not part of the physics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentOptions {
    /// Default: Full.
    pub run_mode: RunMode,
    /// Default: Sequential.
    pub execution: ExecutionMode,
    /// Run the plasticity-off rerun. Default: true. Never runs in quick mode.
    pub negative_control: bool,
    /// Cap on simulated cells (row-major). Default: None.
    pub max_cells: Option<usize>,
}

impl Default for ExperimentOptions {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Full,
            execution: ExecutionMode::Sequential,
            negative_control: true,
            max_cells: None,
        }
    }
}

/// Everything an experiment produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentOutcome {
    pub run_mode: RunMode,
    /// Configuration actually simulated (reduced in quick mode).
    pub config: SweepConfig,
    /// Overrides applied to reach `config` from the loaded configuration.
    pub deviations: Vec<ConfigDeviation>,
    pub sweep: SweepGrid,
    pub negative_control: Option<SweepGrid>,
    pub report: NullEvaluationReport,
}

impl ExperimentOutcome {
    /// Seeds of the main sweep, in sweep order.
    pub fn seed_manifest(&self) -> Vec<SeedRecord> {
        self.sweep.seed_manifest()
    }
}

/// Configured experiment, ready to run.
pub struct Experiment {
    config: SweepConfig,
    deviations: Vec<ConfigDeviation>,
    options: ExperimentOptions,
    cancel: CancelToken,
}

impl Experiment {
    /// Validates the configuration. Quick mode derives the reduced
    /// configuration first and records its deviations.
    pub fn new(config: SweepConfig, options: ExperimentOptions) -> SweepResult<Self> {
        let (config, deviations) = match options.run_mode {
            RunMode::Full => (config, Vec::new()),
            RunMode::Quick => config.quick(),
        };
        config.validate()?;
        Ok(Self {
            config,
            deviations,
            options,
            cancel: CancelToken::new(),
        })
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn deviations(&self) -> &[ConfigDeviation] {
        &self.deviations
    }

    /// Whether the plasticity-off rerun will be performed.
    pub fn runs_negative_control(&self) -> bool {
        self.options.negative_control && self.options.run_mode == RunMode::Full
    }

    /// Run the sweep, the optional control, and the null evaluation.
    /// Main-sweep cells stream to `sink`; control cells are not streamed.
    pub fn run(&self, sink: &dyn SweepSink) -> SweepResult<ExperimentOutcome> {
        log::info!(
            "experiment start: mode={} negative_control={}",
            self.options.run_mode.as_str(),
            self.runs_negative_control()
        );
        let sweep = GridSweep::new(self.config.clone())?
            .with_mode(self.options.execution)
            .with_max_cells(self.options.max_cells)
            .with_cancel_token(self.cancel.clone());

        let grid = sweep.run(sink)?;
        let control = if self.runs_negative_control() {
            Some(sweep.run_negative_control(&DiscardSink)?)
        } else {
            None
        };

        let report = NullEvaluator::from_config(&self.config).evaluate(
            &grid.mask,
            &grid.cells,
            &grid.k_values,
            control.as_ref().map(|c| &c.mask),
        )?;

        Ok(ExperimentOutcome {
            run_mode: self.options.run_mode,
            config: self.config.clone(),
            deviations: self.deviations.clone(),
            sweep: grid,
            negative_control: control,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_types::{CheckStatus, GridAxis, SweepError};

    fn tiny_config() -> SweepConfig {
        let mut cfg = SweepConfig::default();
        cfg.network.n = 6;
        cfg.dynamics.steps_total = 200;
        cfg.dynamics.steps_burnin = 50;
        cfg.dynamics.steps_measure = 150;
        cfg.k_axis = GridAxis::new(0.0, 2.0, 2);
        cfg.gamma_axis = GridAxis::new(0.0, 0.2, 2);
        cfg.replicates = 1;
        cfg
    }

    #[test]
    fn test_quick_mode_reduces_and_skips_control() {
        let exp = Experiment::new(
            tiny_config(),
            ExperimentOptions {
                run_mode: RunMode::Quick,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!exp.runs_negative_control());
        assert_eq!(exp.config().k_values().len(), 3);
        assert!(!exp.deviations().is_empty());
    }

    #[test]
    fn test_full_run_with_control() {
        let exp = Experiment::new(tiny_config(), ExperimentOptions::default()).unwrap();
        let out = exp.run(&DiscardSink).unwrap();
        let control = out.negative_control.as_ref().unwrap();
        assert_eq!(control.cells.len(), 4);
        assert_ne!(out.report.negative_control.status, CheckStatus::Skip);
        assert_eq!(out.seed_manifest().len(), 4);
        assert!(out.deviations.is_empty());
        assert_eq!(out.report.summary.total_cells, 4);
    }

    #[test]
    fn test_control_disabled_is_skipped() {
        let exp = Experiment::new(
            tiny_config(),
            ExperimentOptions {
                negative_control: false,
                ..Default::default()
            },
        )
        .unwrap();
        let out = exp.run(&DiscardSink).unwrap();
        assert!(out.negative_control.is_none());
        assert_eq!(out.report.negative_control.status, CheckStatus::Skip);
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let mut cfg = tiny_config();
        cfg.dynamics.dt = -1.0;
        assert!(matches!(
            Experiment::new(cfg, ExperimentOptions::default()),
            Err(SweepError::Config(_))
        ));
    }

    #[test]
    fn test_cancelled_experiment() {
        let token = CancelToken::new();
        token.cancel();
        let exp = Experiment::new(tiny_config(), ExperimentOptions::default())
            .unwrap()
            .with_cancel_token(token);
        assert!(matches!(
            exp.run(&DiscardSink),
            Err(SweepError::Cancelled { .. })
        ));
    }
}
