// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Grid Sweep Orchestrator
// ─────────────────────────────────────────────────────────────────────
//! Walks the (γ, K) grid row-major (γ outer, K inner). Each cell runs
//! its replicates through seed derivation → simulation → classification
//! and is aggregated into one [`GridCell`].
//!
//! Every run owns a generator seeded from (base_seed, K, γ, rep), so the
//! parallel mode produces exactly the sequential output.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use resonance_physics::{OscillatorSimulator, SeedDeriver};
use resonance_spectral::RingingClassifier;
use resonance_types::{
    GridCell, GridMask, PointResult, SeedRecord, SweepConfig, SweepError, SweepResult,
};

use crate::aggregate::{aggregate_cell, CellIndex};
use crate::cancel::CancelToken;
use crate::sink::SweepSink;

/// How grid cells are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One cell at a time, in grid order.
    #[default]
    Sequential,
    /// Cells spread over the rayon pool; results collected in grid order.
    Parallel,
}

/// Replicate count and plasticity switch for one pass over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pass {
    plasticity_enabled: bool,
    replicates: usize,
}

/// Per-thread simulator and classifier with their scratch buffers.
struct Worker {
    simulator: OscillatorSimulator,
    classifier: RingingClassifier,
}

struct CellOutput {
    cell: GridCell,
    points: Vec<PointResult>,
}

/// Result of one pass over the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    /// Column axis.
    pub k_values: Vec<f64>,
    /// Row axis.
    pub gamma_values: Vec<f64>,
    /// Simulated cells, row-major.
    pub cells: Vec<GridCell>,
    /// Every replicate, in sweep order.
    pub points: Vec<PointResult>,
    /// Cell labels; cells beyond a `max_cells` cap stay false.
    pub mask: GridMask,
}

impl SweepGrid {
    /// (K, γ, rep, seed) of every replicate run, in sweep order.
    pub fn seed_manifest(&self) -> Vec<SeedRecord> {
        self.points.iter().map(PointResult::seed_record).collect()
    }

    pub fn total_cells(&self) -> usize {
        self.mask.len()
    }

    pub fn invalid_replicates(&self) -> usize {
        self.points.iter().filter(|p| !p.is_valid()).count()
    }
}

/// Drives a validated configuration over its grid.
pub struct GridSweep {
    config: SweepConfig,
    k_values: Vec<f64>,
    gamma_values: Vec<f64>,
    seeds: SeedDeriver,
    mode: ExecutionMode,
    max_cells: Option<usize>,
    cancel: CancelToken,
}

impl GridSweep {
    /// Validates `config`; a configuration error is fatal here and
    /// nothing is simulated.
    pub fn new(config: SweepConfig) -> SweepResult<Self> {
        config.validate()?;
        Ok(Self {
            k_values: config.k_values(),
            gamma_values: config.gamma_values(),
            seeds: SeedDeriver::new(config.base_seed),
            mode: ExecutionMode::default(),
            max_cells: None,
            cancel: CancelToken::new(),
            config,
        })
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Simulate at most `max_cells` cells in row-major order. `None` or
    /// zero means the full grid.
    pub fn with_max_cells(mut self, max_cells: Option<usize>) -> Self {
        self.max_cells = max_cells.filter(|&m| m > 0);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn k_values(&self) -> &[f64] {
        &self.k_values
    }

    pub fn gamma_values(&self) -> &[f64] {
        &self.gamma_values
    }

    /// Number of cells a pass will simulate.
    pub fn planned_cells(&self) -> usize {
        let total = self.k_values.len() * self.gamma_values.len();
        self.max_cells.map_or(total, |cap| cap.min(total))
    }

    /// Main pass: plasticity on, `replicates` per cell.
    pub fn run(&self, sink: &dyn SweepSink) -> SweepResult<SweepGrid> {
        self.run_pass(
            Pass {
                plasticity_enabled: true,
                replicates: self.config.replicates,
            },
            sink,
        )
    }

    /// Plasticity-off rerun with the same seeds and
    /// `negative_control_replicates` per cell.
    pub fn run_negative_control(&self, sink: &dyn SweepSink) -> SweepResult<SweepGrid> {
        self.run_pass(
            Pass {
                plasticity_enabled: false,
                replicates: self.config.negative_control_replicates,
            },
            sink,
        )
    }

    fn worker(&self) -> Worker {
        Worker {
            simulator: OscillatorSimulator::from_config(&self.config),
            classifier: RingingClassifier::from_config(&self.config),
        }
    }

    fn run_pass(&self, pass: Pass, sink: &dyn SweepSink) -> SweepResult<SweepGrid> {
        let rows = self.gamma_values.len();
        let cols = self.k_values.len();
        let planned = self.planned_cells();
        log::info!(
            "sweep start: {rows}x{cols} grid, {planned} cells, {} replicates, plasticity={}, mode={:?}",
            pass.replicates,
            pass.plasticity_enabled,
            self.mode
        );

        let outputs: Vec<CellOutput> = match self.mode {
            ExecutionMode::Sequential => {
                let mut worker = self.worker();
                let mut out = Vec::with_capacity(planned);
                for idx in 0..planned {
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    out.push(self.run_cell(&mut worker, idx, pass, sink));
                }
                out
            }
            ExecutionMode::Parallel => (0..planned)
                .into_par_iter()
                .map_init(
                    || self.worker(),
                    |worker, idx| {
                        if self.cancel.is_cancelled() {
                            None
                        } else {
                            Some(self.run_cell(worker, idx, pass, sink))
                        }
                    },
                )
                .collect::<Vec<Option<CellOutput>>>()
                .into_iter()
                .flatten()
                .collect(),
        };

        let completed = outputs.len();
        sink.on_finish(completed);
        if completed < planned {
            log::warn!("sweep cancelled after {completed}/{planned} cells");
            return Err(SweepError::Cancelled {
                completed_cells: completed,
            });
        }

        let mut mask = GridMask::new(rows, cols);
        let mut cells = Vec::with_capacity(completed);
        let mut points = Vec::with_capacity(completed * pass.replicates);
        for out in outputs {
            mask.set(out.cell.gamma_index, out.cell.k_index, out.cell.ring_label);
            cells.push(out.cell);
            points.extend(out.points);
        }
        log::info!(
            "sweep done: {}/{} cells ringing",
            mask.count(),
            mask.len()
        );

        Ok(SweepGrid {
            k_values: self.k_values.clone(),
            gamma_values: self.gamma_values.clone(),
            cells,
            points,
            mask,
        })
    }

    fn run_cell(&self, worker: &mut Worker, idx: usize, pass: Pass, sink: &dyn SweepSink) -> CellOutput {
        let cols = self.k_values.len();
        let at = CellIndex {
            gamma_index: idx / cols,
            k_index: idx % cols,
            k: self.k_values[idx % cols],
            gamma: self.gamma_values[idx / cols],
        };

        let points: Vec<PointResult> = (0..pass.replicates)
            .map(|rep| self.run_replicate(worker, at.k, at.gamma, rep, pass.plasticity_enabled))
            .collect();
        let cell = aggregate_cell(at, &points, self.config.invalid_policy);
        sink.on_cell(&cell, &points);

        if at.k_index + 1 == cols {
            log::info!("row γ={:.4} complete", at.gamma);
        }
        CellOutput { cell, points }
    }

    fn run_replicate(
        &self,
        worker: &mut Worker,
        k: f64,
        gamma: f64,
        rep: usize,
        plasticity_enabled: bool,
    ) -> PointResult {
        let seed = self.seeds.derive(k, gamma, rep);
        let classified = worker
            .simulator
            .run(k, gamma, seed, plasticity_enabled)
            .and_then(|series| {
                worker
                    .classifier
                    .classify(&series.synchrony, &series.dispersion)
            });
        match classified {
            Ok(c) => {
                log::debug!(
                    "K={k:.4} γ={gamma:.4} rep={rep} seed={seed}: r={:.4} psd={:.2}dB n_over={} ring={}",
                    c.metrics.r_mean,
                    c.metrics.delta_psd_db,
                    c.metrics.n_over,
                    c.ring_label
                );
                PointResult::valid(k, gamma, rep, seed, c.metrics, c.ring_label)
            }
            Err(reason) => {
                log::warn!("K={k:.4} γ={gamma:.4} rep={rep} seed={seed}: invalid ({reason})");
                PointResult::invalid(k, gamma, rep, seed, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_types::{GridAxis, InvalidReason};

    use crate::sink::{DiscardSink, GridRecorder};

    fn small_config() -> SweepConfig {
        let mut cfg = SweepConfig::default();
        cfg.network.n = 8;
        cfg.dynamics.steps_total = 300;
        cfg.dynamics.steps_burnin = 100;
        cfg.dynamics.steps_measure = 200;
        cfg.k_axis = GridAxis::new(0.0, 4.0, 3);
        cfg.gamma_axis = GridAxis::new(0.0, 0.4, 2);
        cfg.replicates = 2;
        cfg
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut cfg = small_config();
        cfg.replicates = 0;
        assert!(matches!(GridSweep::new(cfg), Err(SweepError::Config(_))));
    }

    #[test]
    fn test_row_major_order() {
        let sweep = GridSweep::new(small_config()).unwrap();
        let grid = sweep.run(&DiscardSink).unwrap();
        let order: Vec<(usize, usize)> = grid.cells.iter().map(|c| (c.gamma_index, c.k_index)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(grid.points.len(), 12);
        assert_eq!(grid.cells[4].k, 2.0);
        assert_eq!(grid.cells[4].gamma, 0.4);
    }

    #[test]
    fn test_seed_manifest_matches_deriver() {
        let sweep = GridSweep::new(small_config()).unwrap();
        let grid = sweep.run(&DiscardSink).unwrap();
        let manifest = grid.seed_manifest();
        assert_eq!(manifest.len(), 12);
        let d = SeedDeriver::new(1337);
        for rec in manifest {
            assert_eq!(rec.seed, d.derive(rec.k, rec.gamma, rec.rep));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let seq = GridSweep::new(small_config()).unwrap().run(&DiscardSink).unwrap();
        let par = GridSweep::new(small_config())
            .unwrap()
            .with_mode(ExecutionMode::Parallel)
            .run(&DiscardSink)
            .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_repeat_run_is_deterministic() {
        let sweep = GridSweep::new(small_config()).unwrap();
        let a = sweep.run(&DiscardSink).unwrap();
        let b = sweep.run(&DiscardSink).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_cells_cap() {
        let sweep = GridSweep::new(small_config()).unwrap().with_max_cells(Some(4));
        let grid = sweep.run(&DiscardSink).unwrap();
        assert_eq!(grid.cells.len(), 4);
        assert_eq!(grid.total_cells(), 6);
        assert!(!grid.mask.get(1, 1) && !grid.mask.get(1, 2));
        assert_eq!(GridSweep::new(small_config()).unwrap().with_max_cells(Some(0)).planned_cells(), 6);
    }

    #[test]
    fn test_sink_receives_every_cell() {
        let rec = GridRecorder::new();
        let grid = GridSweep::new(small_config())
            .unwrap()
            .with_mode(ExecutionMode::Parallel)
            .run(&rec)
            .unwrap();
        assert_eq!(rec.cells(), grid.cells);
        assert_eq!(rec.points().len(), 12);
        assert_eq!(rec.finished(), Some(6));
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let rec = GridRecorder::new();
        let err = GridSweep::new(small_config())
            .unwrap()
            .with_cancel_token(token)
            .run(&rec)
            .unwrap_err();
        assert!(matches!(err, SweepError::Cancelled { completed_cells: 0 }));
        assert!(rec.is_empty());
    }

    struct CancelAfter {
        token: CancelToken,
        after: usize,
        seen: parking_lot::Mutex<usize>,
    }

    impl SweepSink for CancelAfter {
        fn on_cell(&self, _cell: &GridCell, _points: &[PointResult]) {
            let mut seen = self.seen.lock();
            *seen += 1;
            if *seen == self.after {
                self.token.cancel();
            }
        }
    }

    #[test]
    fn test_cancel_mid_sweep_keeps_completed_cells() {
        let token = CancelToken::new();
        let sink = CancelAfter {
            token: token.clone(),
            after: 2,
            seen: parking_lot::Mutex::new(0),
        };
        let err = GridSweep::new(small_config())
            .unwrap()
            .with_cancel_token(token)
            .run(&sink)
            .unwrap_err();
        assert!(matches!(err, SweepError::Cancelled { completed_cells: 2 }));
        assert_eq!(*sink.seen.lock(), 2);
    }

    #[test]
    fn test_empty_window_marks_every_replicate_invalid() {
        let mut cfg = small_config();
        cfg.dynamics.steps_burnin = cfg.dynamics.steps_total;
        let grid = GridSweep::new(cfg).unwrap().run(&DiscardSink).unwrap();
        assert_eq!(grid.invalid_replicates(), grid.points.len());
        assert!(grid
            .points
            .iter()
            .all(|p| p.invalid_reason() == Some(&InvalidReason::EmptyMeasureWindow)));
        assert!(grid.cells.iter().all(|c| !c.ring_label && c.invalid_fraction == 1.0));
        assert_eq!(grid.mask.count(), 0);
    }

    #[test]
    fn test_negative_control_uses_control_replicates() {
        let mut cfg = small_config();
        cfg.negative_control_replicates = 1;
        let sweep = GridSweep::new(cfg).unwrap();
        let main = sweep.run(&DiscardSink).unwrap();
        let control = sweep.run_negative_control(&DiscardSink).unwrap();
        assert_eq!(control.points.len(), 6);
        // rep 0 seeds are shared with the main pass
        for (c, m) in control.points.iter().zip(main.points.iter().step_by(2)) {
            assert_eq!(c.seed, m.seed);
        }
        // plasticity off: weights static, so no crossings and no ringing
        assert_eq!(control.mask.count(), 0);
    }
}
