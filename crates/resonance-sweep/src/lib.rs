// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Resonance Grid Sweep
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Sweeps the (K, γ) grid, votes replicate labels into cell labels, and
//! tests the finished ringing mask against four null hypotheses.
//!
//! # Invariants
//!
//! 1. **Seed determinism**: every replicate's generator is seeded from
//!    (base_seed, K, γ, rep) alone. Sequential and parallel execution,
//!    capped and uncapped grids, and cancelled and completed sweeps all
//!    produce identical results for the cells they simulate.
//!
//! 2. **Failure isolation**: a replicate that blows up or has an empty
//!    measurement window is recorded as invalid and never aborts the
//!    sweep. Only configuration errors (at start) and cancellation (between
//!    cells) end a sweep early.
//!
//! 3. **No silent positives**: a cell rings only on a strict majority of
//!    valid replicates. Ties and all-invalid cells are "not ringing".

pub mod aggregate;
pub mod cancel;
pub mod experiment;
pub mod mask;
pub mod nulls;
pub mod sink;
pub mod sweep;

pub use aggregate::{aggregate_cell, majority_vote, CellIndex};
pub use cancel::CancelToken;
pub use experiment::{Experiment, ExperimentOptions, ExperimentOutcome, RunMode};
pub use mask::{component_sizes, largest_component};
pub use nulls::{grid_summary, NullEvaluator, NEGATIVE_CONTROL_SKIPPED};
pub use sink::{DiscardSink, GridRecorder, SweepSink};
pub use sweep::{ExecutionMode, GridSweep, SweepGrid};
