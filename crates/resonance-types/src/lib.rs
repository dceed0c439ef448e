// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Resonance Sweep Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! oscillator-network ringing sweep.
//!
//! Nothing in this crate simulates anything: it holds the immutable
//! `SweepConfig`, the per-replicate and per-cell records produced by a
//! sweep, and the grid-level null evaluation report.

pub mod config;
pub mod error;
pub mod grid;
pub mod result;

pub use config::{
    ConfigDeviation, DriveParams, DynamicsParams, GridAxis, InvalidPolicy, NetworkParams,
    NullThresholds, PlasticityParams, RingingThresholds, SpectralParams, SweepConfig,
};
pub use error::{SweepError, SweepResult};
pub use grid::GridMask;
pub use result::{
    CheckStatus, GridCell, GridSummary, InvalidReason, NullCheck, NullDetails,
    NullEvaluationReport, PointMetrics, PointOutcome, PointResult, SeedRecord,
};
