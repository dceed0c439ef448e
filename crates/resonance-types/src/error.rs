// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Resonance Sweep Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for sweep-level failures.
///
/// Per-replicate failures never surface here; they are recorded as
/// [`crate::InvalidReason`] inside the replicate's [`crate::PointResult`].
#[derive(Error, Debug)]
pub enum SweepError {
    /// Malformed configuration, detected before any simulation runs.
    #[error("config error: {0}")]
    Config(String),

    /// Inputs to a grid-level operation do not fit together
    /// (mask shape vs. axis length, mismatched negative control).
    #[error("validation error: {0}")]
    Validation(String),

    /// Non-finite value in a grid-level computation.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// The sweep was cancelled between grid cells.
    #[error("sweep cancelled after {completed_cells} completed cells")]
    Cancelled { completed_cells: usize },
}

pub type SweepResult<T> = Result<T, SweepError>;
