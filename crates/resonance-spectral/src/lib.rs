// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Spectral Ringing Classifier
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Turns the two raw series of one run into ringing metrics:
//!
//!   - Welch PSD of r(t) → peak prominence over the median bin (dB)
//!   - robust z-score of R(t) → upward crossing count
//!   - mean r(t)
//!
//! and applies the conjunctive three-threshold rule.

pub mod classifier;
pub mod crossings;
pub mod welch;

pub use classifier::{Classification, RingingClassifier};
pub use crossings::{count_upward_crossings, median, robust_mad, robust_standardize};
pub use welch::{peak_prominence_db, Psd, WelchEstimator};
