// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Resonance Physics Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Oscillator-network physics for the ringing sweep: deterministic
//! per-point seeds, a private noise generator per run, and the
//! Euler-Maruyama integrator for the driven, plastic Kuramoto network.

pub mod oscillator;
pub mod rng;
pub mod seed;

pub use oscillator::{OscillatorSimulator, OscillatorState, RawSeries};
pub use rng::NoiseRng;
pub use seed::{derive_seed, SeedDeriver, SEED_MODULUS};
