// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Deterministic Seed Derivation
// ─────────────────────────────────────────────────────────────────────
//! seed = (base_seed + H(K, γ, rep)) mod 1e9
//!
//! H is the first 64 bits (big-endian) of SHA-256 over the text
//! `"{K:.6},{γ:.6},{rep}"`. The encoding is fixed so the same point
//! produces the same seed on every platform and in every language
//! that formats floats to six decimals.

use sha2::{Digest, Sha256};

/// Seeds are bounded below 1e9.
pub const SEED_MODULUS: u64 = 1_000_000_000;

/// Derive the seed for one (K, γ, replicate) point.
pub fn derive_seed(base_seed: u64, k: f64, gamma: f64, rep: usize) -> u64 {
    let key = format!("{k:.6},{gamma:.6},{rep}");
    let digest = Sha256::digest(key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let h = u64::from_be_bytes(prefix);
    (base_seed % SEED_MODULUS + h % SEED_MODULUS) % SEED_MODULUS
}

/// Seed derivation bound to one sweep's base seed.
#[derive(Debug, Clone, Copy)]
pub struct SeedDeriver {
    base_seed: u64,
}

impl SeedDeriver {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn derive(&self, k: f64, gamma: f64, rep: usize) -> u64 {
        derive_seed(self.base_seed, k, gamma, rep)
    }
}
