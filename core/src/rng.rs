//! Placeholder id generation.
//!
//! A new customer needs an id before the backend has assigned one. The
//! placeholder is a 9-digit number drawn from a PCG stream; tests seed the
//! stream so the ids they see are reproducible.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub const PLACEHOLDER_MIN: u64 = 100_000_000;
/// Exclusive upper bound.
pub const PLACEHOLDER_MAX: u64 = 999_999_999;

pub struct PlaceholderIds {
    inner: Pcg64Mcg,
}

impl PlaceholderIds {
    pub fn seeded(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { inner: Pcg64Mcg::from_entropy() }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None       => Self::from_entropy(),
        }
    }

    /// Draw an id in [PLACEHOLDER_MIN, PLACEHOLDER_MAX).
    pub fn next_id(&mut self) -> u64 {
        let span = PLACEHOLDER_MAX - PLACEHOLDER_MIN;
        PLACEHOLDER_MIN + self.inner.next_u64() % span
    }
}
