//! WASM-compatible random number generator.
//!
//! Wraps the `rand` crate's `SmallRng`, which is fast and works under
//! WASM. Entropy comes from `getrandom` (browser crypto API) unless a
//! fixed seed is supplied for deterministic replay.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A seedable RNG for board generation and shuffling.
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn index(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Unbiased Fisher-Yates shuffle.
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}
