//! Deterministic random number generation.
//!
//! One config seed drives every random choice in a game. Each consumer
//! takes its own named stream (`deck:player`, `personality-ai`, ...), so
//! adding a draw in one place never shifts the sequence seen by another.
//!
//! ```
//! use avatar_ccg::core::GameRng;
//!
//! let mut a = GameRng::new(42).for_context("deck:player");
//! let mut b = GameRng::new(42).for_context("deck:player");
//!
//! let mut x = vec![1, 2, 3, 4, 5];
//! let mut y = x.clone();
//! a.shuffle(&mut x);
//! b.shuffle(&mut y);
//! assert_eq!(x, y);
//! ```

use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive the stream named `context` from this stream's seed.
    ///
    /// Independent of how much of `self` has been consumed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        // FxHasher is unkeyed, so derived seeds are stable across runs.
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform float in `[low, high)`; `low` if the range is empty.
    pub fn gen_f64(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
