//! Deterministic seeded RNG wrapper.
//!
//! Used by randomized property tests (octile-heuristic admissibility, §8)
//! that need many reproducible random start/goal pairs, and is available to
//! applications that want deterministic jitter elsewhere in the engine.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A small, fast, seedable RNG. Not cryptographically secure — not needed
/// here; only reproducibility matters.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range_i32(&mut self, range: std::ops::Range<i32>) -> i32 {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_range_u32(&mut self, range: std::ops::Range<u32>) -> u32 {
        self.0.gen_range(range)
    }
}
