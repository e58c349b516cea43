//! Level-generation randomness for the skip list.
//!
//! An injectable trait, not a bare `rand::Rng` bound, so tests can pin a seed
//! and exercise a specific level distribution (spec.md §4.1.1, §9).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness for skip-list level promotion.
///
/// `Send + Sync`, not just `Send`: sets live behind `Arc<RwLock<IndexedOrderedList>>`
/// (spec.md §5's "multiple host threads calling in simultaneously"), so a
/// `Box<dyn LevelRng>` must be shareable across threads, not merely movable
/// to one.
pub trait LevelRng: Send + Sync {
    /// A boolean draw that is `true` with the given probability.
    fn gen_bool(&mut self, probability: f64) -> bool;
}

/// Default source: a process-wide, non-reproducible generator. Backed by
/// `StdRng` rather than `rand::rngs::ThreadRng` because `ThreadRng` holds an
/// `Rc` and is neither `Send` nor `Sync`, which would make it impossible to
/// share an `IndexedOrderedList` across threads via `Keyspace`.
pub struct ThreadLevelRng(StdRng);

impl ThreadLevelRng {
    pub fn new() -> Self {
        ThreadLevelRng(StdRng::from_entropy())
    }
}

impl Default for ThreadLevelRng {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelRng for ThreadLevelRng {
    fn gen_bool(&mut self, probability: f64) -> bool {
        self.0.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Deterministic source seeded from a single `u64`, for reproducible tests.
pub struct SeededLevelRng(ChaCha8Rng);

impl SeededLevelRng {
    pub fn new(seed: u64) -> Self {
        SeededLevelRng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl LevelRng for SeededLevelRng {
    fn gen_bool(&mut self, probability: f64) -> bool {
        self.0.gen_bool(probability.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = SeededLevelRng::new(42);
        let mut b = SeededLevelRng::new(42);
        let draws_a: Vec<bool> = (0..50).map(|_| a.gen_bool(0.25)).collect();
        let draws_b: Vec<bool> = (0..50).map(|_| b.gen_bool(0.25)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededLevelRng::new(1);
        let mut b = SeededLevelRng::new(2);
        let draws_a: Vec<bool> = (0..200).map(|_| a.gen_bool(0.5)).collect();
        let draws_b: Vec<bool> = (0..200).map(|_| b.gen_bool(0.5)).collect();
        assert_ne!(draws_a, draws_b);
    }
}
