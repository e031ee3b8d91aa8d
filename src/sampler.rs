use alloc::vec::Vec;

use rand::{Rng, SeedableRng, seq::index};
use rand_chacha::ChaCha8Rng;

// Golden ratio increment used to decorrelate per-study seeds
const GOLDEN_RATIO_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Source of index positions for drawing a study from a population.
///
/// Implementations draw `amount` positions from `0..population`, uniformly at
/// random, with or without replacement, and append them to `out` (which is
/// cleared first). Positions must be in range; without replacement they must
/// be distinct.
pub trait IndexSampler {
    /// Draws `amount` positions in `0..population` into `out`
    fn sample(&mut self, population: usize, amount: usize, replace: bool, out: &mut Vec<usize>);
}

/// [`IndexSampler`] backed by any random number generator
///
/// # Examples
///
/// ```
/// use fastpos::{IndexSampler, RngSampler};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut sampler = RngSampler::new(ChaCha8Rng::seed_from_u64(7));
/// let mut positions = Vec::new();
///
/// sampler.sample(10, 10, false, &mut positions);
/// positions.sort_unstable();
/// assert_eq!(positions, (0..10).collect::<Vec<_>>());
///
/// sampler.sample(3, 50, true, &mut positions);
/// assert_eq!(positions.len(), 50);
/// assert!(positions.iter().all(|&i| i < 3));
/// ```
#[derive(Debug, Clone)]
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    /// Wraps a random number generator
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSampler<ChaCha8Rng> {
    /// Sampler for study `index` of a batch seeded with `seed`
    ///
    /// The stream depends only on `(seed, index)`, so studies can be run in
    /// any order, or concurrently, and still reproduce the same draws.
    pub fn for_study(seed: u64, index: usize) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(mix_seed(seed, index)))
    }
}

impl<R: Rng> IndexSampler for RngSampler<R> {
    fn sample(&mut self, population: usize, amount: usize, replace: bool, out: &mut Vec<usize>) {
        out.clear();
        if replace {
            if population > 0 {
                out.extend((0..amount).map(|_| self.rng.gen_range(0..population)));
            }
        } else {
            out.extend(index::sample(&mut self.rng, population, amount.min(population)));
        }
    }
}

/// Mixes a base seed with a study index into a decorrelated seed
///
/// # Arguments
///
/// * `base_seed` - The batch seed
/// * `index` - The study index
///
/// # Returns
///
/// * `u64` - The seed of the study's generator
pub fn mix_seed(base_seed: u64, index: usize) -> u64 {
    base_seed
        .wrapping_mul(GOLDEN_RATIO_SEED_MIX)
        .wrapping_add(index as u64)
        .rotate_left(17)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_replacement_draws_distinct_positions() {
        let mut sampler = RngSampler::new(ChaCha8Rng::seed_from_u64(1));
        let mut out = vec![99, 98];

        sampler.sample(1000, 100, false, &mut out);
        assert_eq!(out.len(), 100);
        assert!(out.iter().all(|&i| i < 1000));

        out.sort_unstable();
        out.dedup();
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn with_replacement_may_exceed_population() {
        let mut sampler = RngSampler::new(ChaCha8Rng::seed_from_u64(2));
        let mut out = Vec::new();

        sampler.sample(5, 200, true, &mut out);
        assert_eq!(out.len(), 200);
        assert!(out.iter().all(|&i| i < 5));
    }

    #[test]
    fn study_streams_are_reproducible() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        RngSampler::for_study(42, 3).sample(500, 50, false, &mut a);
        RngSampler::for_study(42, 3).sample(500, 50, false, &mut b);
        assert_eq!(a, b);

        RngSampler::for_study(42, 4).sample(500, 50, false, &mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn mix_seed_separates_indices() {
        assert_ne!(mix_seed(0, 0), mix_seed(0, 1));
        assert_ne!(mix_seed(1, 0), mix_seed(0, 1));
        assert_eq!(mix_seed(5, 9), mix_seed(5, 9));
    }
}
