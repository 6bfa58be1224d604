//! Seeded RNG wrapper for reproducible sampling.
//!
//! Analytics that sample the graph (centrality sources, detour-factor node
//! pairs) take a caller-supplied seed so two runs over the same input return
//! the same answer.  `SampleRng` is a thin wrapper over `SmallRng` that keeps
//! the seeding policy in one place.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Deterministic sampling RNG.
pub struct SampleRng(SmallRng);

impl SampleRng {
    pub fn new(seed: u64) -> Self {
        SampleRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice.  `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// Choose `n` distinct elements uniformly (fewer if the slice is short).
    /// Order of the returned elements is not specified.
    pub fn choose_multiple<'a, T>(&mut self, slice: &'a [T], n: usize) -> Vec<&'a T> {
        slice.choose_multiple(&mut self.0, n).collect()
    }

    /// Shuffle a mutable slice in place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }
}
