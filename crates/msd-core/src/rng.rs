//! Deterministic RNG wrapper and seed-derivation helpers.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle shared by the sampler and the optimizer.
///
/// A master `seed: u64` is supplied by the caller. Every independent design
/// run draws from its own substream, derived by hashing `(master_seed, run)`
/// with SipHash-1-3 under fixed zero keys, so a run can be replayed in
/// isolation without replaying the runs before it.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the handle for one substream of a master seed.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Draws a uniform index below `len`. Returns `None` for an empty range.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }

    /// Draws an index with probability proportional to its weight.
    ///
    /// Weights are exact solution counts, so the draw stays in integer space
    /// instead of normalising through `f64`. Returns `None` when every weight
    /// is zero.
    pub fn weighted_index(&mut self, weights: &[u128]) -> Option<usize> {
        let total = weights
            .iter()
            .fold(0u128, |acc, weight| acc.saturating_add(*weight));
        if total == 0 {
            return None;
        }
        let mut draw = self.rng.gen_range(0..total);
        for (idx, weight) in weights.iter().enumerate() {
            if draw < *weight {
                return Some(idx);
            }
            draw -= weight;
        }
        weights.iter().rposition(|weight| *weight > 0)
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
