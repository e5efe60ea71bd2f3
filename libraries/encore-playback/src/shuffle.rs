//! Shuffle algorithm for queue randomization
//!
//! Uniform Fisher-Yates permutation. Sorting with a random comparator is
//! biased and must not be used here.

use encore_core::types::Track;
use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly random permutation of `original`.
///
/// Each track has equal probability of appearing at any position.
pub fn shuffled<R: Rng + ?Sized>(original: &[Track], rng: &mut R) -> Vec<Track> {
    let mut tracks = original.to_vec();
    // SliceRandom::shuffle is an in-place Fisher-Yates walk
    tracks.shuffle(rng);
    tracks
}
