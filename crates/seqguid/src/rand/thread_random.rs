use rand::{Rng, rng};

use crate::rand::RandSource;

/// A [`RandSource`] backed by the thread-local RNG.
///
/// The RNG itself is not stored; each call reaches for the calling thread's
/// generator, so this zero-sized type is `Send + Sync` and contention-free.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u128> for ThreadRandom {
    fn rand(&self) -> u128 {
        rng().random()
    }
}
