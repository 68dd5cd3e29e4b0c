//! Engine-owned random stream.
//!
//! Every engine instance owns one [`RandomStream`] and passes it explicitly
//! into selectors and chromosome operators. No code path touches a global or
//! thread-local RNG, so independent engines never interfere and identical
//! seeds replay identical generation sequences.
//!
//! All draws go through the stream's own mutex. The generation loop is
//! single-threaded, but selectors, chromosome operators, and progress
//! callbacks are pluggable and may read the stream from additional contexts;
//! the lock keeps that safe without any coordination on their part.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// A seedable, lockable pseudo-random source.
#[derive(Debug)]
pub struct RandomStream {
    inner: Mutex<StdRng>,
}

impl RandomStream {
    /// Creates a stream with an explicit seed for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Creates a stream seeded from OS entropy for non-reproducible runs.
    pub fn from_entropy() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Draws a uniform index in `0..n`.
    ///
    /// # Panics
    /// Panics if `n` is zero.
    pub fn index(&self, n: usize) -> usize {
        self.with(|rng| rng.random_range(0..n))
    }

    /// Returns `true` with probability `p`.
    ///
    /// Compares a uniform `[0, 1)` sample against `p`, so `p = 0.0` never
    /// fires and `p = 1.0` always does.
    pub fn chance(&self, p: f64) -> bool {
        self.with(|rng| rng.random_range(0.0..1.0) < p)
    }

    /// Runs `f` with exclusive access to the underlying generator.
    ///
    /// Use this when several correlated draws must happen under one lock
    /// acquisition, e.g. picking both cut points of a crossover segment.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}
