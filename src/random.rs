//! Utilities related to random numbers.

use rand::{
    distributions::{Distribution, Open01},
    rngs::StdRng,
    Rng, SeedableRng,
};

/// Seeded source of uniform random numbers.
///
/// This is the only source of randomness used during propagation, so a
/// simulation is fully reproducible from the seed.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    seed: u64,
    rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new generator from the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the seed the generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a number uniformly from `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws a number uniformly from the open interval `(0, 1)`.
    pub fn uniform_open(&mut self) -> f64 {
        Open01.sample(&mut self.rng)
    }
}
