//! Deterministic simulation RNG.
//!
//! A run owns exactly one `SimRng`, seeded from `SimConfig::seed`.  Every
//! random decision (spawn offsets, wander jitter, distribution draws) goes
//! through it on the single simulation thread, so the same seed and inputs
//! always reproduce the same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform draw in `[0, 100]`, used against cumulative percentages.
    #[inline]
    pub fn percent(&mut self) -> f64 {
        self.0.gen_range(0.0..=100.0)
    }

    /// Uniform draw in `[-1, 1]`.
    #[inline]
    pub fn signed_unit(&mut self) -> f64 {
        self.0.gen_range(-1.0..=1.0)
    }
}
