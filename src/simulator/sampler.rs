/*! The simulator's execution-time sampler: a bounded-normal draw truncated
to `[lower_bound, wcet]`, seeded for bit-reproducible runs. */

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::time::Real;

/// Draws sampled execution times for released jobs.
///
/// Holds its own RNG so a run's reproducibility depends only on the seed
/// passed to [`ExecutionTimeSampler::new`], never on ambient entropy.
pub struct ExecutionTimeSampler {
    rng: StdRng,
}

impl ExecutionTimeSampler {
    pub fn new(seed: u64) -> Self {
        ExecutionTimeSampler { rng: StdRng::seed_from_u64(seed) }
    }

    /// Samples an execution time for a job with the given `wcet`, bounded
    /// below by `wcet * lower_bound_fraction`.
    ///
    /// `lower_bound_fraction = 1.0` (the default) makes this deterministic:
    /// the lower bound coincides with `wcet`, so the distribution collapses
    /// to a point mass and no draw is needed. Otherwise the draw is a
    /// normal distribution centered on the midpoint of `[lower_bound, wcet]`
    /// with `sigma = (wcet - lower_bound) / 6`, rejection-sampled until it
    /// falls inside the bound — the standard way to realize a truncated
    /// normal without a closed-form inverse CDF.
    pub fn sample(&mut self, wcet: Real, lower_bound_fraction: Real) -> Real {
        let lower_bound = wcet * lower_bound_fraction;
        if lower_bound >= wcet {
            return wcet;
        }

        let mean = (wcet + lower_bound) / 2.0;
        let sigma = (wcet - lower_bound) / 6.0;
        let normal = Normal::new(mean, sigma).expect("sigma > 0 since lower_bound < wcet");

        loop {
            let draw = normal.sample(&mut self.rng);
            if draw >= lower_bound && draw <= wcet {
                return draw;
            }
        }
    }
}
