//! Random sampling primitives for timing and motion
//!
//! Everything stochastic in the engine flows through [`Sampler`] so that a
//! session can be made exactly reproducible by seeding it. The primitives
//! are the three distributions the behavior statistics tables describe
//! (uniform range, clamped normal, weighted discrete choice) plus the
//! Fitts's-Law movement-duration estimator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Seedable source of all randomness in a simulator instance
///
/// One sampler per session. Unseeded construction draws entropy from the
/// OS; seeded construction replays the identical event stream for the
/// same inputs, which the test suite relies on.
#[derive(Debug)]
pub struct Sampler {
    rng: StdRng,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    /// Create a sampler seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a deterministic sampler from an explicit seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sample uniformly from `[min, max)`; collapsed ranges return `min`
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Sample a uniform integer from `[min, max]`
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    /// Flip a coin with probability `p` of heads
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    /// Sample a normal distribution clamped to `[min, max]`
    ///
    /// Box-Muller transform over two uniform draws. Clamping guarantees
    /// the engine invariant that no derived delay escapes its configured
    /// bounds, whatever the tail produces.
    pub fn normal_clamped(&mut self, mean: f64, std_dev: f64, min: f64, max: f64) -> f64 {
        let u1: f64 = self.rng.random::<f64>().max(1e-10);
        let u2: f64 = self.rng.random::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        (mean + z * std_dev).clamp(min.min(max), max.max(min))
    }

    /// Pick an index by weight from a slice of non-negative weights
    ///
    /// A zero or empty weight table falls back to index 0 rather than
    /// failing; the statistics tables are validated human data, so this
    /// is a guard, not an expected path.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 || weights.is_empty() {
            return 0;
        }
        let mut roll = self.rng.random_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            if roll < *w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }

    /// Sample a uniform duration in whole milliseconds from `[min_ms, max_ms]`
    pub fn duration_ms(&mut self, min_ms: f64, max_ms: f64) -> Duration {
        let ms = self.range(min_ms.max(0.0), max_ms.max(0.0));
        Duration::from_millis(ms.max(0.0) as u64)
    }
}

/// Estimate pointer travel time with Fitts's Law
///
/// `time = a + b * log2(distance / width + 1)`, the MacKenzie Shannon
/// formulation. The result is the population-average duration before any
/// per-profile speed or fatigue scaling is applied.
pub fn fitts_duration_ms(distance: f64, target_width: f64, a_ms: f64, b_ms: f64) -> f64 {
    let width = target_width.max(1.0);
    let dist = distance.max(0.0);
    let index_of_difficulty = (dist / width + 1.0).log2();
    (a_ms + b_ms * index_of_difficulty).max(0.0)
}
