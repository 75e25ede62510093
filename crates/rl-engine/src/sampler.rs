//! Beta(a, b) variates via Cheng's BA rejection method (1978).
//!
//! The sampler owns its random source, so two samplers built from the same
//! seed produce the same sequence of draws.

use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trader_core::{TraderError, TraderResult};

/// `ln(4)` as used by the BA acceptance test.
const LN_FOUR: f64 = 1.3862944;

/// Seedable Beta sampler.
#[derive(Debug, Clone)]
pub struct BetaSampler<R = StdRng> {
    rng: R,
}

impl BetaSampler<StdRng> {
    /// Create a sampler with a fixed seed (reproducible).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a sampler seeded from `seed`, or from OS entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self {
                rng: StdRng::from_entropy(),
            },
        }
    }
}

impl<R: Rng> BetaSampler<R> {
    /// Wrap an explicitly supplied random source.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw one value from Beta(`a`, `b`).
    ///
    /// Returns `InvalidParameter` when either shape is not a positive finite
    /// number. The rejection loop has no iteration cap; it terminates with
    /// probability one.
    pub fn sample(&mut self, a: f64, b: f64) -> TraderResult<f64> {
        if !(a.is_finite() && a > 0.0) || !(b.is_finite() && b > 0.0) {
            return Err(TraderError::InvalidParameter(format!(
                "Beta shape parameters must be positive, got a={a}, b={b}"
            )));
        }

        let alpha = a + b;
        let beta = if a.min(b) <= 1.0 {
            (1.0 / a).max(1.0 / b)
        } else {
            ((alpha - 2.0) / (2.0 * a * b - alpha)).sqrt()
        };
        let gamma = a + 1.0 / beta;

        loop {
            let u1: f64 = self.rng.sample(Open01);
            let u2: f64 = self.rng.sample(Open01);

            let v = beta * (u1 / (1.0 - u1)).ln();
            let w = a * v.exp();

            if alpha * (alpha / (b + w)).ln() + gamma * v - LN_FOUR >= (u1 * u1 * u2).ln() {
                let x = w / (b + w);
                // Extreme shapes can underflow `w` to 0 or overflow it to
                // infinity; those draws fall outside (0, 1) and are redrawn.
                if x > 0.0 && x < 1.0 {
                    return Ok(x);
                }
            }
        }
    }
}
