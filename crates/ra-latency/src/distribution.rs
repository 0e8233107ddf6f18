//! Log-normal distribution calibrated from a mean and standard deviation.

use rand::Rng;
use rand_distr::Distribution;

use crate::config::{DelayProfile, Operation};
use crate::error::LatencyError;

/// Log-normal over seconds.
///
/// For target mean `m` and deviation `s`:
/// `sigma^2 = ln(1 + s^2 / m^2)` and `mu = ln(m) - sigma^2 / 2`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LogNormal {
    inner: rand_distr::LogNormal<f64>,
}

impl LogNormal {
    pub(crate) fn calibrated(
        operation: Operation,
        profile: DelayProfile,
    ) -> Result<Self, LatencyError> {
        let mean = profile.mean.as_secs_f64();
        let std_dev = profile.std_dev.as_secs_f64();
        if mean <= 0.0 {
            return Err(LatencyError::InvalidProfile {
                operation,
                reason: "mean must be positive",
            });
        }

        let sigma_sq = (std_dev / mean).powi(2).ln_1p();
        let inner = rand_distr::LogNormal::new(mean.ln() - sigma_sq / 2.0, sigma_sq.sqrt())
            .map_err(|_| LatencyError::InvalidProfile {
                operation,
                reason: "deviation must be finite",
            })?;
        Ok(Self { inner })
    }

    /// Draw one value, in seconds.
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.inner.sample(rng)
    }
}
