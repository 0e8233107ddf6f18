//! Shared latency model and per-context samplers.

use std::future::Future;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ra_telemetry::metrics::{LATENCY_RESAMPLES, SIMULATED_DELAY};
use ra_telemetry::{metric_inc, metric_observe};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{LatencyConfig, Operation};
use crate::distribution::LogNormal;
use crate::error::LatencyError;

/// Draws per sample before giving up and clamping to the ceiling.
const MAX_DRAWS: u32 = 64;

/// Calibrated latency model. Immutable; share it by reference or `Arc`.
#[derive(Debug, Clone)]
pub struct LatencySimulator {
    config: LatencyConfig,
    sigrl: LogNormal,
    report: LogNormal,
}

/// How a simulated wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full remaining delay was waited.
    Elapsed(Duration),
    /// The cancellation future resolved first.
    Cancelled,
}

impl LatencySimulator {
    /// Build a model, validating every profile against the ceiling.
    pub fn new(config: LatencyConfig) -> Result<Self, LatencyError> {
        for operation in Operation::ALL {
            if config.profile(operation).mean >= config.ceiling {
                return Err(LatencyError::CeilingBelowMean { operation });
            }
        }

        Ok(Self {
            sigrl: LogNormal::calibrated(Operation::SigRl, config.sigrl)?,
            report: LogNormal::calibrated(Operation::Report, config.report)?,
            config,
        })
    }

    /// Whether delays are produced at all.
    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "simulated-latency") && self.config.enabled
    }

    /// Configuration the model was built from.
    pub fn config(&self) -> &LatencyConfig {
        &self.config
    }

    /// A sampler with its own generator, seeded from the OS.
    ///
    /// Create one per execution context; samplers are never shared.
    pub fn sampler(&self) -> DelaySampler<'_> {
        DelaySampler {
            model: self,
            rng: StdRng::from_entropy(),
        }
    }

    /// A sampler with a fixed seed, for reproducible runs.
    pub fn seeded_sampler(&self, seed: u64) -> DelaySampler<'_> {
        DelaySampler {
            model: self,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn distribution(&self, operation: Operation) -> &LogNormal {
        match operation {
            Operation::SigRl => &self.sigrl,
            Operation::Report => &self.report,
        }
    }
}

/// Per-context delay source: the shared model plus a private generator.
#[derive(Debug)]
pub struct DelaySampler<'a> {
    model: &'a LatencySimulator,
    rng: StdRng,
}

impl DelaySampler<'_> {
    /// Draw a delay for `operation`, never above the ceiling.
    ///
    /// Zero when simulation is disabled.
    pub fn sample_delay(&mut self, operation: Operation) -> Duration {
        if !self.model.is_enabled() {
            return Duration::ZERO;
        }

        let ceiling = self.model.config.ceiling;
        let distribution = *self.model.distribution(operation);
        for attempt in 1..=MAX_DRAWS {
            let secs = distribution.sample(&mut self.rng);
            if secs.is_finite() && secs <= ceiling.as_secs_f64() {
                return Duration::from_secs_f64(secs);
            }
            warn!(
                operation = %operation,
                sample_secs = secs,
                ceiling_secs = ceiling.as_secs_f64(),
                attempt,
                "Delay sample above ceiling, resampling"
            );
            metric_inc!(LATENCY_RESAMPLES, &[operation.as_str()]);
        }

        warn!(operation = %operation, "Resample budget exhausted, using ceiling");
        ceiling
    }

    /// What is left of a fresh sample after `already_elapsed`, floored at zero.
    pub fn delay_remaining(&mut self, operation: Operation, already_elapsed: Duration) -> Duration {
        self.sample_delay(operation).saturating_sub(already_elapsed)
    }

    /// Wait out the remaining delay for a request that started at `started`.
    ///
    /// Returns early with [`WaitOutcome::Cancelled`] if `cancel` resolves first.
    pub async fn wait_remaining<F>(
        &mut self,
        operation: Operation,
        started: Instant,
        cancel: F,
    ) -> WaitOutcome
    where
        F: Future<Output = ()>,
    {
        let remaining = self.delay_remaining(operation, started.elapsed());
        if remaining.is_zero() {
            return WaitOutcome::Elapsed(Duration::ZERO);
        }

        metric_observe!(SIMULATED_DELAY, &[operation.as_str()], remaining.as_secs_f64());
        debug!(operation = %operation, remaining_ms = remaining.as_millis() as u64, "Simulating latency");

        tokio::select! {
            _ = tokio::time::sleep(remaining) => WaitOutcome::Elapsed(remaining),
            _ = cancel => {
                debug!(operation = %operation, "Simulated wait cancelled");
                WaitOutcome::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DelayProfile;

    fn moments(samples: &[f64]) -> (f64, f64) {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var.sqrt())
    }

    // ===== TEST GROUP 1: Construction =====

    #[test]
    fn test_ceiling_must_exceed_mean() {
        let config = LatencyConfig {
            ceiling: Duration::from_millis(100),
            ..LatencyConfig::default()
        };
        assert_eq!(
            LatencySimulator::new(config).unwrap_err(),
            LatencyError::CeilingBelowMean {
                operation: Operation::SigRl
            }
        );
    }

    #[test]
    fn test_disabled_yields_zero() {
        let model = LatencySimulator::new(LatencyConfig::disabled()).unwrap();
        let mut sampler = model.sampler();
        assert!(!model.is_enabled());
        assert_eq!(sampler.sample_delay(Operation::Report), Duration::ZERO);
        assert_eq!(
            sampler.delay_remaining(Operation::SigRl, Duration::ZERO),
            Duration::ZERO
        );
    }

    // ===== TEST GROUP 2: Statistical fidelity =====

    #[cfg(feature = "simulated-latency")]
    #[test]
    fn test_empirical_moments_match_calibration() {
        let model = LatencySimulator::new(LatencyConfig::default()).unwrap();
        let mut sampler = model.seeded_sampler(0xA11CE);

        for operation in Operation::ALL {
            let profile = model.config().profile(operation);
            let samples: Vec<f64> = (0..100_000)
                .map(|_| sampler.sample_delay(operation).as_secs_f64())
                .collect();
            let (mean, std_dev) = moments(&samples);

            let target_mean = profile.mean.as_secs_f64();
            let target_sd = profile.std_dev.as_secs_f64();
            assert!(
                (mean - target_mean).abs() / target_mean < 0.02,
                "{operation}: mean {mean} vs {target_mean}"
            );
            assert!(
                (std_dev - target_sd).abs() / target_sd < 0.05,
                "{operation}: std-dev {std_dev} vs {target_sd}"
            );
        }
    }

    #[cfg(feature = "simulated-latency")]
    #[test]
    fn test_no_sample_exceeds_ceiling() {
        // Heavy tail against a low ceiling forces frequent resampling
        let config = LatencyConfig {
            enabled: true,
            ceiling: Duration::from_millis(150),
            sigrl: DelayProfile::from_millis(100, 100),
            report: DelayProfile::from_millis(120, 150),
        };
        let model = LatencySimulator::new(config).unwrap();
        let mut sampler = model.seeded_sampler(42);

        for operation in Operation::ALL {
            let exceeded = (0..100_000)
                .filter(|_| sampler.sample_delay(operation) > Duration::from_millis(150))
                .count();
            assert_eq!(exceeded, 0);
        }
    }

    #[cfg(feature = "simulated-latency")]
    #[test]
    fn test_delay_remaining_subtracts_and_floors() {
        let model = LatencySimulator::new(LatencyConfig::default()).unwrap();

        for (seed, elapsed_ms) in [(1u64, 0u64), (2, 100), (3, 250), (4, 10_000)] {
            let elapsed = Duration::from_millis(elapsed_ms);
            let sample = model.seeded_sampler(seed).sample_delay(Operation::SigRl);
            let remaining = model
                .seeded_sampler(seed)
                .delay_remaining(Operation::SigRl, elapsed);

            if elapsed > sample {
                assert_eq!(remaining, Duration::ZERO);
            } else {
                assert_eq!(remaining, sample - elapsed);
            }
        }
    }

    #[test]
    fn test_independent_samplers_diverge() {
        let model = LatencySimulator::new(LatencyConfig::default()).unwrap();
        let a: Vec<Duration> = {
            let mut s = model.seeded_sampler(10);
            (0..8).map(|_| s.sample_delay(Operation::Report)).collect()
        };
        let b: Vec<Duration> = {
            let mut s = model.seeded_sampler(11);
            (0..8).map(|_| s.sample_delay(Operation::Report)).collect()
        };
        if model.is_enabled() {
            assert_ne!(a, b);
        }
    }

    // ===== TEST GROUP 3: Timed waits =====

    #[cfg(feature = "simulated-latency")]
    #[tokio::test(start_paused = true)]
    async fn test_wait_remaining_sleeps_the_remainder() {
        let model = LatencySimulator::new(LatencyConfig::default()).unwrap();
        let expected = model.seeded_sampler(5).sample_delay(Operation::Report);

        let started = Instant::now();
        let outcome = model
            .seeded_sampler(5)
            .wait_remaining(Operation::Report, started, std::future::pending())
            .await;

        assert_eq!(outcome, WaitOutcome::Elapsed(expected));
        assert!(started.elapsed() >= expected);
    }

    #[cfg(feature = "simulated-latency")]
    #[tokio::test(start_paused = true)]
    async fn test_wait_remaining_accounts_for_prior_work() {
        let model = LatencySimulator::new(LatencyConfig::default()).unwrap();
        let sample = model.seeded_sampler(9).sample_delay(Operation::SigRl);

        let started = Instant::now();
        tokio::time::advance(Duration::from_millis(100)).await;
        let outcome = model
            .seeded_sampler(9)
            .wait_remaining(Operation::SigRl, started, std::future::pending())
            .await;

        assert_eq!(
            outcome,
            WaitOutcome::Elapsed(sample.saturating_sub(Duration::from_millis(100)))
        );
    }

    #[cfg(feature = "simulated-latency")]
    #[tokio::test(start_paused = true)]
    async fn test_wait_remaining_cancellable() {
        let model = LatencySimulator::new(LatencyConfig::default()).unwrap();
        let outcome = model
            .sampler()
            .wait_remaining(Operation::Report, Instant::now(), std::future::ready(()))
            .await;
        assert_eq!(outcome, WaitOutcome::Cancelled);
    }
}
