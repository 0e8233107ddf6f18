//! Simulated operations and their calibrated profiles.

use std::fmt;
use std::time::Duration;

/// Absolute ceiling on any single delay sample.
pub const DEFAULT_CEILING: Duration = Duration::from_secs(30);

/// An attestation-authority operation with its own latency profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Retrieve a signature revocation list.
    SigRl,
    /// Verify a quote and retrieve an attestation report.
    Report,
}

impl Operation {
    /// Every simulated operation.
    pub const ALL: [Operation; 2] = [Operation::SigRl, Operation::Report];

    /// Label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SigRl => "sigrl",
            Operation::Report => "report",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed mean and standard deviation of one operation's latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayProfile {
    /// Mean response time.
    pub mean: Duration,
    /// Standard deviation of the response time.
    pub std_dev: Duration,
}

impl DelayProfile {
    /// Profile from millisecond values.
    pub const fn from_millis(mean_ms: u64, std_dev_ms: u64) -> Self {
        Self {
            mean: Duration::from_millis(mean_ms),
            std_dev: Duration::from_millis(std_dev_ms),
        }
    }
}

/// Latency simulator configuration.
#[derive(Debug, Clone)]
pub struct LatencyConfig {
    /// Runtime switch; `false` makes every delay zero.
    pub enabled: bool,
    /// Samples above this are rejected and drawn again.
    pub ceiling: Duration,
    /// Signature revocation list retrieval.
    pub sigrl: DelayProfile,
    /// Attestation report retrieval.
    pub report: DelayProfile,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        // Measured against the development attestation endpoint
        Self {
            enabled: true,
            ceiling: DEFAULT_CEILING,
            sigrl: DelayProfile::from_millis(276, 44),
            report: DelayProfile::from_millis(381, 71),
        }
    }
}

impl LatencyConfig {
    /// Configuration with delays switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Profile for `operation`.
    pub fn profile(&self, operation: Operation) -> DelayProfile {
        match operation {
            Operation::SigRl => self.sigrl,
            Operation::Report => self.report,
        }
    }
}
