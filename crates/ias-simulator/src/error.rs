//! Simulator startup errors.

use ra_latency::LatencyError;
use ra_wire::WireError;
use thiserror::Error;

/// Errors that stop the simulator from starting.
#[derive(Debug, Error)]
pub enum IasSimError {
    /// An environment variable has an unusable value.
    #[error("invalid {var}={value:?}: {reason}")]
    Config {
        /// Variable name.
        var: &'static str,
        /// Value found.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The latency model rejected its profiles.
    #[error(transparent)]
    Latency(#[from] LatencyError),

    /// A canned response could not be assembled.
    #[error("failed to build canned response: {0}")]
    Wire(#[from] WireError),

    /// The sample report could not be serialized.
    #[error("failed to encode sample report: {0}")]
    Report(#[from] serde_json::Error),
}
