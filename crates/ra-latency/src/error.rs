//! Latency model errors.

use thiserror::Error;

use crate::config::Operation;

/// Errors building a latency model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatencyError {
    /// A profile cannot drive a non-negative distribution.
    #[error("invalid latency profile for {operation}: {reason}")]
    InvalidProfile {
        /// Operation with the bad profile.
        operation: Operation,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The ceiling would reject most samples.
    #[error("latency ceiling must exceed the {operation} mean")]
    CeilingBelowMean {
        /// Operation whose mean is not below the ceiling.
        operation: Operation,
    },
}
