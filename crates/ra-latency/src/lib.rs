//! # RA Latency Simulator
//!
//! Reproduces the response-time behaviour of the remote attestation
//! authority so that attestation flows see production-like timing without
//! depending on the real service.
//!
//! ## Model
//!
//! Each operation has a calibrated (mean, standard deviation) pair. Delays
//! are drawn from a log-normal distribution with exactly that mean and
//! deviation; draws above a fixed ceiling are logged and drawn again.
//!
//! Callers do not sleep the raw sample. They sleep what is *left* of it
//! after their own processing time:
//!
//! ```text
//! remaining = max(sample - already_elapsed, 0)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! ra-latency/
//! ├── config        # Operations, calibrated profiles, ceiling
//! ├── distribution  # Log-normal calibrated from mean / std-dev
//! └── simulator     # Shared model + per-context samplers
//! ```
//!
//! The `simulated-latency` feature (on by default) gates all delays; with it
//! disabled, or with `LatencyConfig::enabled == false`, every delay is zero.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod distribution;
mod error;
mod simulator;

pub use config::{DelayProfile, LatencyConfig, Operation, DEFAULT_CEILING};
pub use error::LatencyError;
pub use simulator::{DelaySampler, LatencySimulator, WaitOutcome};
