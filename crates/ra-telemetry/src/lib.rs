//! # RA Telemetry
//!
//! Logging and metrics shared by every server binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ra_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Logs and metrics are now being collected
//!     Ok(())
//! }
//! ```
//!
//! ## Metrics Export
//!
//! No metrics endpoint is served. [`encode_metrics`] renders the Prometheus
//! text format for an embedding process to expose, and dropping the
//! [`TelemetryGuard`] logs a final snapshot.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RA_SERVICE_NAME` | `decent-ra` | Service name attached to logs |
//! | `RA_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `RA_JSON_LOGS` | `false` (true in containers) | JSON formatted output |
//! | `RA_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics, MetricsHandle};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metrics could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so startup events are counted
    let metrics = register_metrics()?;
    init_logging(&config)?;

    tracing::debug!(service = %config.service_name, "Telemetry initialized");
    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        match encode_metrics() {
            Ok(snapshot) => tracing::info!(metrics = %snapshot, "Final metrics snapshot"),
            Err(e) => tracing::warn!(error = %e, "Failed to encode final metrics"),
        }
        tracing::debug!("Shutting down telemetry");
    }
}

/// Increment a counter, optionally by label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Record a histogram observation, optionally by label values.
#[macro_export]
macro_rules! metric_observe {
    ($metric:expr, $value:expr) => {
        $metric.observe($value)
    };
    ($metric:expr, $labels:expr, $value:expr) => {
        $metric.with_label_values($labels).observe($value)
    };
}
