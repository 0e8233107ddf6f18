//! IAS simulator executable.
//!
//! Serves the simulated attestation authority until Ctrl+C.
//!
//! ## Exit Codes
//!
//! - `0`: normal shutdown
//! - non-zero: invalid configuration or no listener could be started

use std::sync::Arc;

use anyhow::{Context, Result};
use ias_simulator::{IasSimApp, IasSimConfig, SIMULATOR_VERSION};
use ra_smart_server::{ConnectionHandler, SmartServer};
use ra_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::for_service("ias-simulator"))
        .context("Failed to initialize telemetry")?;

    info!("================ IAS Simulator Ver{SIMULATOR_VERSION} ================");

    let config = IasSimConfig::from_env().context("Invalid simulator configuration")?;
    let latency = config.latency_model().context("Invalid latency model")?;
    info!(
        enabled = latency.is_enabled(),
        ceiling_ms = latency.config().ceiling.as_millis() as u64,
        "Latency simulation configured"
    );

    let mut server = SmartServer::new();
    let app: Arc<dyn ConnectionHandler> = Arc::new(
        IasSimApp::new(latency)
            .context("Failed to build canned responses")?
            .with_shutdown(server.shutdown_signal()),
    );

    for endpoint in config.endpoints() {
        // Failures are logged by the server; the remaining listeners still start
        let _ = server
            .add_listener(&endpoint, Arc::clone(&app), config.listener)
            .await;
    }
    server
        .ensure_listening()
        .context("Failed to start all servers. Program will be terminated!")?;

    info!(endpoints = ?server.endpoints(), "IAS simulator is running. Press Ctrl+C to stop.");
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl+C, shutting down");
            }
        })
        .await;

    info!("Exit ...");
    Ok(())
}
