//! Simulator configuration from environment variables.

use std::env;
use std::str::FromStr;

use ra_latency::{LatencyConfig, LatencySimulator};
use ra_smart_server::ListenerConfig;
use ra_transport::Endpoint;

use crate::error::IasSimError;

/// Default TCP address of the simulator.
pub const DEFAULT_ADDR: &str = "127.0.0.1:57720";

/// Simulator configuration, fixed before the server starts.
#[derive(Debug, Clone)]
pub struct IasSimConfig {
    /// TCP endpoint.
    pub tcp: Endpoint,
    /// Optional local-socket endpoint served by the same handler.
    pub local: Option<Endpoint>,
    /// Pool capacity and worker limit, applied to every listener.
    pub listener: ListenerConfig,
    /// Simulated response-time model.
    pub latency: LatencyConfig,
}

impl Default for IasSimConfig {
    fn default() -> Self {
        Self {
            tcp: Endpoint::Tcp(([127, 0, 0, 1], 57720).into()),
            local: None,
            listener: ListenerConfig::new(1000, 50),
            latency: LatencyConfig::default(),
        }
    }
}

impl IasSimConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IAS_SIM_ADDR`: TCP address (default: 127.0.0.1:57720)
    /// - `IAS_SIM_LOCAL_SOCKET`: Also listen on this local socket path
    /// - `IAS_SIM_WORKERS`: Worker limit per listener (default: 50)
    /// - `IAS_SIM_POOL`: Pool capacity per listener (default: 1000)
    /// - `IAS_SIM_LATENCY`: `on` or `off` (default: on)
    pub fn from_env() -> Result<Self, IasSimError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`IasSimConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IasSimError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("IAS_SIM_ADDR") {
            config.tcp = match Endpoint::from_str(&addr) {
                Ok(endpoint @ Endpoint::Tcp(_)) => endpoint,
                Ok(_) => return Err(invalid("IAS_SIM_ADDR", addr, "expected a TCP address")),
                Err(reason) => return Err(invalid("IAS_SIM_ADDR", addr, reason)),
            };
        }
        if let Some(path) = lookup("IAS_SIM_LOCAL_SOCKET") {
            if !path.is_empty() {
                config.local = Some(Endpoint::Local(path.into()));
            }
        }
        if let Some(workers) = lookup("IAS_SIM_WORKERS") {
            config.listener.worker_limit = match parse_count("IAS_SIM_WORKERS", workers.clone())? {
                0 => return Err(invalid("IAS_SIM_WORKERS", workers, "must be at least 1")),
                count => count,
            };
        }
        if let Some(pool) = lookup("IAS_SIM_POOL") {
            config.listener.pool_capacity = parse_count("IAS_SIM_POOL", pool)?;
        }
        if let Some(latency) = lookup("IAS_SIM_LATENCY") {
            config.latency.enabled = match latency.to_lowercase().as_str() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                _ => return Err(invalid("IAS_SIM_LATENCY", latency, "expected on or off")),
            };
        }

        Ok(config)
    }

    /// Build the latency model described by this configuration.
    pub fn latency_model(&self) -> Result<LatencySimulator, IasSimError> {
        Ok(LatencySimulator::new(self.latency.clone())?)
    }

    /// Every endpoint to listen on, TCP first.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        std::iter::once(self.tcp.clone())
            .chain(self.local.clone())
            .collect()
    }
}

fn parse_count(var: &'static str, value: String) -> Result<usize, IasSimError> {
    match value.parse() {
        Ok(count) => Ok(count),
        Err(e) => Err(invalid(var, value, e)),
    }
}

fn invalid(var: &'static str, value: String, reason: impl ToString) -> IasSimError {
    IasSimError::Config {
        var,
        value,
        reason: reason.to_string(),
    }
}
