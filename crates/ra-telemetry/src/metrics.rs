//! Prometheus metrics for the attestation server.
//!
//! All metrics follow the naming convention: `ra_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., connections_accepted_total)
//! - **Histogram**: Distribution of values (e.g., simulated_delay_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SMART SERVER METRICS
    // =========================================================================

    /// Connections accepted, by transport kind
    pub static ref CONNECTIONS_ACCEPTED: CounterVec = CounterVec::new(
        Opts::new("ra_server_connections_accepted_total", "Connections accepted by listeners"),
        &["transport"]
    ).expect("metric creation failed");

    /// Handler invocations, by category
    pub static ref HANDLER_INVOCATIONS: CounterVec = CounterVec::new(
        Opts::new("ra_server_handler_invocations_total", "Handler invocations by category"),
        &["category"]
    ).expect("metric creation failed");

    /// Connections closed because of an unknown category tag
    pub static ref UNKNOWN_CATEGORIES: Counter = Counter::new(
        "ra_server_unknown_categories_total",
        "Connections closed on an unrecognized category tag"
    ).expect("metric creation failed");

    /// Handler invocations that ended in an error
    pub static ref HANDLER_FAILURES: Counter = Counter::new(
        "ra_server_handler_failures_total",
        "Handler invocations that failed and discarded their connection"
    ).expect("metric creation failed");

    /// Idle pooled connections evicted to make room
    pub static ref POOL_EVICTIONS: Counter = Counter::new(
        "ra_server_pool_evictions_total",
        "Idle pooled connections evicted when the pool was full"
    ).expect("metric creation failed");

    /// Listeners that failed to bind
    pub static ref LISTENER_BIND_FAILURES: Counter = Counter::new(
        "ra_server_listener_bind_failures_total",
        "Listeners that could not bind their endpoint"
    ).expect("metric creation failed");

    // =========================================================================
    // ATTESTATION METRICS
    // =========================================================================

    /// Trust decisions, by outcome
    pub static ref TRUST_DECISIONS: CounterVec = CounterVec::new(
        Opts::new("ra_session_trust_decisions_total", "Whitelist trust decisions by outcome"),
        &["outcome"]
    ).expect("metric creation failed");

    // =========================================================================
    // LATENCY SIMULATOR METRICS
    // =========================================================================

    /// Samples rejected for exceeding the ceiling, by operation
    pub static ref LATENCY_RESAMPLES: CounterVec = CounterVec::new(
        Opts::new("ra_latency_resamples_total", "Delay samples rejected above the ceiling"),
        &["operation"]
    ).expect("metric creation failed");

    /// Simulated delay actually waited, by operation
    pub static ref SIMULATED_DELAY: HistogramVec = HistogramVec::new(
        HistogramOpts::new("ra_latency_simulated_delay_seconds", "Remaining delay waited before replying")
            .buckets(exponential_buckets(0.01, 2.0, 12).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");

    // =========================================================================
    // IAS SIMULATOR METRICS
    // =========================================================================

    /// Canned responses sent, by operation
    pub static ref IAS_SIM_RESPONSES: CounterVec = CounterVec::new(
        Opts::new("ra_ias_sim_responses_total", "Canned attestation-authority responses sent"),
        &["operation"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Registry,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Smart server
        Box::new(CONNECTIONS_ACCEPTED.clone()),
        Box::new(HANDLER_INVOCATIONS.clone()),
        Box::new(UNKNOWN_CATEGORIES.clone()),
        Box::new(HANDLER_FAILURES.clone()),
        Box::new(POOL_EVICTIONS.clone()),
        Box::new(LISTENER_BIND_FAILURES.clone()),
        // Attestation
        Box::new(TRUST_DECISIONS.clone()),
        // Latency simulator
        Box::new(LATENCY_RESAMPLES.clone()),
        Box::new(SIMULATED_DELAY.clone()),
        // IAS simulator
        Box::new(IAS_SIM_RESPONSES.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
