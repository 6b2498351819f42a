//! Prometheus metrics for the LNN crates.
//!
//! All metrics follow the naming convention: `lnn_<component>_<metric>_<unit>`
//!
//! Collectors work whether or not they are registered; registration only
//! makes them visible to [`gather_text`].

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Metrics registry for this process
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // EVENT BUS
    // =========================================================================

    /// Events dispatched through the bus
    pub static ref EVENT_BUS_EVENTS_PUBLISHED: CounterVec = CounterVec::new(
        Opts::new("lnn_eventbus_events_published_total", "Events published on the LNN bus"),
        &["event_type"]
    ).expect("metric creation failed");

    /// Handlers that returned an error or panicked
    pub static ref EVENT_BUS_HANDLER_FAILURES: CounterVec = CounterVec::new(
        Opts::new("lnn_eventbus_handler_failures_total", "Handler failures swallowed by the bus"),
        &["event_type"]
    ).expect("metric creation failed");

    // =========================================================================
    // SUBNETS
    // =========================================================================

    /// Subnet state-machine transitions
    pub static ref SUBNET_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("lnn_subnet_transitions_total", "Subnet state transitions"),
        &["event", "outcome"]  // outcome: accepted/rejected
    ).expect("metric creation failed");

    // =========================================================================
    // INTERFACE MONITORS
    // =========================================================================

    /// Monitor restarts after a fatal read error
    pub static ref MONITOR_RESTARTS: CounterVec = CounterVec::new(
        Opts::new("lnn_monitor_restarts_total", "Interface monitor restarts"),
        &["monitor"]
    ).expect("metric creation failed");

    /// 1 while a monitor is receiving, 0 while backing off or failed
    pub static ref MONITOR_HEALTHY: GaugeVec = GaugeVec::new(
        Opts::new("lnn_monitor_healthy", "Interface monitor health"),
        &["monitor"]
    ).expect("metric creation failed");

    // =========================================================================
    // DESCRIPTOR EXCHANGE
    // =========================================================================

    /// Device descriptors packed or unpacked
    pub static ref DESCRIPTOR_EXCHANGES: CounterVec = CounterVec::new(
        Opts::new("lnn_descriptor_exchanges_total", "Device descriptor exchanges"),
        &["direction", "result"]  // direction: pack/unpack, result: ok/error
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the process registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(EVENT_BUS_EVENTS_PUBLISHED.clone()),
        Box::new(EVENT_BUS_HANDLER_FAILURES.clone()),
        Box::new(SUBNET_TRANSITIONS.clone()),
        Box::new(MONITOR_RESTARTS.clone()),
        Box::new(MONITOR_HEALTHY.clone()),
        Box::new(DESCRIPTOR_EXCHANGES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Render registered metrics in the Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
