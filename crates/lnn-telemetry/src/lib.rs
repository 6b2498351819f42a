//! # LNN Telemetry
//!
//! Logging initialisation and Prometheus metrics for the LNN crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lnn_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LNN_SERVICE_NAME` | `lnnd` | Service name attached to startup logs |
//! | `LNN_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `LNN_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_text, register_metrics, MetricsHandle, DESCRIPTOR_EXCHANGES,
    EVENT_BUS_EVENTS_PUBLISHED, EVENT_BUS_HANDLER_FAILURES, MONITOR_HEALTHY, MONITOR_RESTARTS,
    SUBNET_TRANSITIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard to be held for the lifetime of the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(config)?;

    tracing::info!(service = %config.service_name, "Telemetry initialized");

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
