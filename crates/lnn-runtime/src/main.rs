//! # lnnd
//!
//! Runs LNN network management on this host until Ctrl-C.
//!
//! The configuration file comes from the first argument or `LNN_CONFIG`;
//! without either, built-in defaults are used.

use anyhow::{Context, Result};
use lnn_runtime::{Collaborators, LnnRuntime, RuntimeConfig};
use lnn_telemetry::{gather_text, init_telemetry, TelemetryConfig};
use tracing::{debug, info};

fn load_config() -> Result<RuntimeConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("LNN_CONFIG").ok());

    match path {
        Some(path) => {
            info!(path = %path, "Loading configuration");
            RuntimeConfig::load(&path).with_context(|| format!("loading {path}"))
        }
        None => {
            info!("No configuration file given, using defaults");
            Ok(RuntimeConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    let _guard = init_telemetry(&telemetry).context("initialising telemetry")?;

    let config = load_config()?;
    let netifs = config.network.netifs().context("reading netif list")?;

    let runtime = LnnRuntime::start(config, Collaborators::host(netifs))
        .context("starting LNN runtime")?;

    info!("lnnd is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;

    for (name, health) in runtime.monitor_health() {
        info!(monitor = %name, health = ?health, "Monitor state at shutdown");
    }
    if let Ok(metrics) = gather_text() {
        debug!(metrics = %metrics, "Final metrics");
    }
    runtime.shutdown();
    Ok(())
}
