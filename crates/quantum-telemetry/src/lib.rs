//! # Quantum Telemetry
//!
//! Logging and metrics for the Quantum-Orderer crates.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber with env filter, pretty or JSON output
//! - **Metrics**: Prometheus collectors for the broadcast path and the ordering backend
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QO_SERVICE_NAME` | `quantum-orderer` | Service name in logs |
//! | `QO_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `QO_JSON_LOGS` | `false` (`true` in containers) | JSON formatted logs |
//!
//! Nothing here listens for scrapes. The embedding process serves
//! [`encode_metrics`] on whatever endpoint it exposes.

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, BROADCAST_ENQUEUE_DURATION,
    BROADCAST_PROCESSED, BROADCAST_REJECTED, BROADCAST_VALIDATE_DURATION, SOLO_BLOCKS_CUT,
    SOLO_MESSAGES_DROPPED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so that anything logged during setup is also counted
    let metrics_handle = register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
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
