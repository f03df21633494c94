//! Prometheus metrics for Quantum-Orderer.
//!
//! All metrics follow the naming convention: `qc_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., broadcast_processed_total)
//! - **Histogram**: Distribution of values (e.g., broadcast_validate_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BROADCAST METRICS
    // =========================================================================

    /// Submissions answered, by channel, message type and returned status
    pub static ref BROADCAST_PROCESSED: CounterVec = CounterVec::new(
        Opts::new("qc_broadcast_processed_total", "Broadcast submissions answered"),
        &["channel", "type", "status"]
    ).expect("metric creation failed");

    /// Submissions rejected, by channel, pipeline stage and error kind
    pub static ref BROADCAST_REJECTED: CounterVec = CounterVec::new(
        Opts::new("qc_broadcast_rejected_total", "Broadcast submissions rejected"),
        &["channel", "stage", "kind"]
    ).expect("metric creation failed");

    /// Time spent validating a submission
    pub static ref BROADCAST_VALIDATE_DURATION: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "qc_broadcast_validate_duration_seconds",
            "Time spent validating broadcast submissions"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).unwrap()),
        &["channel", "type", "status"]
    ).expect("metric creation failed");

    /// Time spent handing a validated submission to the ordering backend
    pub static ref BROADCAST_ENQUEUE_DURATION: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "qc_broadcast_enqueue_duration_seconds",
            "Time spent enqueueing broadcast submissions for ordering"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).unwrap()),
        &["channel", "type", "status"]
    ).expect("metric creation failed");

    // =========================================================================
    // ORDERING BACKEND METRICS
    // =========================================================================

    /// Blocks cut by the single-node backend
    pub static ref SOLO_BLOCKS_CUT: CounterVec = CounterVec::new(
        Opts::new("qc_solo_blocks_cut_total", "Blocks cut by the solo backend"),
        &["channel"]
    ).expect("metric creation failed");

    /// Messages dropped because they failed re-validation after a config change
    pub static ref SOLO_MESSAGES_DROPPED: CounterVec = CounterVec::new(
        Opts::new(
            "qc_solo_messages_dropped_total",
            "Messages discarded on re-validation"
        ),
        &["channel", "kind"]  // kind: normal/config
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Broadcast
        Box::new(BROADCAST_PROCESSED.clone()),
        Box::new(BROADCAST_REJECTED.clone()),
        Box::new(BROADCAST_VALIDATE_DURATION.clone()),
        Box::new(BROADCAST_ENQUEUE_DURATION.clone()),
        // Ordering backend
        Box::new(SOLO_BLOCKS_CUT.clone()),
        Box::new(SOLO_MESSAGES_DROPPED.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
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
