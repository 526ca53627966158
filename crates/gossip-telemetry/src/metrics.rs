//! Prometheus metrics for the gossip node.
//!
//! All metrics follow the naming convention: `tg_<component>_<metric>_<unit>`
//!
//! The sender keeps its own atomic totals; [`sync_counter`] publishes such a
//! running total into a Prometheus counter without double counting.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SENDER METRICS
    // =========================================================================

    /// Transactions put on the propagation queue
    pub static ref TX_QUEUED: IntCounter = IntCounter::new(
        "tg_sender_transactions_queued_total",
        "Transactions scheduled for propagation"
    ).expect("metric creation failed");

    /// Received transactions not forwarded
    pub static ref TX_DECLINED: IntCounter = IntCounter::new(
        "tg_sender_transactions_declined_total",
        "Received transactions that were already sent or reached every neighbor"
    ).expect("metric creation failed");

    /// Dispatches by outcome
    pub static ref TX_DISPATCHED: IntCounterVec = IntCounterVec::new(
        Opts::new("tg_sender_dispatches_total", "Due transactions handled by the sender"),
        &["outcome"]  // delivered / stale
    ).expect("metric creation failed");

    /// Datagrams written to the socket
    pub static ref PACKETS_SENT: IntCounter = IntCounter::new(
        "tg_sender_packets_sent_total",
        "Gossip packets sent to neighbors"
    ).expect("metric creation failed");

    /// Failed datagram writes
    pub static ref SEND_FAILURES: IntCounter = IntCounter::new(
        "tg_sender_send_failures_total",
        "Gossip packets that could not be sent"
    ).expect("metric creation failed");

    /// Hashes waiting to be requested
    pub static ref PENDING_REQUESTS: IntGauge = IntGauge::new(
        "tg_sender_pending_requests",
        "Transaction hashes waiting to ride on an outgoing packet"
    ).expect("metric creation failed");

    /// Queue depth
    pub static ref QUEUE_DEPTH: IntGauge = IntGauge::new(
        "tg_sender_queue_depth",
        "Transactions waiting for their sending time"
    ).expect("metric creation failed");

    /// Completed rounds
    pub static ref ROUNDS: IntCounter = IntCounter::new(
        "tg_sender_rounds_total",
        "Rounds closed by the sender"
    ).expect("metric creation failed");

    // =========================================================================
    // RECEIVER METRICS
    // =========================================================================

    /// Inbound datagrams by outcome
    pub static ref INBOUND_DATAGRAMS: IntCounterVec = IntCounterVec::new(
        Opts::new("tg_receiver_datagrams_total", "Datagrams read from the gossip socket"),
        &["outcome"]  // new / known / invalid / ignored / unknown_origin
    ).expect("metric creation failed");

    // =========================================================================
    // NEIGHBOR METRICS
    // =========================================================================

    /// Neighbors with a resolved address
    pub static ref NEIGHBORS_RESOLVED: IntGauge = IntGauge::new(
        "tg_neighbors_resolved",
        "Configured neighbors that currently have an address"
    ).expect("metric creation failed");
}

/// Keeps the registry alive for the lifetime of the node.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// A second call fails with [`TelemetryError::MetricsInit`].
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Sender
        Box::new(TX_QUEUED.clone()),
        Box::new(TX_DECLINED.clone()),
        Box::new(TX_DISPATCHED.clone()),
        Box::new(PACKETS_SENT.clone()),
        Box::new(SEND_FAILURES.clone()),
        Box::new(PENDING_REQUESTS.clone()),
        Box::new(QUEUE_DEPTH.clone()),
        Box::new(ROUNDS.clone()),
        // Receiver
        Box::new(INBOUND_DATAGRAMS.clone()),
        // Neighbors
        Box::new(NEIGHBORS_RESOLVED.clone()),
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

/// Raises `counter` to `total`. Totals below the current value are ignored.
pub fn sync_counter(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}
