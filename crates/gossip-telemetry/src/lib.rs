//! # Gossip Telemetry
//!
//! Logging and metrics for the trit gossip node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gossip_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TG_SERVICE_NAME` | `trit-gossip` | Service name on the startup line |
//! | `TG_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `TG_CONSOLE_OUTPUT` | `true` | Write logs at all |
//! | `TG_JSON_LOGS` | `false` | JSON lines instead of text |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, sync_counter, MetricsHandle, INBOUND_DATAGRAMS,
    NEIGHBORS_RESOLVED, PACKETS_SENT, PENDING_REQUESTS, QUEUE_DEPTH, REGISTRY, ROUNDS,
    SEND_FAILURES, TX_DECLINED, TX_DISPATCHED, TX_QUEUED,
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

/// Initialize metrics and logging.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    logging::init_logging(&config)?;

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
