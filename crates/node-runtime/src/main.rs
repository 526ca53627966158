//! # Trit Gossip Node Runtime
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging and metrics
//! 2. Load configuration (defaults, `TG_CONFIG` file, environment)
//! 3. Bind the gossip socket, register and resolve neighbors
//! 4. Start the sender and receive threads
//! 5. Every round: re-resolve neighbor addresses, reload the gossip section
//!    of `TG_CONFIG` if set, publish metrics
//! 6. Ctrl+C: stop receiving, stop the sender, exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use gossip_telemetry::{init_telemetry, TelemetryConfig};
use node_runtime::{GossipNode, NodeConfig};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("failed to initialize telemetry")?;

    let config = NodeConfig::load().context("failed to load configuration")?;
    let refresh_every = Duration::from_millis(config.gossip.round_duration_ms);

    info!("===========================================");
    info!("  Trit Gossip Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let node = Arc::new(GossipNode::new(config)?);
    let running = node.start()?;
    info!(local = %node.local_addr()?, "Node is running. Press Ctrl+C to stop.");

    let maintenance = {
        let node = Arc::clone(&node);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh_every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let node = Arc::clone(&node);
                // DNS lookups block.
                let resolved = tokio::task::spawn_blocking(move || {
                    let resolved = node.refresh_addresses();
                    if std::env::var_os("TG_CONFIG").is_some() {
                        match NodeConfig::load() {
                            Ok(config) => {
                                if let Err(e) = node.reload(&config) {
                                    warn!(error = %e, "configuration reload rejected");
                                }
                            }
                            Err(e) => warn!(error = %e, "configuration reload failed"),
                        }
                    }
                    node.publish_metrics();
                    resolved
                })
                .await;
                if let Ok(resolved) = resolved {
                    debug!(resolved, "neighbor addresses refreshed");
                }
            }
        })
    };

    tokio::signal::ctrl_c().await?;
    info!("Initiating graceful shutdown...");

    maintenance.abort();
    tokio::task::spawn_blocking(move || running.shutdown())
        .await
        .context("shutdown task failed")?;
    node.publish_metrics();

    info!("Shutdown complete");
    Ok(())
}
