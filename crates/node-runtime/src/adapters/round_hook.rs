//! # Neighbor Round Hook
//!
//! Installed on the sender when `gossip.cascade_rounds` is set: every time
//! the sender's round elapses, each neighbor's round is closed and the
//! per-round quota is reinstalled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gossip_telemetry::encode_metrics;
use tg_02_neighbor::NeighborRoster;
use tg_03_gossip_sender::RoundHook;
use tracing::{debug, info};

pub struct NeighborRoundHook {
    roster: Arc<NeighborRoster>,
    quota: AtomicU64,
}

impl NeighborRoundHook {
    pub fn new(roster: Arc<NeighborRoster>, quota: u64) -> Self {
        Self {
            roster,
            quota: AtomicU64::new(quota),
        }
    }

    /// Quota installed at the next rollover.
    pub fn set_quota(&self, quota: u64) {
        self.quota.store(quota, Ordering::Relaxed);
    }

    pub fn quota(&self) -> u64 {
        self.quota.load(Ordering::Relaxed)
    }
}

impl RoundHook for NeighborRoundHook {
    fn on_round_elapsed(&self) {
        let finished = self.roster.advance_round_all(self.quota());
        let received: u64 = finished.iter().map(|(_, stats)| stats.received_all).sum();
        info!(neighbors = finished.len(), received, "round closed");

        if tracing::enabled!(tracing::Level::DEBUG) {
            match encode_metrics() {
                Ok(digest) => debug!("metrics at round end\n{digest}"),
                Err(e) => debug!(error = %e, "metrics unavailable"),
            }
        }
    }
}
