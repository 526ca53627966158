//! Value objects for scheduling configuration and dispatch results.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::events::SenderError;

/// Reloadable scheduler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulingParams {
    /// Lower bound of the forward delay (inclusive).
    pub min_forward_delay_ms: u64,
    /// Upper bound of the forward delay (inclusive).
    pub max_forward_delay_ms: u64,
    /// Interval between round rollovers.
    pub round_duration_ms: u64,
    /// Accepted issuance-time drift. Transactions beyond 90% of it are
    /// not forwarded.
    pub timestamp_tolerance_ms: u64,
    /// Bound of the pending request queue.
    pub max_pending_requests: usize,
}

impl Default for SchedulingParams {
    fn default() -> Self {
        Self {
            min_forward_delay_ms: 0,
            max_forward_delay_ms: 200,
            round_duration_ms: 60_000,
            timestamp_tolerance_ms: 20 * 60 * 1000,
            max_pending_requests: 10_000,
        }
    }
}

impl SchedulingParams {
    pub fn validate(&self) -> Result<(), SenderError> {
        if self.max_forward_delay_ms < self.min_forward_delay_ms {
            return Err(SenderError::InvalidParameters(format!(
                "max_forward_delay_ms ({}) < min_forward_delay_ms ({})",
                self.max_forward_delay_ms, self.min_forward_delay_ms
            )));
        }
        if self.round_duration_ms == 0 {
            return Err(SenderError::InvalidParameters(
                "round_duration_ms must be positive".into(),
            ));
        }
        if self.timestamp_tolerance_ms == 0 {
            return Err(SenderError::InvalidParameters(
                "timestamp_tolerance_ms must be positive".into(),
            ));
        }
        if self.max_pending_requests == 0 {
            return Err(SenderError::InvalidParameters(
                "max_pending_requests must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// What happened to a due task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Issuance time too far from now; nothing was sent.
    Stale,
    Delivered {
        sent: usize,
        /// Neighbors already known to have the transaction.
        skipped: usize,
        failed: usize,
        unresolved: usize,
    },
}

/// Running totals kept by the sender.
#[derive(Debug, Default)]
pub struct SenderMetrics {
    queued: AtomicU64,
    declined: AtomicU64,
    dispatched: AtomicU64,
    stale: AtomicU64,
    packets_sent: AtomicU64,
    send_failures: AtomicU64,
    rounds: AtomicU64,
}

impl SenderMetrics {
    pub fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_declined(&self) {
        self.declined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, outcome: &DispatchOutcome) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        match outcome {
            DispatchOutcome::Stale => {
                self.stale.fetch_add(1, Ordering::Relaxed);
            }
            DispatchOutcome::Delivered { sent, failed, .. } => {
                self.packets_sent.fetch_add(*sent as u64, Ordering::Relaxed);
                self.send_failures.fetch_add(*failed as u64, Ordering::Relaxed);
            }
        }
    }

    pub fn record_round(&self) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SenderStats {
        SenderStats {
            queued: self.queued.load(Ordering::Relaxed),
            declined: self.declined.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            rounds: self.rounds.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SenderMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SenderStats {
    /// Tasks put on the queue.
    pub queued: u64,
    /// Accepted transactions not queued because the send-log says they
    /// were already forwarded or fully propagated.
    pub declined: u64,
    pub dispatched: u64,
    pub stale: u64,
    pub packets_sent: u64,
    pub send_failures: u64,
    pub rounds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SchedulingParams::default().validate().is_ok());
    }

    #[test]
    fn test_equal_delay_bounds_allowed() {
        let params = SchedulingParams {
            min_forward_delay_ms: 50,
            max_forward_delay_ms: 50,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_delay_window() {
        let params = SchedulingParams {
            min_forward_delay_ms: 100,
            max_forward_delay_ms: 50,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SenderError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_rejects_zero_durations() {
        for params in [
            SchedulingParams {
                round_duration_ms: 0,
                ..Default::default()
            },
            SchedulingParams {
                timestamp_tolerance_ms: 0,
                ..Default::default()
            },
            SchedulingParams {
                max_pending_requests: 0,
                ..Default::default()
            },
        ] {
            assert!(params.validate().is_err(), "{params:?}");
        }
    }

    #[test]
    fn test_metrics_accumulate() {
        let metrics = SenderMetrics::default();
        metrics.record_queued();
        metrics.record_outcome(&DispatchOutcome::Stale);
        metrics.record_outcome(&DispatchOutcome::Delivered {
            sent: 2,
            skipped: 1,
            failed: 1,
            unresolved: 0,
        });
        let stats = metrics.snapshot();
        assert_eq!(stats.queued, 1);
        assert_eq!(stats.dispatched, 2);
        assert_eq!(stats.stale, 1);
        assert_eq!(stats.packets_sent, 2);
        assert_eq!(stats.send_failures, 1);
    }
}
