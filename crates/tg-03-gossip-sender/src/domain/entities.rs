//! # Core Domain Entities

use std::cmp::Ordering;
use std::sync::Arc;

use tg_01_transaction_codec::Transaction;

/// A transaction waiting for its sending time.
///
/// Tasks compare by sending time only. Two tasks due at the same
/// millisecond are equal and leave the queue in unspecified order.
#[derive(Debug, Clone)]
pub struct PropagationTask {
    pub transaction: Arc<Transaction>,
    /// Epoch milliseconds.
    pub sending_time: u64,
}

impl PropagationTask {
    pub fn new(transaction: Arc<Transaction>, sending_time: u64) -> Self {
        Self {
            transaction,
            sending_time,
        }
    }

    pub fn is_due(&self, now: u64) -> bool {
        self.sending_time <= now
    }
}

impl PartialEq for PropagationTask {
    fn eq(&self, other: &Self) -> bool {
        self.sending_time == other.sending_time
    }
}

impl Eq for PropagationTask {}

impl PartialOrd for PropagationTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropagationTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sending_time.cmp(&other.sending_time)
    }
}
