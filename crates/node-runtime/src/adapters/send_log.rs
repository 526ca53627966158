//! # In-Memory Send Log
//!
//! Implements the sender's [`SendLog`] port. Remembers, per transaction hash,
//! whether this node already forwarded it and which neighbors delivered it.
//! Bounded: once `capacity` hashes are tracked the oldest one is forgotten.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use shared_types::{PeerId, TxHash};
use tg_03_gossip_sender::{SendLog, SendRecord};

/// Default number of tracked hashes.
pub const DEFAULT_SEND_LOG_CAPACITY: usize = 100_000;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<TxHash, SendRecord>,
    order: VecDeque<TxHash>,
}

impl Inner {
    /// The record for `hash`, created (and the oldest evicted) if absent.
    fn entry(&mut self, hash: &TxHash, capacity: usize) -> (&mut SendRecord, bool) {
        let created = !self.records.contains_key(hash);
        if created {
            while self.order.len() >= capacity {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.records.remove(&oldest);
                    }
                    None => break,
                }
            }
            self.order.push_back(*hash);
        }
        (self.records.entry(*hash).or_default(), created)
    }
}

#[derive(Debug)]
pub struct InMemorySendLog {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl Default for InMemorySendLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SEND_LOG_CAPACITY)
    }
}

impl InMemorySendLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Records that `peer` delivered `hash` to us.
    ///
    /// Returns `true` if the hash was not known before.
    pub fn record_sender(&self, hash: &TxHash, peer: PeerId) -> bool {
        let mut inner = self.inner.lock();
        let (record, created) = inner.entry(hash, self.capacity);
        record.senders.insert(peer);
        created
    }

    pub fn is_known(&self, hash: &TxHash) -> bool {
        self.inner.lock().records.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SendLog for InMemorySendLog {
    fn lookup(&self, hash: &TxHash) -> Option<SendRecord> {
        self.inner.lock().records.get(hash).cloned()
    }

    fn mark_sent_if(&self, hash: &TxHash, condition: &dyn Fn(&SendRecord) -> bool) -> bool {
        let mut inner = self.inner.lock();
        let holds = match inner.records.get(hash) {
            Some(record) => condition(record),
            None => condition(&SendRecord::default()),
        };
        if holds {
            inner.entry(hash, self.capacity).0.was_sent = true;
        }
        holds
    }
}
