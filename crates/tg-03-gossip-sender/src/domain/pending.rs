//! # Pending Requests
//!
//! Hashes this node is missing. One is piggybacked on each outgoing packet.

use std::collections::{HashSet, VecDeque};

use shared_types::TxHash;

/// Bounded FIFO of distinct, non-null hashes.
///
/// When full, the oldest request is evicted to make room.
#[derive(Debug)]
pub struct PendingRequests {
    order: VecDeque<TxHash>,
    members: HashSet<TxHash>,
    capacity: usize,
}

impl PendingRequests {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
            capacity: capacity.max(1),
        }
    }

    /// Queues `hash`. Returns `false` for the null hash and for hashes
    /// already pending.
    pub fn push(&mut self, hash: TxHash) -> bool {
        if hash.is_null() || !self.members.insert(hash) {
            return false;
        }
        self.order.push_back(hash);
        self.evict_overflow();
        true
    }

    pub fn pop(&mut self) -> Option<TxHash> {
        let hash = self.order.pop_front()?;
        self.members.remove(&hash);
        Some(hash)
    }

    pub fn contains(&self, hash: &TxHash) -> bool {
        self.members.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the bound, evicting the oldest entries if it shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.members.remove(&evicted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(symbol: char) -> TxHash {
        TxHash::from_trytes(&symbol.to_string().repeat(81)).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut pending = PendingRequests::new(10);
        // Z sorts after A, so FIFO differs from hash order.
        pending.push(hash('Z'));
        pending.push(hash('A'));
        assert_eq!(pending.pop(), Some(hash('Z')));
        assert_eq!(pending.pop(), Some(hash('A')));
        assert_eq!(pending.pop(), None);
    }

    #[test]
    fn test_duplicates_and_null_rejected() {
        let mut pending = PendingRequests::new(10);
        assert!(pending.push(hash('A')));
        assert!(!pending.push(hash('A')));
        assert!(!pending.push(TxHash::NULL));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_requeue_after_pop() {
        let mut pending = PendingRequests::new(10);
        pending.push(hash('A'));
        pending.pop();
        assert!(!pending.contains(&hash('A')));
        assert!(pending.push(hash('A')));
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut pending = PendingRequests::new(2);
        pending.push(hash('A'));
        pending.push(hash('B'));
        pending.push(hash('C'));
        assert_eq!(pending.len(), 2);
        assert!(!pending.contains(&hash('A')));
        assert_eq!(pending.pop(), Some(hash('B')));
    }

    #[test]
    fn test_shrinking_capacity_evicts() {
        let mut pending = PendingRequests::new(3);
        for symbol in ['A', 'B', 'C'] {
            pending.push(hash(symbol));
        }
        pending.set_capacity(1);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.pop(), Some(hash('C')));
    }
}
