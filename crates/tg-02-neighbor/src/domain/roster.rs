//! # Neighbor Roster
//!
//! The set of configured peers. Members may be added or removed while the
//! node runs; readers work on snapshots, so a dispatch that started before a
//! removal may still reach the removed peer once.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::PeerId;
use tracing::info;

use super::entities::{Neighbor, RoundStats};
use crate::ports::outbound::AddressResolver;

#[derive(Debug, Default)]
pub struct NeighborRoster {
    neighbors: RwLock<Vec<Arc<Neighbor>>>,
    next_id: AtomicU32,
}

impl NeighborRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a peer and assigns it a fresh [`PeerId`].
    ///
    /// The address stays unresolved until [`NeighborRoster::resolve_all`]
    /// or [`Neighbor::resolve_address`] runs.
    pub fn add(&self, host: impl Into<String>, port: u16, quota: u64) -> Arc<Neighbor> {
        let id = PeerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let neighbor = Arc::new(Neighbor::new(id, host, port, quota));
        info!(peer = %id, host = %neighbor.host(), port, "neighbor added");
        self.neighbors.write().push(Arc::clone(&neighbor));
        neighbor
    }

    /// Removes a peer. Returns it if it was present.
    pub fn remove(&self, id: PeerId) -> Option<Arc<Neighbor>> {
        let mut neighbors = self.neighbors.write();
        let index = neighbors.iter().position(|n| n.id() == id)?;
        info!(peer = %id, "neighbor removed");
        Some(neighbors.remove(index))
    }

    pub fn get(&self, id: PeerId) -> Option<Arc<Neighbor>> {
        self.neighbors.read().iter().find(|n| n.id() == id).cloned()
    }

    pub fn snapshot(&self) -> Vec<Arc<Neighbor>> {
        self.neighbors.read().clone()
    }

    pub fn len(&self) -> usize {
        self.neighbors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.read().is_empty()
    }

    /// The neighbor a datagram from `source` belongs to, if any.
    pub fn find_origin(&self, source: SocketAddr) -> Option<Arc<Neighbor>> {
        self.neighbors
            .read()
            .iter()
            .find(|n| n.matches_origin(source.ip(), source.port()))
            .cloned()
    }

    /// Re-resolves every neighbor. Returns how many currently have an
    /// address.
    pub fn resolve_all(&self, resolver: &dyn AddressResolver) -> usize {
        self.snapshot()
            .iter()
            .filter_map(|n| n.resolve_address(resolver))
            .count()
    }

    /// Closes the round on every neighbor with the same new quota.
    pub fn advance_round_all(&self, quota: u64) -> Vec<(PeerId, RoundStats)> {
        self.snapshot()
            .iter()
            .map(|n| (n.id(), n.advance_round(quota)))
            .collect()
    }
}
