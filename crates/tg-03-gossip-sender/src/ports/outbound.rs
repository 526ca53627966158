//! Outbound ports (SPI) for the Gossip Sender subsystem.

use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;

use shared_types::{PeerId, TxHash};

/// What the ledger knows about the spread of one transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendRecord {
    /// Whether this node already forwarded it.
    pub was_sent: bool,
    /// Neighbors that sent it to us.
    pub senders: HashSet<PeerId>,
}

/// Per-transaction send-log kept by the ledger.
pub trait SendLog: Send + Sync {
    fn lookup(&self, hash: &TxHash) -> Option<SendRecord>;

    /// Atomically sets `was_sent` if `condition` holds for the current
    /// record. A missing record is evaluated as [`SendRecord::default`] and
    /// created when the condition holds. Returns whether the flag was set.
    fn mark_sent_if(&self, hash: &TxHash, condition: &dyn Fn(&SendRecord) -> bool) -> bool;
}

/// Unreliable datagram transport.
pub trait DatagramTransport: Send + Sync {
    fn send_to(&self, payload: &[u8], destination: SocketAddr) -> io::Result<()>;
}

/// Called by the sender thread each time a round elapses.
pub trait RoundHook: Send + Sync {
    fn on_round_elapsed(&self);
}
