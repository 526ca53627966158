//! # Inbound Adapter
//!
//! Turns datagrams read from the gossip socket into calls on the sender's
//! inbound port.
//!
//! ```text
//! datagram ─→ find_origin ─no──→ UnknownOrigin
//!                 │
//!            quota exceeded ─yes→ Ignored
//!                 │
//!              decode ─err──→ Invalid
//!                 │
//!          record sender ─known→ Known
//!                 │
//!     request unknown trunk/branch
//!                 │
//!       on_transaction_accepted ─→ New
//! ```

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use gossip_telemetry::{log_event, log_peer_event, log_tx_event, metric_inc, INBOUND_DATAGRAMS};
use tg_01_transaction_codec::{GossipPacket, PACKET_BYTES};
use tg_02_neighbor::NeighborRoster;
use tg_03_gossip_sender::GossipSenderApi;
use tracing::{debug, error, info};

use super::send_log::InMemorySendLog;

/// How long a blocked read waits before re-checking the running flag.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// What became of one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Source matches no neighbor.
    UnknownOrigin,
    /// The neighbor already used up this round's quota.
    Ignored,
    Invalid,
    /// Seen before; the neighbor was added to the sender set.
    Known,
    /// First sighting; handed to the sender.
    New,
}

impl InboundOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnknownOrigin => "unknown_origin",
            Self::Ignored => "ignored",
            Self::Invalid => "invalid",
            Self::Known => "known",
            Self::New => "new",
        }
    }
}

pub struct InboundAdapter {
    roster: Arc<NeighborRoster>,
    send_log: Arc<InMemorySendLog>,
    sender: Arc<dyn GossipSenderApi>,
}

impl InboundAdapter {
    pub fn new(
        roster: Arc<NeighborRoster>,
        send_log: Arc<InMemorySendLog>,
        sender: Arc<dyn GossipSenderApi>,
    ) -> Self {
        Self {
            roster,
            send_log,
            sender,
        }
    }

    pub fn handle_datagram(&self, payload: &[u8], source: SocketAddr) -> InboundOutcome {
        let outcome = self.process(payload, source);
        metric_inc!(INBOUND_DATAGRAMS, &[outcome.label()]);
        outcome
    }

    fn process(&self, payload: &[u8], source: SocketAddr) -> InboundOutcome {
        let Some(neighbor) = self.roster.find_origin(source) else {
            debug!(%source, "datagram from unknown origin");
            return InboundOutcome::UnknownOrigin;
        };

        if neighbor.quota_exceeded() {
            neighbor.record_ignored();
            return InboundOutcome::Ignored;
        }
        neighbor.record_inbound_all();

        let packet = match GossipPacket::decode(payload) {
            Ok(packet) => packet,
            Err(e) => {
                neighbor.record_invalid();
                log_peer_event!(debug, "inbound", "invalid datagram", neighbor.id(), error = %e);
                return InboundOutcome::Invalid;
            }
        };

        if !packet.requested.is_null() {
            neighbor.record_requested();
        }

        let transaction = Arc::new(packet.transaction);
        let hash = *transaction.hash();
        if !self.send_log.record_sender(&hash, neighbor.id()) {
            return InboundOutcome::Known;
        }
        neighbor.record_inbound_new();
        log_tx_event!(debug, "inbound", "new transaction", hash, peer = %neighbor.id());

        for reference in [transaction.trunk_hash(), transaction.branch_hash()] {
            if !reference.is_null() && !self.send_log.is_known(reference) {
                self.sender.request_transaction(*reference);
            }
        }

        self.sender.on_transaction_accepted(transaction, false);
        InboundOutcome::New
    }
}

/// Owner of the receive thread.
pub struct ReceiverHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl ReceiverHandle {
    /// Stops the loop and joins the thread. Returns within one read timeout.
    pub fn shutdown(self) {
        self.running.store(false, Ordering::Release);
        if self.thread.join().is_err() {
            error!("receive thread panicked");
        }
    }
}

/// Reads `socket` on a dedicated thread and feeds every datagram to
/// `adapter`.
pub fn spawn_receive_loop(
    socket: Arc<UdpSocket>,
    adapter: Arc<InboundAdapter>,
) -> io::Result<ReceiverHandle> {
    socket.set_read_timeout(Some(READ_TIMEOUT))?;
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);

    let thread = thread::Builder::new()
        .name("gossip-receiver".into())
        .spawn(move || {
            info!("gossip receiver started");
            // One spare byte so oversized datagrams fail length validation.
            let mut buffer = vec![0u8; PACKET_BYTES + 1];
            while flag.load(Ordering::Acquire) {
                match socket.recv_from(&mut buffer) {
                    Ok((len, source)) => {
                        adapter.handle_datagram(&buffer[..len], source);
                    }
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                        ) => {}
                    Err(e) => log_event!(
                        error,
                        "receiver",
                        "failed to read from gossip socket",
                        error = %e
                    ),
                }
            }
            info!("gossip receiver stopped");
        })?;

    Ok(ReceiverHandle { running, thread })
}
