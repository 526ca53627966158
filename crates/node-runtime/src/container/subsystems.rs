//! # Gossip Node
//!
//! Holds the subsystem instances and manages their lifecycle.
//!
//! ## Initialization Order
//!
//! ```text
//! 1. bind UDP socket            (UdpTransport)
//! 2. register + resolve peers   (tg-02 NeighborRoster)
//! 3. send-log                   (InMemorySendLog)
//! 4. sender + round hook        (tg-03 GossipSender, NeighborRoundHook)
//! 5. inbound adapter            (feeds the sender)
//! ```
//!
//! Threads are only started by [`GossipNode::start`].

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use gossip_telemetry::{
    sync_counter, NEIGHBORS_RESOLVED, PACKETS_SENT, PENDING_REQUESTS, QUEUE_DEPTH, ROUNDS,
    SEND_FAILURES, TX_DECLINED, TX_DISPATCHED, TX_QUEUED,
};
use shared_types::TxHash;
use tg_01_transaction_codec::Transaction;
use tg_02_neighbor::{DnsResolver, NeighborRoster};
use tg_03_gossip_sender::{GossipSender, GossipSenderApi, SenderHandle};
use tracing::{info, instrument};

use crate::adapters::{
    spawn_receive_loop, InMemorySendLog, InboundAdapter, NeighborRoundHook, ReceiverHandle,
    UdpTransport,
};
use crate::container::config::NodeConfig;

/// Concrete sender type used by the node.
pub type NodeSender = GossipSender<InMemorySendLog, UdpTransport>;

pub struct GossipNode {
    config: NodeConfig,
    roster: Arc<NeighborRoster>,
    send_log: Arc<InMemorySendLog>,
    transport: Arc<UdpTransport>,
    sender: Arc<NodeSender>,
    inbound: Arc<InboundAdapter>,
    round_hook: Option<Arc<NeighborRoundHook>>,
}

impl GossipNode {
    #[instrument(skip_all, fields(bind = %config.bind_address()))]
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let transport = Arc::new(
            UdpTransport::bind(config.bind_address())
                .with_context(|| format!("cannot bind gossip socket {}", config.bind_address()))?,
        );

        let quota = config.gossip.max_tx_per_round;
        let roster = Arc::new(NeighborRoster::new());
        for neighbor in &config.neighbors {
            roster.add(neighbor.host.clone(), neighbor.port, quota);
        }
        let resolved = roster.resolve_all(&DnsResolver);
        NEIGHBORS_RESOLVED.set(resolved as i64);

        let send_log = Arc::new(InMemorySendLog::new());

        let mut sender = GossipSender::new(
            config.scheduling_params(),
            Arc::clone(&roster),
            Arc::clone(&send_log),
            Arc::clone(&transport),
        )
        .context("cannot create gossip sender")?;

        let round_hook = config
            .gossip
            .cascade_rounds
            .then(|| Arc::new(NeighborRoundHook::new(Arc::clone(&roster), quota)));
        if let Some(hook) = &round_hook {
            sender = sender.with_round_hook(Arc::clone(hook) as _);
        }
        let sender = Arc::new(sender);

        let inbound = Arc::new(InboundAdapter::new(
            Arc::clone(&roster),
            Arc::clone(&send_log),
            Arc::clone(&sender) as Arc<dyn GossipSenderApi>,
        ));

        info!(
            local = ?transport.local_addr().ok(),
            neighbors = roster.len(),
            resolved,
            "gossip node initialized"
        );

        Ok(Self {
            config,
            roster,
            send_log,
            transport,
            sender,
            inbound,
            round_hook,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn roster(&self) -> &Arc<NeighborRoster> {
        &self.roster
    }

    pub fn send_log(&self) -> &Arc<InMemorySendLog> {
        &self.send_log
    }

    pub fn sender(&self) -> &Arc<NodeSender> {
        &self.sender
    }

    pub fn inbound(&self) -> &Arc<InboundAdapter> {
        &self.inbound
    }

    /// Queues a transaction created by this node for every neighbor.
    pub fn broadcast(&self, transaction: Transaction) -> TxHash {
        let hash = *transaction.hash();
        self.sender
            .on_transaction_accepted(Arc::new(transaction), true);
        hash
    }

    /// Changes the per-round inbound quota from the next rollover on.
    pub fn set_round_quota(&self, quota: u64) {
        if let Some(hook) = &self.round_hook {
            hook.set_quota(quota);
        }
    }

    /// Applies the gossip section of a freshly loaded configuration.
    ///
    /// Scheduling parameters and the round quota take effect without a
    /// restart; network and neighbor changes do not. Returns whether
    /// anything changed.
    pub fn reload(&self, config: &NodeConfig) -> Result<bool> {
        config.validate().context("invalid configuration")?;
        let mut changed = false;

        let params = config.scheduling_params();
        if params != self.sender.params() {
            self.sender
                .update_scheduling_parameters(params)
                .context("cannot update scheduling parameters")?;
            changed = true;
        }

        if let Some(hook) = &self.round_hook {
            let quota = config.gossip.max_tx_per_round;
            if hook.quota() != quota {
                hook.set_quota(quota);
                info!(quota, "round quota updated");
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Re-resolves every neighbor's host.
    pub fn refresh_addresses(&self) -> usize {
        let resolved = self.roster.resolve_all(&DnsResolver);
        NEIGHBORS_RESOLVED.set(resolved as i64);
        resolved
    }

    /// Copies the sender's running totals into the Prometheus registry.
    pub fn publish_metrics(&self) {
        let stats = self.sender.stats();
        sync_counter(&TX_QUEUED, stats.queued);
        sync_counter(&TX_DECLINED, stats.declined);
        sync_counter(
            &TX_DISPATCHED.with_label_values(&["delivered"]),
            stats.dispatched.saturating_sub(stats.stale),
        );
        sync_counter(&TX_DISPATCHED.with_label_values(&["stale"]), stats.stale);
        sync_counter(&PACKETS_SENT, stats.packets_sent);
        sync_counter(&SEND_FAILURES, stats.send_failures);
        sync_counter(&ROUNDS, stats.rounds);
        PENDING_REQUESTS.set(self.sender.pending_requests() as i64);
        QUEUE_DEPTH.set(self.sender.queue_len() as i64);
    }

    /// Starts the sender and receive threads.
    pub fn start(&self) -> Result<RunningNode> {
        let sender = Arc::clone(&self.sender)
            .spawn()
            .context("cannot start gossip sender")?;
        let receiver = match spawn_receive_loop(
            Arc::clone(self.transport.socket()),
            Arc::clone(&self.inbound),
        ) {
            Ok(receiver) => receiver,
            Err(e) => {
                sender.shutdown();
                return Err(e).context("cannot start gossip receiver");
            }
        };
        info!("gossip node started");
        Ok(RunningNode { sender, receiver })
    }
}

/// Threads of a started node.
pub struct RunningNode {
    sender: SenderHandle<InMemorySendLog, UdpTransport>,
    receiver: ReceiverHandle,
}

impl RunningNode {
    /// Stops receiving first, then the sender. Queued tasks are abandoned.
    pub fn shutdown(self) {
        self.receiver.shutdown();
        self.sender.shutdown();
        info!("gossip node stopped");
    }
}
