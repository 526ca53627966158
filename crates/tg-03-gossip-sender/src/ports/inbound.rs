//! Inbound ports (API) for the Gossip Sender subsystem.

use std::sync::Arc;

use shared_types::TxHash;
use tg_01_transaction_codec::Transaction;

use crate::domain::{SchedulingParams, SenderStats};
use crate::events::SenderError;

/// Primary API of the sender.
///
/// Every method may be called from any thread while the sender thread runs.
pub trait GossipSenderApi: Send + Sync {
    /// Offers a transaction for forwarding.
    ///
    /// Own transactions are always queued. Received ones are queued only if
    /// the send-log shows them unsent and not yet held by every neighbor;
    /// they are marked sent in the same step. Returns whether a task was
    /// queued.
    fn on_transaction_accepted(&self, transaction: Arc<Transaction>, is_own_origin: bool)
        -> bool;

    /// Asks neighbors for `hash` on a future outgoing packet.
    ///
    /// Returns `false` for the null hash and for hashes already pending.
    fn request_transaction(&self, hash: TxHash) -> bool;

    /// Replaces the scheduling parameters and wakes the sender thread.
    fn update_scheduling_parameters(&self, params: SchedulingParams) -> Result<(), SenderError>;

    /// Stops the sender loop. Queued tasks are abandoned.
    fn terminate(&self);

    fn stats(&self) -> SenderStats;
}
