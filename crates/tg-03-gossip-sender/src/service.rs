//! # Gossip Sender Service
//!
//! ## Architecture
//!
//! This service implements the inbound port [`GossipSenderApi`] and depends
//! on the outbound ports (implemented by adapters in node-runtime):
//! - [`SendLog`]: which transactions were forwarded and who sent them to us
//! - [`DatagramTransport`]: the UDP socket
//! - [`RoundHook`]: optional round rollover bookkeeping
//!
//! ## Waiting
//!
//! The queue, the parameters and the round start share one mutex with a
//! condvar. The due check, the running check and the wait all happen under
//! that mutex, and every producer notifies while holding it, so a task
//! queued between the check and the wait is never missed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use shared_types::{now_ms, TxHash};
use tg_01_transaction_codec::{encode_packet, Transaction};
use tg_02_neighbor::NeighborRoster;
use tracing::{debug, error, info, warn};

use crate::domain::{
    forward_delay, is_stale, wait_timeout_ms, DispatchOutcome, PendingRequests,
    PropagationTask, SchedulingParams, SenderMetrics, SenderStats,
};
use crate::events::SenderError;
use crate::ports::inbound::GossipSenderApi;
use crate::ports::outbound::{DatagramTransport, RoundHook, SendLog, SendRecord};

struct SchedulerState {
    queue: BinaryHeap<Reverse<PropagationTask>>,
    params: SchedulingParams,
    round_start: u64,
}

/// Gossip Sender Service.
///
/// ## Thread Safety
///
/// Share it through `Arc`. One thread runs [`GossipSender::run`] (see
/// [`GossipSender::spawn`]); everything else may be called concurrently.
pub struct GossipSender<L, T>
where
    L: SendLog,
    T: DatagramTransport,
{
    state: Mutex<SchedulerState>,
    wakeup: Condvar,
    running: AtomicBool,
    requests: Mutex<PendingRequests>,
    roster: Arc<NeighborRoster>,
    send_log: Arc<L>,
    transport: Arc<T>,
    round_hook: Option<Arc<dyn RoundHook>>,
    metrics: SenderMetrics,
}

impl<L, T> GossipSender<L, T>
where
    L: SendLog,
    T: DatagramTransport,
{
    pub fn new(
        params: SchedulingParams,
        roster: Arc<NeighborRoster>,
        send_log: Arc<L>,
        transport: Arc<T>,
    ) -> Result<Self, SenderError> {
        params.validate()?;
        Ok(Self {
            state: Mutex::new(SchedulerState {
                queue: BinaryHeap::new(),
                params,
                round_start: now_ms(),
            }),
            wakeup: Condvar::new(),
            running: AtomicBool::new(true),
            requests: Mutex::new(PendingRequests::new(params.max_pending_requests)),
            roster,
            send_log,
            transport,
            round_hook: None,
            metrics: SenderMetrics::default(),
        })
    }

    /// Installs the callback run on every round rollover.
    pub fn with_round_hook(mut self, hook: Arc<dyn RoundHook>) -> Self {
        self.round_hook = Some(hook);
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn params(&self) -> SchedulingParams {
        self.state.lock().params
    }

    pub fn queue_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn pending_requests(&self) -> usize {
        self.requests.lock().len()
    }

    /// One iteration of the sender loop.
    ///
    /// Dispatches the earliest task if it is due. Otherwise, while running,
    /// blocks until woken or until the task (or, with an empty queue, a full
    /// round) is due. Then checks the round timer.
    pub fn step(&self) -> Option<DispatchOutcome> {
        let due = {
            let mut state = self.state.lock();
            let now = now_ms();
            let next_due = state.queue.peek().map(|Reverse(task)| task.sending_time);
            match next_due {
                Some(at) if at <= now => state.queue.pop().map(|Reverse(task)| task),
                _ => {
                    if self.is_running() {
                        let timeout =
                            wait_timeout_ms(next_due, now, state.params.round_duration_ms);
                        // An early return is a notification or a spurious
                        // wake; either way the caller loops and re-checks.
                        self.wakeup
                            .wait_for(&mut state, Duration::from_millis(timeout));
                    }
                    None
                }
            }
        };

        let outcome = due.map(|task| self.dispatch(&task.transaction));
        self.manage_rounds();
        outcome
    }

    /// Loops [`GossipSender::step`] until terminated.
    pub fn run(&self) {
        info!("gossip sender started");
        while self.is_running() {
            self.step();
        }
        info!(abandoned = self.queue_len(), "gossip sender stopped");
    }

    /// Runs the loop on a dedicated thread.
    pub fn spawn(self: Arc<Self>) -> Result<SenderHandle<L, T>, SenderError>
    where
        L: 'static,
        T: 'static,
    {
        let sender = Arc::clone(&self);
        let thread = thread::Builder::new()
            .name("gossip-sender".into())
            .spawn(move || sender.run())
            .map_err(SenderError::Spawn)?;
        Ok(SenderHandle {
            sender: self,
            thread,
        })
    }

    /// Transmits one due transaction to every neighbor that needs it.
    pub fn dispatch(&self, transaction: &Transaction) -> DispatchOutcome {
        let params = self.params();
        let hash = transaction.hash();

        if is_stale(
            transaction.issuance_timestamp(),
            now_ms(),
            params.timestamp_tolerance_ms,
        ) {
            debug!(tx_hash = %hash, issued = transaction.issuance_timestamp(), "dropping stale transaction");
            let outcome = DispatchOutcome::Stale;
            self.metrics.record_outcome(&outcome);
            return outcome;
        }

        let requested = self.requests.lock().pop().unwrap_or(TxHash::NULL);
        let packet = encode_packet(transaction, &requested);
        let senders = self
            .send_log
            .lookup(hash)
            .map(|record| record.senders)
            .unwrap_or_default();

        let (mut sent, mut skipped, mut failed, mut unresolved) = (0, 0, 0, 0);
        for neighbor in self.roster.snapshot() {
            if senders.contains(&neighbor.id()) {
                skipped += 1;
                continue;
            }
            let Some(address) = neighbor.address() else {
                warn!(peer = %neighbor.id(), host = %neighbor.host(), "neighbor has no resolved address");
                unresolved += 1;
                continue;
            };
            match self.transport.send_to(&packet, address) {
                Ok(()) => sent += 1,
                Err(source) => {
                    let err = SenderError::Transport {
                        peer: neighbor.id(),
                        source,
                    };
                    error!(tx_hash = %hash, %address, error = %err, "failed to send transaction to neighbor");
                    failed += 1;
                }
            }
        }

        debug!(tx_hash = %hash, requested = %requested.short(), sent, skipped, failed, "transaction dispatched");
        let outcome = DispatchOutcome::Delivered {
            sent,
            skipped,
            failed,
            unresolved,
        };
        self.metrics.record_outcome(&outcome);
        outcome
    }

    fn enqueue(&self, transaction: Arc<Transaction>) {
        let mut state = self.state.lock();
        let delay = forward_delay(&state.params, &mut rand::thread_rng());
        debug!(tx_hash = %transaction.hash(), delay_ms = delay, "transaction queued");
        state
            .queue
            .push(Reverse(PropagationTask::new(transaction, now_ms() + delay)));
        self.metrics.record_queued();
        self.wakeup.notify_one();
    }

    fn manage_rounds(&self) {
        let elapsed = {
            let mut state = self.state.lock();
            let now = now_ms();
            if now.saturating_sub(state.round_start) >= state.params.round_duration_ms {
                state.round_start = now;
                true
            } else {
                false
            }
        };
        if elapsed {
            self.metrics.record_round();
            debug!("round elapsed");
            if let Some(hook) = &self.round_hook {
                hook.on_round_elapsed();
            }
        }
    }
}

impl<L, T> GossipSenderApi for GossipSender<L, T>
where
    L: SendLog,
    T: DatagramTransport,
{
    fn on_transaction_accepted(
        &self,
        transaction: Arc<Transaction>,
        is_own_origin: bool,
    ) -> bool {
        let hash = *transaction.hash();
        if is_own_origin {
            self.send_log.mark_sent_if(&hash, &|_: &SendRecord| true);
        } else {
            let neighbors = self.roster.len();
            let claimed = self.send_log.mark_sent_if(&hash, &|record: &SendRecord| {
                !record.was_sent && record.senders.len() < neighbors
            });
            if !claimed {
                debug!(tx_hash = %hash, "already forwarded or fully propagated");
                self.metrics.record_declined();
                return false;
            }
        }
        self.enqueue(transaction);
        true
    }

    fn request_transaction(&self, hash: TxHash) -> bool {
        let queued = self.requests.lock().push(hash);
        if queued {
            debug!(tx_hash = %hash, "transaction requested");
        }
        queued
    }

    fn update_scheduling_parameters(&self, params: SchedulingParams) -> Result<(), SenderError> {
        params.validate()?;
        self.requests.lock().set_capacity(params.max_pending_requests);
        let mut state = self.state.lock();
        state.params = params;
        info!(?params, "scheduling parameters updated");
        self.wakeup.notify_all();
        Ok(())
    }

    fn terminate(&self) {
        self.running.store(false, Ordering::Release);
        let _state = self.state.lock();
        self.wakeup.notify_all();
    }

    fn stats(&self) -> SenderStats {
        self.metrics.snapshot()
    }
}

/// Owner of the sender thread.
pub struct SenderHandle<L, T>
where
    L: SendLog,
    T: DatagramTransport,
{
    sender: Arc<GossipSender<L, T>>,
    thread: JoinHandle<()>,
}

impl<L, T> SenderHandle<L, T>
where
    L: SendLog,
    T: DatagramTransport,
{
    pub fn sender(&self) -> &Arc<GossipSender<L, T>> {
        &self.sender
    }

    /// Terminates the loop and joins the thread.
    pub fn shutdown(self) {
        self.sender.terminate();
        if self.thread.join().is_err() {
            error!("gossip sender thread panicked");
        }
    }
}
