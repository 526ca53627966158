//! # Gossip Sender Subsystem (tg-03)
//!
//! Forwards accepted transactions to the neighbors that still need them.
//!
//! ## Architecture Role
//!
//! ```text
//! [inbound adapter] ──on_transaction_accepted──→ [GossipSender]
//!                   ──request_transaction──────→      │ min-heap by sending time
//!                                                     ↓ due?
//!                                        stale? ─yes→ drop
//!                                                     │ pop pending request
//!                                                     ↓ encode_packet
//!                                     ┌───────────────┼───────────────┐
//!                                     ↓               ↓               ↓
//!                                [Neighbor A]    [Neighbor B]   (skipped: known sender)
//! ```
//!
//! ## Scheduling
//!
//! Every forwarded transaction waits a random delay drawn from
//! `[min_forward_delay_ms, max_forward_delay_ms]` so that nodes receiving the
//! same transaction do not relay it in lockstep. Which neighbors to skip is
//! decided at dispatch time against the send-log, so a sender recorded while
//! the task waited is still honored.
//!
//! A single dedicated thread removes tasks; any thread may add them.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::*;
pub use events::SenderError;
pub use ports::inbound::GossipSenderApi;
pub use ports::outbound::{DatagramTransport, RoundHook, SendLog, SendRecord};
pub use service::{GossipSender, SenderHandle};
