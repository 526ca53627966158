//! # Adapter Implementations
//!
//! Concrete implementations of the gossip sender's ports, plus the inbound
//! side that feeds it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  OUTER LAYER (Adapters)                      │
//! │  UdpTransport, InMemorySendLog, NeighborRoundHook,           │
//! │  InboundAdapter + receive loop                               │
//! └──────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌──────────────────────────────────────────────────────────────┐
//! │  DatagramTransport, SendLog, RoundHook  (tg-03 ports)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod inbound;
pub mod round_hook;
pub mod send_log;
pub mod udp;

pub use inbound::{spawn_receive_loop, InboundAdapter, InboundOutcome, ReceiverHandle};
pub use round_hook::NeighborRoundHook;
pub use send_log::{InMemorySendLog, DEFAULT_SEND_LOG_CAPACITY};
pub use udp::UdpTransport;
