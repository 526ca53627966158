//! # Ports
//!
//! - **Driving Ports (Inbound):** `GossipSenderApi`
//! - **Driven Ports (Outbound):** `SendLog`, `DatagramTransport`, `RoundHook`

pub mod inbound;
pub mod outbound;

pub use inbound::GossipSenderApi;
pub use outbound::{DatagramTransport, RoundHook, SendLog, SendRecord};
