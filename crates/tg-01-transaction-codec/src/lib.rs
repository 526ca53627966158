//! # Transaction Codec Subsystem (tg-01)
//!
//! Fixed-width ternary wire format for gossiped transactions.
//!
//! ## Architecture Role
//!
//! ```text
//! [UDP datagram: 1653 bytes]
//!          │ unpack (5 trits / byte)
//!          ↓
//! [packet trits: 8262] ──→ request hash (side channel, last 243 trits)
//!          │
//!          ↓ flags check → field extraction → Curl-P hash
//!     [Transaction]
//! ```
//!
//! A [`Transaction`] is immutable and identified by its content hash. The
//! hash a node asks its neighbors for travels next to it in a
//! [`GossipPacket`] and is never part of the transaction itself.

pub mod domain;

pub use domain::*;
