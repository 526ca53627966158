//! # Neighbor Subsystem (tg-02)
//!
//! The peers this node gossips with, and the per-round accounting used to
//! rate-limit their inbound traffic.
//!
//! ## Architecture Role
//!
//! ```text
//! [UDP datagram] ──source addr──→ [NeighborRoster::find_origin]
//!                                          │
//!                                          ↓ record_inbound_* / record_invalid
//!                                     [Neighbor] ──quota_exceeded?──→ drop
//!                                          ↑
//! [round timer] ──advance_round_all(quota)─┘
//! ```
//!
//! Counters are guarded per neighbor. Two peers never contend on the same
//! lock, and a round rollover on one peer never blocks another.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::DnsResolver;
pub use domain::*;
pub use ports::outbound::AddressResolver;
