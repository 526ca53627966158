//! # Ports
//!
//! This subsystem exposes plain types, so it only has driven ports.

pub mod outbound;

pub use outbound::AddressResolver;
