//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: the gossip subsystems define ports, the
//!   adapters here implement them against a real UDP socket
//! - **Explicit ownership**: the node owns roster, send-log and sender and
//!   hands out `Arc`s; there are no global singletons

pub mod adapters;
pub mod container;

pub use container::{ConfigError, GossipNode, NodeConfig, RunningNode};
