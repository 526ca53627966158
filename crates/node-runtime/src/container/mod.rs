//! # Node Container
//!
//! Owns every subsystem instance and wires them together. Shared state is
//! passed around as `Arc`s; nothing is global except the Prometheus
//! registry.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, GossipConfig, NeighborConfig, NetworkConfig, NodeConfig};
pub use subsystems::{GossipNode, NodeSender, RunningNode};
