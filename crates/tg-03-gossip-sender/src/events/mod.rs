//! Error types for the Gossip Sender subsystem.

use shared_types::PeerId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SenderError {
    #[error("invalid scheduling parameters: {0}")]
    InvalidParameters(String),

    /// Logged per neighbor inside a dispatch, never returned from it.
    #[error("failed to send to {peer}: {source}")]
    Transport {
        peer: PeerId,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn sender thread: {0}")]
    Spawn(#[source] std::io::Error),
}
