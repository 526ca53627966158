//! # Domain Layer for the Gossip Sender
//!
//! No I/O. Time is passed in as epoch milliseconds.
//!
//! ## Contents
//!
//! - **entities**: `PropagationTask`
//! - **pending**: `PendingRequests`, the FIFO of hashes to ask neighbors for
//! - **value_objects**: `SchedulingParams`, `DispatchOutcome`, metrics
//! - **services**: forward delay and staleness rules

mod entities;
mod pending;
mod services;
mod value_objects;

pub use entities::*;
pub use pending::*;
pub use services::*;
pub use value_objects::*;
