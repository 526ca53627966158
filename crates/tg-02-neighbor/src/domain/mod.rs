//! # Domain Layer
//!
//! - **entities**: `Neighbor` and its `RoundStats`
//! - **roster**: `NeighborRoster`, the runtime-mutable peer set

mod entities;
mod roster;

pub use entities::*;
pub use roster::*;
