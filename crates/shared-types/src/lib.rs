//! # Shared Types Crate
//!
//! Types every gossip subsystem agrees on: the tryte alphabet, the 81-tryte
//! transaction identifier, peer identifiers and the epoch clock.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the alphabet and identifier types live here
//!   and nowhere else.
//! - **Validated on construction**: a `TxHash` can only hold 81 valid trytes.

pub mod entities;
pub mod errors;
pub mod trytes;

pub use entities::*;
pub use errors::*;
pub use trytes::{is_tryte, pad_right, random_trytes, validate_trytes, NULL_TRYTE, TRYTE_ALPHABET};
