//! # Domain Layer for the Transaction Codec
//!
//! Pure, synchronous and allocation-light. Nothing here performs I/O.
//!
//! ## Contents
//!
//! - **trits**: balanced-ternary primitives, integer and byte packing
//! - **curl**: the Curl-P sponge used for content hashing
//! - **layout**: field offsets and the flag patterns
//! - **entities**: `Transaction` and `GossipPacket`
//! - **builder**: `TransactionBuilder` for originating records
//! - **errors**: `CodecError`

mod builder;
mod curl;
mod entities;
mod errors;
mod layout;
mod trits;

pub use builder::*;
pub use curl::*;
pub use entities::*;
pub use errors::*;
pub use layout::*;
pub use trits::*;
