//! # Error Types
//!
//! Errors raised while validating symbolic (tryte) input.

use thiserror::Error;

/// Errors produced when a string is checked against the tryte alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TryteError {
    /// A symbol outside `9A-Z`.
    #[error("invalid tryte {found:?} at position {position}")]
    InvalidCharacter { position: usize, found: char },

    /// The value does not fit its fixed-width field.
    #[error("{length} trytes exceed the field width of {max}")]
    TooLong { length: usize, max: usize },

    /// The value must have an exact length (hashes).
    #[error("expected exactly {expected} trytes, got {length}")]
    WrongLength { length: usize, expected: usize },
}
