//! Codec errors.

use shared_types::TryteError;
use thiserror::Error;

/// Errors raised while building, decoding or validating a transaction.
///
/// A transaction is either fully valid or never constructed; none of these
/// leave a partial record behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A symbolic field holds a non-tryte symbol or exceeds its width.
    #[error("invalid character in {field}: {source}")]
    InvalidCharacter {
        field: &'static str,
        source: TryteError,
    },

    /// The buffer cannot be a transaction (flags, length, non-ternary byte).
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    /// A numeric field does not fit its trit range (or, decoding, `i128`).
    #[error("{field} is outside its representable range")]
    ValueOutOfRange { field: &'static str },
}
