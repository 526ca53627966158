//! # Tryte Alphabet
//!
//! Every symbolic field is written in a 27-symbol alphabet. Each symbol
//! (tryte) stands for three balanced trits: `9` is zero, `A`..`M` are
//! 1..13 and `N`..`Z` are -13..-1.

use rand::Rng;

use crate::errors::TryteError;

/// The alphabet in tryte-value order starting at zero.
pub const TRYTE_ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The null symbol used for padding.
pub const NULL_TRYTE: char = '9';

/// Returns `true` if `c` belongs to the tryte alphabet.
pub fn is_tryte(c: char) -> bool {
    c == NULL_TRYTE || c.is_ascii_uppercase()
}

/// Checks that every symbol of `trytes` is in the alphabet.
pub fn validate_trytes(trytes: &str) -> Result<(), TryteError> {
    match trytes.char_indices().find(|(_, c)| !is_tryte(*c)) {
        Some((position, found)) => Err(TryteError::InvalidCharacter { position, found }),
        None => Ok(()),
    }
}

/// Validates `trytes` and right-pads it with [`NULL_TRYTE`] to `width`.
///
/// Longer input is rejected rather than truncated.
pub fn pad_right(trytes: &str, width: usize) -> Result<String, TryteError> {
    validate_trytes(trytes)?;
    if trytes.len() > width {
        return Err(TryteError::TooLong {
            length: trytes.len(),
            max: width,
        });
    }
    let mut padded = String::with_capacity(width);
    padded.push_str(trytes);
    padded.extend(std::iter::repeat(NULL_TRYTE).take(width - trytes.len()));
    Ok(padded)
}

/// Uniformly random tryte sequence of the given length.
pub fn random_trytes(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| TRYTE_ALPHABET[rng.gen_range(0..TRYTE_ALPHABET.len())] as char)
        .collect()
}
