//! Balanced-ternary primitives.
//!
//! All multi-trit quantities are little-endian: trit `i` weighs `3^i`.

use shared_types::{validate_trytes, TryteError, TRYTE_ALPHABET};

/// A balanced ternary digit: -1, 0 or 1.
pub type Trit = i8;

pub const TRITS_PER_TRYTE: usize = 3;

/// Five trits (243 states) fit one byte.
pub const TRITS_PER_BYTE: usize = 5;

/// Largest magnitude a packed byte may hold: (3^5 - 1) / 2.
const MAX_PACKED_BYTE: i16 = 121;

/// Numeric value of a tryte symbol, `None` outside the alphabet.
pub fn tryte_value(symbol: u8) -> Option<i8> {
    match symbol {
        b'9' => Some(0),
        b'A'..=b'M' => Some((symbol - b'A') as i8 + 1),
        b'N'..=b'Z' => Some((symbol - b'N') as i8 - 13),
        _ => None,
    }
}

/// The three trits of a tryte symbol. Non-tryte input yields zeros, so
/// callers validate first.
fn tryte_trits(symbol: u8) -> [Trit; TRITS_PER_TRYTE] {
    let mut trits = [0; TRITS_PER_TRYTE];
    if let Some(value) = tryte_value(symbol) {
        encode_integer(i128::from(value), &mut trits);
    }
    trits
}

/// Appends the trits of already-validated trytes to `out`.
pub(crate) fn extend_with_trytes(out: &mut Vec<Trit>, trytes: &str) {
    for symbol in trytes.bytes() {
        out.extend_from_slice(&tryte_trits(symbol));
    }
}

/// Converts a tryte string to trits, rejecting foreign symbols.
pub fn trits_from_trytes(trytes: &str) -> Result<Vec<Trit>, TryteError> {
    validate_trytes(trytes)?;
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    extend_with_trytes(&mut trits, trytes);
    Ok(trits)
}

/// Renders trits as trytes. Trailing trits short of a full tryte are
/// ignored.
pub fn trytes_from_trits(trits: &[Trit]) -> String {
    trits
        .chunks_exact(TRITS_PER_TRYTE)
        .map(|chunk| {
            let value = chunk[0] + 3 * chunk[1] + 9 * chunk[2];
            let index = if value < 0 { value + 27 } else { value };
            TRYTE_ALPHABET[index as usize] as char
        })
        .collect()
}

/// Writes `value` into `out` in balanced ternary.
///
/// Returns `false` when `out` is too narrow; its contents are then
/// unspecified. Works on the magnitude so `i128::MIN` is representable.
pub fn encode_integer(value: i128, out: &mut [Trit]) -> bool {
    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    for slot in out.iter_mut() {
        let remainder = (magnitude % 3) as Trit;
        magnitude /= 3;
        let trit = if remainder == 2 {
            magnitude += 1;
            -1
        } else {
            remainder
        };
        *slot = if negative { -trit } else { trit };
    }
    magnitude == 0
}

/// Reads a balanced-ternary integer, `None` if it overflows `i128`.
///
/// Sums from the least significant trit; every partial sum stays inside the
/// range of the final value, so `i128::MIN` decodes.
pub fn decode_integer(trits: &[Trit]) -> Option<i128> {
    trits
        .iter()
        .enumerate()
        .filter(|(_, &trit)| trit != 0)
        .try_fold(0i128, |acc, (position, &trit)| {
            let weight = 3i128.checked_pow(u32::try_from(position).ok()?)?;
            acc.checked_add(weight.checked_mul(i128::from(trit))?)
        })
}

/// Packs trits five to a byte. The final group is zero-extended.
pub fn pack_trits(trits: &[Trit]) -> Vec<u8> {
    trits
        .chunks(TRITS_PER_BYTE)
        .map(|group| {
            let value = group.iter().rev().fold(0i8, |acc, &trit| acc * 3 + trit);
            value as u8
        })
        .collect()
}

/// Unpacks bytes into `trit_count` trits.
///
/// On failure returns the offset of the first byte outside the packed
/// range (-121..=121).
pub fn unpack_trits(bytes: &[u8], trit_count: usize) -> Result<Vec<Trit>, usize> {
    let mut trits = Vec::with_capacity(bytes.len() * TRITS_PER_BYTE);
    for (offset, &byte) in bytes.iter().enumerate() {
        let mut rest = i16::from(byte as i8);
        if !(-MAX_PACKED_BYTE..=MAX_PACKED_BYTE).contains(&rest) {
            return Err(offset);
        }
        for _ in 0..TRITS_PER_BYTE {
            let trit = match rest.rem_euclid(3) {
                2 => -1,
                r => r,
            };
            trits.push(trit as Trit);
            rest = (rest - trit) / 3;
        }
    }
    trits.truncate(trit_count);
    Ok(trits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryte_values() {
        assert_eq!(tryte_value(b'9'), Some(0));
        assert_eq!(tryte_value(b'A'), Some(1));
        assert_eq!(tryte_value(b'M'), Some(13));
        assert_eq!(tryte_value(b'N'), Some(-13));
        assert_eq!(tryte_value(b'Z'), Some(-1));
        assert_eq!(tryte_value(b'a'), None);
    }

    #[test]
    fn test_tryte_trit_mapping() {
        assert_eq!(trits_from_trytes("B").unwrap(), vec![-1, 1, 0]);
        assert_eq!(trits_from_trytes("N").unwrap(), vec![-1, -1, -1]);
        assert_eq!(trits_from_trytes("9Z").unwrap(), vec![0, 0, 0, -1, 0, 0]);
    }

    #[test]
    fn test_every_symbol_survives_trit_conversion() {
        let alphabet = std::str::from_utf8(TRYTE_ALPHABET).unwrap();
        let trits = trits_from_trytes(alphabet).unwrap();
        assert_eq!(trytes_from_trits(&trits), alphabet);
    }

    #[test]
    fn test_trits_from_trytes_rejects_lowercase() {
        assert!(trits_from_trytes("ABc").is_err());
    }

    #[test]
    fn test_integer_known_values() {
        let mut trits = [0; 9];
        assert!(encode_integer(-2, &mut trits));
        assert_eq!(trytes_from_trits(&trits), "Y99");
        assert!(encode_integer(1_545_102_726_377, &mut [0; 27]));
        assert_eq!(
            decode_integer(&trits_from_trytes("WXAJWESME").unwrap()),
            Some(1_545_102_726_377)
        );
    }

    #[test]
    fn test_integer_extremes() {
        let mut trits = [0; 81];
        assert!(encode_integer(i128::MIN, &mut trits));
        assert_eq!(decode_integer(&trits), Some(i128::MIN));
        assert!(encode_integer(i128::MAX, &mut trits));
        assert_eq!(decode_integer(&trits), Some(i128::MAX));
        assert!(encode_integer(i128::MIN + 1, &mut trits));
        assert_eq!(decode_integer(&trits), Some(i128::MIN + 1));
    }

    #[test]
    fn test_wide_buffer_decodes_when_high_trits_are_zero() {
        let mut trits = [0; 90];
        assert!(encode_integer(i128::MIN, &mut trits));
        assert_eq!(decode_integer(&trits), Some(i128::MIN));
        trits[81] = 1;
        assert_eq!(decode_integer(&trits), None);
    }

    #[test]
    fn test_integer_overflow_detected() {
        // (3^3 - 1) / 2 = 13 is the largest 3-trit magnitude
        assert!(encode_integer(13, &mut [0; 3]));
        assert!(!encode_integer(14, &mut [0; 3]));
        assert!(!encode_integer(-14, &mut [0; 3]));
        assert_eq!(decode_integer(&[1; 81]), None);
    }

    #[test]
    fn test_pack_unpack() {
        let trits: Vec<Trit> = vec![1, -1, 0, 1, 1, -1, -1, 0];
        let bytes = pack_trits(&trits);
        assert_eq!(bytes.len(), 2);
        assert_eq!(unpack_trits(&bytes, trits.len()).unwrap(), trits);
    }

    #[test]
    fn test_pack_extreme_groups() {
        assert_eq!(pack_trits(&[1; 5]), vec![121u8]);
        assert_eq!(pack_trits(&[-1; 5]), vec![(-121i8) as u8]);
    }

    #[test]
    fn test_unpack_rejects_out_of_range_byte() {
        assert_eq!(unpack_trits(&[0, 122], 10), Err(1));
        assert_eq!(unpack_trits(&[(-122i8) as u8], 5), Err(0));
    }
}
