//! Fixed field layout of the transaction and packet buffers.

use std::ops::Range;

use super::errors::CodecError;
use super::trits::{Trit, TRITS_PER_BYTE, TRITS_PER_TRYTE};

/// A named, fixed-width region of the transaction buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub tryte_offset: usize,
    pub tryte_length: usize,
}

impl Field {
    const fn new(name: &'static str, tryte_offset: usize, tryte_length: usize) -> Self {
        Self {
            name,
            tryte_offset,
            tryte_length,
        }
    }

    pub const SIGNATURE_FRAGMENTS: Field = Field::new("signature_fragments", 0, 2187);
    pub const EXTRA_DATA_DIGEST: Field = Field::new("extra_data_digest", 2187, 81);
    pub const ADDRESS: Field = Field::new("address", 2268, 81);
    pub const VALUE: Field = Field::new("value", 2349, 27);
    pub const ISSUANCE_TIMESTAMP: Field = Field::new("issuance_timestamp", 2376, 9);
    pub const TIMELOCK_LOWER_BOUND: Field = Field::new("timelock_lower_bound", 2385, 9);
    pub const TIMELOCK_UPPER_BOUND: Field = Field::new("timelock_upper_bound", 2394, 9);
    pub const BUNDLE_NONCE: Field = Field::new("bundle_nonce", 2403, 18);
    pub const FLAGS: Field = Field::new("flags", 2421, 9);
    pub const TRUNK_HASH: Field = Field::new("trunk_hash", 2430, 81);
    pub const BRANCH_HASH: Field = Field::new("branch_hash", 2511, 81);
    pub const TAG: Field = Field::new("tag", 2592, 27);
    pub const ATTACHMENT_TIMESTAMP: Field = Field::new("attachment_timestamp", 2619, 9);
    pub const ATTACHMENT_TIMESTAMP_LOWER_BOUND: Field =
        Field::new("attachment_timestamp_lower_bound", 2628, 9);
    pub const ATTACHMENT_TIMESTAMP_UPPER_BOUND: Field =
        Field::new("attachment_timestamp_upper_bound", 2637, 9);
    pub const NONCE: Field = Field::new("nonce", 2646, 27);
    /// Packet-only: the hash the sender asks its neighbors for.
    pub const REQUEST_HASH: Field = Field::new("request_hash", 2673, 81);

    /// Transaction fields in buffer order.
    pub const TRANSACTION_FIELDS: [Field; 16] = [
        Field::SIGNATURE_FRAGMENTS,
        Field::EXTRA_DATA_DIGEST,
        Field::ADDRESS,
        Field::VALUE,
        Field::ISSUANCE_TIMESTAMP,
        Field::TIMELOCK_LOWER_BOUND,
        Field::TIMELOCK_UPPER_BOUND,
        Field::BUNDLE_NONCE,
        Field::FLAGS,
        Field::TRUNK_HASH,
        Field::BRANCH_HASH,
        Field::TAG,
        Field::ATTACHMENT_TIMESTAMP,
        Field::ATTACHMENT_TIMESTAMP_LOWER_BOUND,
        Field::ATTACHMENT_TIMESTAMP_UPPER_BOUND,
        Field::NONCE,
    ];

    pub const fn tryte_range(&self) -> Range<usize> {
        self.tryte_offset..self.tryte_offset + self.tryte_length
    }

    pub const fn trit_offset(&self) -> usize {
        self.tryte_offset * TRITS_PER_TRYTE
    }

    pub const fn trit_length(&self) -> usize {
        self.tryte_length * TRITS_PER_TRYTE
    }

    pub const fn trit_range(&self) -> Range<usize> {
        self.trit_offset()..self.trit_offset() + self.trit_length()
    }
}

pub const TRANSACTION_TRYTES: usize = 2673;
pub const TRANSACTION_TRITS: usize = TRANSACTION_TRYTES * TRITS_PER_TRYTE;

pub const PACKET_TRYTES: usize = TRANSACTION_TRYTES + 81;
pub const PACKET_TRITS: usize = PACKET_TRYTES * TRITS_PER_TRYTE;

/// Datagram size: 8262 trits packed five per byte (the last byte carries
/// two trits and three zero pads).
pub const PACKET_BYTES: usize = PACKET_TRITS.div_ceil(TRITS_PER_BYTE);

/// Bundle position encoded in the flags field.
///
/// Only the first two trits carry meaning (+1 set, -1 unset). All other
/// flag trits must be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionFlags {
    pub is_bundle_head: bool,
    pub is_bundle_tail: bool,
}

impl TransactionFlags {
    /// A transaction that is a bundle of its own.
    pub const SINGLE: Self = Self {
        is_bundle_head: true,
        is_bundle_tail: true,
    };

    /// Decodes the 27 flag trits.
    pub fn decode(trits: &[Trit]) -> Result<Self, CodecError> {
        let illegal = || {
            CodecError::InvalidStructure(format!(
                "illegal flags pattern {:?}",
                &trits[..trits.len().min(3)]
            ))
        };
        if trits.len() != Field::FLAGS.trit_length() || trits[2..].iter().any(|&t| t != 0) {
            return Err(illegal());
        }
        let flag = |trit: Trit| match trit {
            1 => Some(true),
            -1 => Some(false),
            _ => None,
        };
        match (flag(trits[0]), flag(trits[1])) {
            (Some(is_bundle_head), Some(is_bundle_tail)) => Ok(Self {
                is_bundle_head,
                is_bundle_tail,
            }),
            _ => Err(illegal()),
        }
    }

    /// Writes the flags into a 27-trit slot.
    pub fn encode(&self, out: &mut [Trit]) {
        out.fill(0);
        out[0] = if self.is_bundle_head { 1 } else { -1 };
        out[1] = if self.is_bundle_tail { 1 } else { -1 };
    }
}

impl Default for TransactionFlags {
    fn default() -> Self {
        Self::SINGLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trits::trits_from_trytes;

    #[test]
    fn test_fields_tile_the_transaction() {
        let mut next = 0;
        for field in Field::TRANSACTION_FIELDS {
            assert_eq!(field.tryte_offset, next, "gap before {}", field.name);
            next += field.tryte_length;
        }
        assert_eq!(next, TRANSACTION_TRYTES);
        assert_eq!(Field::REQUEST_HASH.tryte_offset, TRANSACTION_TRYTES);
        assert_eq!(Field::REQUEST_HASH.tryte_range().end, PACKET_TRYTES);
    }

    #[test]
    fn test_packet_sizes() {
        assert_eq!(TRANSACTION_TRITS, 8019);
        assert_eq!(PACKET_TRITS, 8262);
        assert_eq!(PACKET_BYTES, 1653);
    }

    #[test]
    fn test_legal_flag_patterns() {
        let cases = [
            ("D99999999", true, true),
            ("B99999999", false, true),
            ("Y99999999", true, false),
            ("W99999999", false, false),
        ];
        for (trytes, head, tail) in cases {
            let flags = TransactionFlags::decode(&trits_from_trytes(trytes).unwrap()).unwrap();
            assert_eq!(flags.is_bundle_head, head, "{trytes}");
            assert_eq!(flags.is_bundle_tail, tail, "{trytes}");
        }
    }

    #[test]
    fn test_illegal_flag_patterns() {
        for trytes in ["999999999", "A99999999", "N99999999", "D9A999999", "LTLHIBTFY"] {
            let trits = trits_from_trytes(trytes).unwrap();
            assert!(
                matches!(
                    TransactionFlags::decode(&trits),
                    Err(CodecError::InvalidStructure(_))
                ),
                "{trytes}"
            );
        }
    }

    #[test]
    fn test_flags_encode_decode() {
        let flags = TransactionFlags {
            is_bundle_head: false,
            is_bundle_tail: true,
        };
        let mut slot = [7i8; 27];
        flags.encode(&mut slot);
        assert_eq!(TransactionFlags::decode(&slot).unwrap(), flags);
    }
}
