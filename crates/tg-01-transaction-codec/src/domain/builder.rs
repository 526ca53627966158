//! Builder for transactions originated by this node.

use shared_types::{now_ms, pad_right, TxHash};

use super::entities::Transaction;
use super::errors::CodecError;
use super::layout::{Field, TransactionFlags, TRANSACTION_TRITS};
use super::trits::{encode_integer, trits_from_trytes, Trit};

/// Field values for a new transaction.
///
/// Symbolic fields shorter than their slot are right-padded with `9`.
/// Longer or out-of-alphabet input fails in [`TransactionBuilder::build`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    pub signature_fragments: String,
    pub extra_data_digest: String,
    pub address: String,
    pub value: i128,
    pub issuance_timestamp: i64,
    pub timelock_lower_bound: i64,
    pub timelock_upper_bound: i64,
    pub bundle_nonce: String,
    pub flags: TransactionFlags,
    pub trunk_hash: TxHash,
    pub branch_hash: TxHash,
    pub tag: String,
    pub attachment_timestamp: i64,
    pub attachment_timestamp_lower_bound: i64,
    pub attachment_timestamp_upper_bound: i64,
    pub nonce: String,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self {
            signature_fragments: String::new(),
            extra_data_digest: String::new(),
            address: String::new(),
            value: 0,
            issuance_timestamp: now_ms() as i64,
            timelock_lower_bound: 0,
            timelock_upper_bound: 0,
            bundle_nonce: String::new(),
            flags: TransactionFlags::SINGLE,
            trunk_hash: TxHash::NULL,
            branch_hash: TxHash::NULL,
            tag: String::new(),
            attachment_timestamp: 0,
            attachment_timestamp_lower_bound: 0,
            attachment_timestamp_upper_bound: 0,
            nonce: String::new(),
        }
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_value(mut self, value: i128) -> Self {
        self.value = value;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_signature_fragments(mut self, fragments: impl Into<String>) -> Self {
        self.signature_fragments = fragments.into();
        self
    }

    pub fn with_issuance_timestamp(mut self, timestamp: i64) -> Self {
        self.issuance_timestamp = timestamp;
        self
    }

    pub fn with_references(mut self, trunk: TxHash, branch: TxHash) -> Self {
        self.trunk_hash = trunk;
        self.branch_hash = branch;
        self
    }

    /// Encodes the fields and constructs the transaction.
    pub fn build(&self) -> Result<Transaction, CodecError> {
        let mut trits: Vec<Trit> = vec![0; TRANSACTION_TRITS];

        let symbolic = [
            (Field::SIGNATURE_FRAGMENTS, self.signature_fragments.as_str()),
            (Field::EXTRA_DATA_DIGEST, self.extra_data_digest.as_str()),
            (Field::ADDRESS, self.address.as_str()),
            (Field::BUNDLE_NONCE, self.bundle_nonce.as_str()),
            (Field::TRUNK_HASH, self.trunk_hash.as_str()),
            (Field::BRANCH_HASH, self.branch_hash.as_str()),
            (Field::TAG, self.tag.as_str()),
            (Field::NONCE, self.nonce.as_str()),
        ];
        for (field, value) in symbolic {
            write_trytes(&mut trits, field, value)?;
        }

        write_integer(&mut trits, Field::VALUE, self.value)?;
        let timestamps = [
            (Field::ISSUANCE_TIMESTAMP, self.issuance_timestamp),
            (Field::TIMELOCK_LOWER_BOUND, self.timelock_lower_bound),
            (Field::TIMELOCK_UPPER_BOUND, self.timelock_upper_bound),
            (Field::ATTACHMENT_TIMESTAMP, self.attachment_timestamp),
            (
                Field::ATTACHMENT_TIMESTAMP_LOWER_BOUND,
                self.attachment_timestamp_lower_bound,
            ),
            (
                Field::ATTACHMENT_TIMESTAMP_UPPER_BOUND,
                self.attachment_timestamp_upper_bound,
            ),
        ];
        for (field, value) in timestamps {
            write_integer(&mut trits, field, i128::from(value))?;
        }

        self.flags.encode(&mut trits[Field::FLAGS.trit_range()]);
        Transaction::from_trits(trits)
    }
}

fn write_trytes(trits: &mut [Trit], field: Field, value: &str) -> Result<(), CodecError> {
    let invalid = |source| CodecError::InvalidCharacter {
        field: field.name,
        source,
    };
    let padded = pad_right(value, field.tryte_length).map_err(invalid)?;
    let encoded = trits_from_trytes(&padded).map_err(invalid)?;
    trits[field.trit_range()].copy_from_slice(&encoded);
    Ok(())
}

fn write_integer(trits: &mut [Trit], field: Field, value: i128) -> Result<(), CodecError> {
    if encode_integer(value, &mut trits[field.trit_range()]) {
        Ok(())
    } else {
        Err(CodecError::ValueOutOfRange { field: field.name })
    }
}
