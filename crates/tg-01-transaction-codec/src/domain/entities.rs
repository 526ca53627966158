//! # Transaction and Gossip Packet
//!
//! A [`Transaction`] owns its 8019 encoded trits. Every typed field is
//! extracted once at construction and the content hash is cached, so the
//! record is fully validated or never exists.

use std::fmt;
use std::hash::{Hash, Hasher};

use shared_types::{validate_trytes, TryteError, TxHash};

use super::curl::{hash_trits, HASH_LENGTH, TRANSACTION_HASH_ROUNDS};
use super::errors::CodecError;
use super::layout::{
    Field, TransactionFlags, PACKET_BYTES, PACKET_TRITS, PACKET_TRYTES, TRANSACTION_TRITS,
    TRANSACTION_TRYTES,
};
use super::trits::{
    decode_integer, extend_with_trytes, pack_trits, trytes_from_trits, unpack_trits, Trit,
};

/// An immutable, content-addressed ledger record.
#[derive(Clone)]
pub struct Transaction {
    hash: TxHash,
    trits: Vec<Trit>,
    flags: TransactionFlags,
    address: String,
    value: i128,
    issuance_timestamp: i64,
    timelock_lower_bound: i64,
    timelock_upper_bound: i64,
    trunk_hash: TxHash,
    branch_hash: TxHash,
    tag: String,
    attachment_timestamp: i64,
    attachment_timestamp_lower_bound: i64,
    attachment_timestamp_upper_bound: i64,
}

impl Transaction {
    /// Decodes a datagram, discarding the request hash it carries.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        GossipPacket::decode(bytes).map(|packet| packet.transaction)
    }

    /// Parses a transaction from 2673 trytes, or from a full 2754-tryte
    /// packet whose request region is then ignored.
    pub fn from_trytes(trytes: &str) -> Result<Self, CodecError> {
        if trytes.len() != TRANSACTION_TRYTES && trytes.len() != PACKET_TRYTES {
            return Err(CodecError::InvalidStructure(format!(
                "expected {TRANSACTION_TRYTES} or {PACKET_TRYTES} trytes, got {}",
                trytes.len()
            )));
        }
        validate_located(trytes)?;
        let mut trits = Vec::with_capacity(TRANSACTION_TRITS);
        extend_with_trytes(&mut trits, &trytes[..TRANSACTION_TRYTES]);
        Self::from_trits(trits)
    }

    /// Builds a transaction from its encoded trits.
    ///
    /// The flags are checked before any other field is read.
    pub fn from_trits(trits: Vec<Trit>) -> Result<Self, CodecError> {
        if trits.len() != TRANSACTION_TRITS {
            return Err(CodecError::InvalidStructure(format!(
                "expected {TRANSACTION_TRITS} trits, got {}",
                trits.len()
            )));
        }
        if let Some(position) = trits.iter().position(|t| !(-1..=1).contains(t)) {
            return Err(CodecError::InvalidStructure(format!(
                "trit {position} is not balanced ternary"
            )));
        }

        let flags = TransactionFlags::decode(&trits[Field::FLAGS.trit_range()])?;
        let hash = content_hash(&trits);

        Ok(Self {
            hash,
            flags,
            address: trytes_from_trits(&trits[Field::ADDRESS.trit_range()]),
            value: read_integer(&trits, Field::VALUE)?,
            issuance_timestamp: read_timestamp(&trits, Field::ISSUANCE_TIMESTAMP)?,
            timelock_lower_bound: read_timestamp(&trits, Field::TIMELOCK_LOWER_BOUND)?,
            timelock_upper_bound: read_timestamp(&trits, Field::TIMELOCK_UPPER_BOUND)?,
            trunk_hash: read_hash(&trits, Field::TRUNK_HASH)?,
            branch_hash: read_hash(&trits, Field::BRANCH_HASH)?,
            tag: trytes_from_trits(&trits[Field::TAG.trit_range()]),
            attachment_timestamp: read_timestamp(&trits, Field::ATTACHMENT_TIMESTAMP)?,
            attachment_timestamp_lower_bound: read_timestamp(
                &trits,
                Field::ATTACHMENT_TIMESTAMP_LOWER_BOUND,
            )?,
            attachment_timestamp_upper_bound: read_timestamp(
                &trits,
                Field::ATTACHMENT_TIMESTAMP_UPPER_BOUND,
            )?,
            trits,
        })
    }

    /// Encodes a datagram with a null request region.
    pub fn encode(&self) -> Vec<u8> {
        encode_packet(self, &TxHash::NULL)
    }

    /// The 2673-tryte rendering of the transaction body.
    pub fn to_trytes(&self) -> String {
        trytes_from_trits(&self.trits)
    }

    /// The trytes of any transaction field.
    pub fn field_trytes(&self, field: Field) -> String {
        trytes_from_trits(&self.trits[field.trit_range()])
    }

    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    pub fn trits(&self) -> &[Trit] {
        &self.trits
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn value(&self) -> i128 {
        self.value
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn issuance_timestamp(&self) -> i64 {
        self.issuance_timestamp
    }

    pub fn attachment_timestamp(&self) -> i64 {
        self.attachment_timestamp
    }

    pub fn attachment_timestamp_lower_bound(&self) -> i64 {
        self.attachment_timestamp_lower_bound
    }

    pub fn attachment_timestamp_upper_bound(&self) -> i64 {
        self.attachment_timestamp_upper_bound
    }

    pub fn timelock_lower_bound(&self) -> i64 {
        self.timelock_lower_bound
    }

    pub fn timelock_upper_bound(&self) -> i64 {
        self.timelock_upper_bound
    }

    pub fn trunk_hash(&self) -> &TxHash {
        &self.trunk_hash
    }

    pub fn branch_hash(&self) -> &TxHash {
        &self.branch_hash
    }

    pub fn flags(&self) -> TransactionFlags {
        self.flags
    }

    pub fn is_bundle_head(&self) -> bool {
        self.flags.is_bundle_head
    }

    pub fn is_bundle_tail(&self) -> bool {
        self.flags.is_bundle_tail
    }

    pub fn signature_fragments(&self) -> String {
        self.field_trytes(Field::SIGNATURE_FRAGMENTS)
    }

    pub fn extra_data_digest(&self) -> String {
        self.field_trytes(Field::EXTRA_DATA_DIGEST)
    }

    pub fn bundle_nonce(&self) -> String {
        self.field_trytes(Field::BUNDLE_NONCE)
    }

    pub fn nonce(&self) -> String {
        self.field_trytes(Field::NONCE)
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("hash", &self.hash)
            .field("address", &&self.address[..10])
            .field("value", &self.value)
            .field("tag", &self.tag)
            .field("issuance_timestamp", &self.issuance_timestamp)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// A decoded datagram: the transaction plus the hash its sender wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GossipPacket {
    pub transaction: Transaction,
    pub requested: TxHash,
}

impl GossipPacket {
    /// Decodes a 1653-byte datagram.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != PACKET_BYTES {
            return Err(CodecError::InvalidStructure(format!(
                "expected {PACKET_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let mut trits = unpack_trits(bytes, PACKET_TRITS).map_err(|offset| {
            CodecError::InvalidStructure(format!("byte {offset} is not a packed trit group"))
        })?;
        let request = trits.split_off(TRANSACTION_TRITS);
        let transaction = Transaction::from_trits(trits)?;
        Ok(Self {
            transaction,
            requested: hash_from_trits(&request, Field::REQUEST_HASH.name)?,
        })
    }

    /// Parses a 2754-tryte packet.
    pub fn from_trytes(trytes: &str) -> Result<Self, CodecError> {
        if trytes.len() != PACKET_TRYTES {
            return Err(CodecError::InvalidStructure(format!(
                "expected {PACKET_TRYTES} trytes, got {}",
                trytes.len()
            )));
        }
        let transaction = Transaction::from_trytes(trytes)?;
        let requested = TxHash::from_trytes(&trytes[Field::REQUEST_HASH.tryte_range()])
            .map_err(|source| CodecError::InvalidCharacter {
                field: Field::REQUEST_HASH.name,
                source,
            })?;
        Ok(Self {
            transaction,
            requested,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_packet(&self.transaction, &self.requested)
    }
}

/// Encodes `transaction` with `requested` stamped into the request region.
pub fn encode_packet(transaction: &Transaction, requested: &TxHash) -> Vec<u8> {
    let mut trits = Vec::with_capacity(PACKET_TRITS);
    trits.extend_from_slice(&transaction.trits);
    extend_with_trytes(&mut trits, requested.as_str());
    pack_trits(&trits)
}

/// Curl-P digest of the transaction trits with the request region nulled.
pub fn content_hash(transaction_trits: &[Trit]) -> TxHash {
    let mut input = Vec::with_capacity(TRANSACTION_TRITS + HASH_LENGTH);
    input.extend_from_slice(transaction_trits);
    input.resize(TRANSACTION_TRITS + HASH_LENGTH, 0);
    let digest = hash_trits(&input, TRANSACTION_HASH_ROUNDS);
    // Squeezed trits are balanced, so the rendering is always 81 valid trytes.
    TxHash::from_trytes(&trytes_from_trits(&digest)).unwrap_or_default()
}

/// Alphabet check that names the field holding the first bad symbol.
fn validate_located(trytes: &str) -> Result<(), CodecError> {
    validate_trytes(trytes).map_err(|source| {
        let field = match source {
            TryteError::InvalidCharacter { position, .. } => Field::TRANSACTION_FIELDS
                .iter()
                .chain(std::iter::once(&Field::REQUEST_HASH))
                .find(|field| field.tryte_range().contains(&position))
                .map_or("transaction", |field| field.name),
            _ => "transaction",
        };
        CodecError::InvalidCharacter { field, source }
    })
}

fn read_integer(trits: &[Trit], field: Field) -> Result<i128, CodecError> {
    decode_integer(&trits[field.trit_range()])
        .ok_or(CodecError::ValueOutOfRange { field: field.name })
}

fn read_timestamp(trits: &[Trit], field: Field) -> Result<i64, CodecError> {
    // 27 trits never exceed i64, the conversion only guards the type.
    i64::try_from(read_integer(trits, field)?)
        .map_err(|_| CodecError::ValueOutOfRange { field: field.name })
}

fn read_hash(trits: &[Trit], field: Field) -> Result<TxHash, CodecError> {
    hash_from_trits(&trits[field.trit_range()], field.name)
}

fn hash_from_trits(trits: &[Trit], field: &'static str) -> Result<TxHash, CodecError> {
    TxHash::from_trytes(&trytes_from_trits(trits))
        .map_err(|source| CodecError::InvalidCharacter { field, source })
}
