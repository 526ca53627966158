//! # Core Domain Entities
//!
//! - [`TxHash`]: 81-tryte content hash identifying a transaction
//! - [`PeerId`]: roster-assigned identifier of a configured neighbor

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::TryteError;
use crate::trytes::validate_trytes;

/// Length of a hash in trytes.
pub const HASH_TRYTES: usize = 81;

/// Content hash of a transaction (81 trytes).
///
/// Also used for references (trunk/branch) and for the hash a node asks its
/// neighbors to supply. Ordering is lexicographic on the tryte string and
/// carries no meaning beyond allowing the type in ordered collections.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxHash([u8; HASH_TRYTES]);

impl TxHash {
    /// The all-`9` hash, meaning "no transaction".
    pub const NULL: Self = Self([b'9'; HASH_TRYTES]);

    /// Parses exactly 81 trytes.
    pub fn from_trytes(trytes: &str) -> Result<Self, TryteError> {
        validate_trytes(trytes)?;
        if trytes.len() != HASH_TRYTES {
            return Err(TryteError::WrongLength {
                length: trytes.len(),
                expected: HASH_TRYTES,
            });
        }
        let mut bytes = [0u8; HASH_TRYTES];
        bytes.copy_from_slice(trytes.as_bytes());
        Ok(Self(bytes))
    }

    /// The hash as a tryte string.
    pub fn as_str(&self) -> &str {
        // Only ever constructed from validated ASCII trytes.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Whether this is [`TxHash::NULL`].
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// First ten trytes, for log lines.
    pub fn short(&self) -> &str {
        &self.as_str()[..10]
    }
}

impl Default for TxHash {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({}…)", self.short())
    }
}

impl FromStr for TxHash {
    type Err = TryteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_trytes(s)
    }
}

/// Identifier of a configured neighbor, assigned at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
