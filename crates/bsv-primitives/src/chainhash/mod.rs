//! The 256-bit identifier of transactions and blocks.
//!
//! Stored in internal (little-endian) byte order and displayed as
//! byte-reversed hex, the convention used by every RPC surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Size of a Hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum hex string length for a Hash (64 hex characters).
pub const MAX_HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte hash used for transaction ids and block hashes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Wrap 32 bytes given in internal byte order.
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Build a Hash from a slice that must be exactly 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| {
            PrimitivesError::InvalidHash(format!(
                "invalid hash length of {}, want {}",
                bytes.len(),
                HASH_SIZE
            ))
        })?;
        Ok(Hash(arr))
    }

    /// Parse a byte-reversed hex string.
    ///
    /// Short strings are zero-padded on the high end, so `"1"` is the hash
    /// whose first internal byte is `0x01`. Use [`Hash::from_txid_hex`] when
    /// the caller must supply all 64 characters.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() > MAX_HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "max hash string length is {} bytes",
                MAX_HASH_STRING_SIZE
            )));
        }

        let padded = if hex_str.len() % 2 != 0 {
            format!("0{}", hex_str)
        } else {
            hex_str.to_string()
        };
        let decoded = hex::decode(&padded)?;

        let mut bytes = [0u8; HASH_SIZE];
        for (dst, src) in bytes.iter_mut().zip(decoded.iter().rev()) {
            *dst = *src;
        }
        Ok(Hash(bytes))
    }

    /// Parse a full 64-character display-order hex id.
    pub fn from_txid_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != MAX_HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "must be of length {} (not {}, for '{}')",
                MAX_HASH_STRING_SIZE,
                hex_str.len(),
                hex_str
            )));
        }
        Self::from_hex(hex_str)
    }

    /// Whether every byte is zero. The null hash marks the coinbase
    /// outpoint and an absent block hash.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Access the internal byte array.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "{}", hex::encode(reversed))
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Double SHA-256 of `data` as a Hash.
pub fn double_hash(data: &[u8]) -> Hash {
    Hash(sha256d(data))
}
