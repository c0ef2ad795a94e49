//! Transaction input and the outpoint it spends.
//!
//! Provides binary serialization/deserialization following the wire format.

use std::fmt;

use bsv_primitives::chainhash::Hash;
use bsv_primitives::util::{BsvReader, BsvWriter, VarInt};
use bsv_script::Script;

use crate::error::reading;
use crate::TransactionError;

/// Sequence number marking an input final (lock time inert for it).
pub const MAX_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// Output index of the null outpoint carried by coinbase inputs.
pub const NULL_INDEX: u32 = 0xFFFF_FFFF;

/// Reference to one output of a previous transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutPoint {
    /// Hash of the transaction holding the output.
    pub hash: Hash,
    /// Position of the output within that transaction.
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash, index: u32) -> Self {
        OutPoint { hash, index }
    }

    /// The outpoint coinbase inputs spend: zero hash, index `0xFFFFFFFF`.
    pub fn null() -> Self {
        OutPoint { hash: Hash::default(), index: NULL_INDEX }
    }

    pub fn is_null(&self) -> bool {
        self.hash.is_null() && self.index == NULL_INDEX
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}

/// A single input in a transaction.
///
/// # Wire format
///
/// | Field              | Size             |
/// |--------------------|------------------|
/// | previous hash      | 32 bytes         |
/// | previous index     | 4 bytes (LE)     |
/// | script length      | VarInt           |
/// | unlocking_script   | variable         |
/// | sequence           | 4 bytes (LE)     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// The output being spent.
    pub previous_output: OutPoint,

    /// The unlocking script (scriptSig). Empty until the input is signed.
    pub unlocking_script: Script,

    /// Sequence number. Defaults to `0xFFFFFFFF` (final).
    pub sequence: u32,
}

impl TransactionInput {
    /// Create an unsigned input spending `previous_output`.
    pub fn new(previous_output: OutPoint, sequence: u32) -> Self {
        TransactionInput {
            previous_output,
            unlocking_script: Script::new(),
            sequence,
        }
    }

    /// Deserialize a `TransactionInput` from a `BsvReader`.
    pub fn read_from(reader: &mut BsvReader) -> Result<Self, TransactionError> {
        let hash = Hash::new(reader.read_array::<32>().map_err(reading("previous hash"))?);
        let index = reader.read_u32_le().map_err(reading("previous index"))?;
        let script_len = reader.read_varint().map_err(reading("script length"))?;
        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(reading("unlocking script"))?;
        let sequence = reader.read_u32_le().map_err(reading("sequence"))?;

        Ok(TransactionInput {
            previous_output: OutPoint { hash, index },
            unlocking_script: Script::from_bytes(script_bytes),
            sequence,
        })
    }

    /// Serialize this `TransactionInput` into a `BsvWriter`.
    pub fn write_to(&self, writer: &mut BsvWriter) {
        writer.write_bytes(self.previous_output.hash.as_bytes());
        writer.write_u32_le(self.previous_output.index);
        let script_bytes = self.unlocking_script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);
        writer.write_u32_le(self.sequence);
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self::new(OutPoint::default(), MAX_SEQUENCE_NUMBER)
    }
}
