//! Transaction output with a value and locking script.

use bsv_primitives::util::{BsvReader, BsvWriter, VarInt};
use bsv_script::Script;

use crate::error::reading;
use crate::TransactionError;

/// A single output in a transaction.
///
/// # Wire format
///
/// | Field            | Size           |
/// |------------------|----------------|
/// | value            | 8 bytes (LE)   |
/// | script length    | VarInt         |
/// | locking_script   | variable       |
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionOutput {
    /// Value in satoshis. Signed on the wire; consensus keeps it in money range.
    pub value: i64,

    /// The locking script (scriptPubKey) that defines spending conditions.
    pub locking_script: Script,
}

impl TransactionOutput {
    pub fn new(value: i64, locking_script: Script) -> Self {
        TransactionOutput { value, locking_script }
    }

    /// Deserialize a `TransactionOutput` from a `BsvReader`.
    pub fn read_from(reader: &mut BsvReader) -> Result<Self, TransactionError> {
        let value = reader.read_i64_le().map_err(reading("output value"))?;
        let script_len = reader.read_varint().map_err(reading("script length"))?;
        let script_bytes = reader
            .read_bytes(script_len.value() as usize)
            .map_err(reading("locking script"))?;

        Ok(TransactionOutput {
            value,
            locking_script: Script::from_bytes(script_bytes),
        })
    }

    /// Serialize this `TransactionOutput` into a `BsvWriter`.
    pub fn write_to(&self, writer: &mut BsvWriter) {
        writer.write_i64_le(self.value);
        let script_bytes = self.locking_script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);
    }

    /// Serialize this output to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BsvWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
