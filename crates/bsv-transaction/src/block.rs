//! Block header and full block.
//!
//! Only what the transaction layer needs: wire decoding, header hashing and
//! the merkle root over transaction hashes. Blocks are never validated here.

use bsv_primitives::chainhash::{double_hash, Hash};
use bsv_primitives::util::{BsvReader, BsvWriter, VarInt};

use crate::error::reading;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Encoded size of a block header.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// An 80-byte block header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block: Hash,
    pub merkle_root: Hash,
    /// Block time as a Unix timestamp.
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    pub fn read_from(reader: &mut BsvReader) -> Result<Self, TransactionError> {
        Ok(BlockHeader {
            version: reader.read_i32_le().map_err(reading("header version"))?,
            prev_block: Hash::new(reader.read_array::<32>().map_err(reading("prev block"))?),
            merkle_root: Hash::new(reader.read_array::<32>().map_err(reading("merkle root"))?),
            timestamp: reader.read_u32_le().map_err(reading("timestamp"))?,
            bits: reader.read_u32_le().map_err(reading("bits"))?,
            nonce: reader.read_u32_le().map_err(reading("nonce"))?,
        })
    }

    pub fn write_to(&self, writer: &mut BsvWriter) {
        writer.write_i32_le(self.version);
        writer.write_bytes(self.prev_block.as_bytes());
        writer.write_bytes(self.merkle_root.as_bytes());
        writer.write_u32_le(self.timestamp);
        writer.write_u32_le(self.bits);
        writer.write_u32_le(self.nonce);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BsvWriter::with_capacity(BLOCK_HEADER_SIZE);
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Block hash: double SHA-256 of the serialized header.
    pub fn hash(&self) -> Hash {
        double_hash(&self.to_bytes())
    }
}

/// A block: header plus its ordered transactions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Transaction>) -> Self {
        Block { header, transactions }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = BsvReader::new(bytes);
        let header = BlockHeader::read_from(&mut reader)?;
        let count = reader.read_varint().map_err(reading("transaction count"))?.value();
        let mut transactions = Vec::with_capacity((count as usize).min(reader.remaining() / 10));
        for _ in 0..count {
            transactions.push(Transaction::read_from(&mut reader)?);
        }
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after block",
                reader.remaining()
            )));
        }
        Ok(Block { header, transactions })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BsvWriter::with_capacity(BLOCK_HEADER_SIZE + 256);
        self.header.write_to(&mut writer);
        writer.write_varint(VarInt::from(self.transactions.len()));
        for tx in &self.transactions {
            tx.write_to(&mut writer);
        }
        writer.into_bytes()
    }

    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Position of the transaction with `hash`, by linear scan.
    pub fn find_transaction(&self, hash: &Hash) -> Option<usize> {
        self.transactions.iter().position(|tx| tx.hash() == *hash)
    }

    /// Merkle root over the transaction hashes (odd levels repeat their last entry).
    pub fn compute_merkle_root(&self) -> Hash {
        let mut level: Vec<Hash> = self.transactions.iter().map(Transaction::hash).collect();
        if level.is_empty() {
            return Hash::default();
        }
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).unwrap_or(&pair[0]);
                    let mut buf = [0u8; 64];
                    buf[..32].copy_from_slice(pair[0].as_bytes());
                    buf[32..].copy_from_slice(right.as_bytes());
                    double_hash(&buf)
                })
                .collect();
        }
        level[0]
    }
}
