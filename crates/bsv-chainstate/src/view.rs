//! Read-side traits for the chain-state collaborators.
//!
//! Each lookup is individually atomic. Nothing here offers a snapshot
//! spanning several calls: the chain may advance between two lookups and
//! callers treat the resulting miss as an ordinary not-found.

use std::sync::Arc;

use bsv_primitives::chainhash::Hash;
use bsv_transaction::{Block, BlockHeader, OutPoint, Transaction};

use crate::coin::Coin;
use crate::ChainStateError;

/// Point lookups into the unspent-output set of the active chain.
pub trait CoinView: Send + Sync {
    /// The coin at `outpoint`, or `None` if it is spent or never existed.
    fn get_coin(&self, outpoint: &OutPoint) -> Option<Coin>;

    fn have_coin(&self, outpoint: &OutPoint) -> bool {
        self.get_coin(outpoint).is_some()
    }
}

/// Lookups into the pending (not yet mined) transaction pool.
pub trait TxPool: Send + Sync {
    fn find_by_hash(&self, hash: &Hash) -> Option<Arc<Transaction>>;

    fn contains(&self, hash: &Hash) -> bool {
        self.find_by_hash(hash).is_some()
    }
}

/// Location of a transaction inside a stored block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiskTxPos {
    pub block_hash: Hash,
    /// Position of the transaction in the block's transaction list.
    pub tx_offset: u32,
}

/// The optional persistent transaction index.
pub trait TxIndex: Send + Sync {
    fn resolve(&self, hash: &Hash) -> Option<DiskTxPos>;
}

/// A node in the block tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockIndexEntry {
    pub hash: Hash,
    pub height: u32,
    pub header: BlockHeader,
    /// Hash of the parent entry, `None` for the genesis block.
    pub parent: Option<Hash>,
}

/// Block-tree queries relative to the active chain.
pub trait ChainIndex: Send + Sync {
    /// Active-chain entry at `height`.
    fn index_at_height(&self, height: u32) -> Option<BlockIndexEntry>;

    /// Any known entry (active or side chain) by block hash.
    fn find_block_index(&self, hash: &Hash) -> Option<BlockIndexEntry>;

    /// Whether `entry` is part of the active chain.
    fn contains(&self, entry: &BlockIndexEntry) -> bool;

    /// Height of the active tip.
    fn active_height(&self) -> u32;
}

/// Full-block reads.
pub trait BlockStore: Send + Sync {
    fn read_block(&self, entry: &BlockIndexEntry) -> Result<Block, ChainStateError>;
}
