//! In-memory chain-state collaborators.
//!
//! Each store sits behind a `parking_lot::RwLock`, so every lookup sees
//! either the state before or after a concurrent write, never a torn entry.
//! Writers (block connection, pool acceptance) are modelled by the mutating
//! helpers here.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use bsv_primitives::chainhash::Hash;
use bsv_transaction::{Block, BlockHeader, OutPoint, Transaction};

use crate::coin::Coin;
use crate::view::{BlockIndexEntry, BlockStore, ChainIndex, CoinView, DiskTxPos, TxIndex, TxPool};
use crate::ChainStateError;

// -----------------------------------------------------------------------
// Coin view
// -----------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryCoinView {
    coins: RwLock<HashMap<OutPoint, Coin>>,
}

impl MemoryCoinView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_coin(&self, outpoint: OutPoint, coin: Coin) {
        self.coins.write().insert(outpoint, coin);
    }

    /// Remove a coin, returning it if it was unspent.
    pub fn spend_coin(&self, outpoint: &OutPoint) -> Option<Coin> {
        self.coins.write().remove(outpoint)
    }

    /// Apply a confirmed transaction: spend its inputs, add its outputs.
    pub fn connect_transaction(&self, tx: &Transaction, height: u32) {
        let hash = tx.hash();
        let coinbase = tx.is_coinbase();
        let mut coins = self.coins.write();
        if !coinbase {
            for input in &tx.inputs {
                coins.remove(&input.previous_output);
            }
        }
        for (index, output) in tx.outputs.iter().enumerate() {
            coins.insert(
                OutPoint::new(hash, index as u32),
                Coin::from_output(output, height, coinbase),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.coins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.read().is_empty()
    }
}

impl CoinView for MemoryCoinView {
    fn get_coin(&self, outpoint: &OutPoint) -> Option<Coin> {
        self.coins.read().get(outpoint).cloned()
    }
}

// -----------------------------------------------------------------------
// Pending pool
// -----------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryTxPool {
    txs: RwLock<HashMap<Hash, Arc<Transaction>>>,
}

impl MemoryTxPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction, returning its hash.
    pub fn insert(&self, tx: Transaction) -> Hash {
        let hash = tx.hash();
        self.txs.write().insert(hash, Arc::new(tx));
        hash
    }

    pub fn remove(&self, hash: &Hash) -> Option<Arc<Transaction>> {
        self.txs.write().remove(hash)
    }

    /// Remove and return every pooled transaction, as mining a block would.
    pub fn drain(&self) -> Vec<Arc<Transaction>> {
        self.txs.write().drain().map(|(_, tx)| tx).collect()
    }

    pub fn len(&self) -> usize {
        self.txs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.read().is_empty()
    }
}

impl TxPool for MemoryTxPool {
    fn find_by_hash(&self, hash: &Hash) -> Option<Arc<Transaction>> {
        self.txs.read().get(hash).cloned()
    }
}

// -----------------------------------------------------------------------
// Transaction index
// -----------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryTxIndex {
    positions: RwLock<HashMap<Hash, DiskTxPos>>,
}

impl MemoryTxIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, hash: Hash, pos: DiskTxPos) {
        self.positions.write().insert(hash, pos);
    }

    /// Index every transaction of `block`.
    pub fn index_block(&self, block: &Block) {
        let block_hash = block.hash();
        let mut positions = self.positions.write();
        for (offset, tx) in block.transactions.iter().enumerate() {
            positions.insert(
                tx.hash(),
                DiskTxPos { block_hash, tx_offset: offset as u32 },
            );
        }
    }
}

impl TxIndex for MemoryTxIndex {
    fn resolve(&self, hash: &Hash) -> Option<DiskTxPos> {
        self.positions.read().get(hash).copied()
    }
}

// -----------------------------------------------------------------------
// Chain index
// -----------------------------------------------------------------------

#[derive(Debug, Default)]
struct ChainTree {
    entries: HashMap<Hash, BlockIndexEntry>,
    /// Active chain, indexed by height.
    active: Vec<Hash>,
}

#[derive(Debug, Default)]
pub struct MemoryChain {
    tree: RwLock<ChainTree>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the active chain with `header`, returning its new entry.
    ///
    /// The first header becomes height 0 and its `prev_block` is ignored;
    /// later headers must build on the current tip.
    pub fn push_header(&self, header: BlockHeader) -> Result<BlockIndexEntry, ChainStateError> {
        let mut tree = self.tree.write();
        let hash = header.hash();
        let parent = tree.active.last().copied();
        if let Some(tip) = parent {
            if header.prev_block != tip {
                return Err(ChainStateError::OrphanBlock(hash));
            }
        }
        let entry = BlockIndexEntry {
            hash,
            height: tree.active.len() as u32,
            header,
            parent,
        };
        tree.entries.insert(hash, entry.clone());
        tree.active.push(hash);
        debug!("connected header {} at height {}", hash, entry.height);
        Ok(entry)
    }

    /// Record `header` on a side branch without touching the active chain.
    pub fn add_side_header(&self, header: BlockHeader) -> Result<BlockIndexEntry, ChainStateError> {
        let mut tree = self.tree.write();
        let hash = header.hash();
        let parent = tree
            .entries
            .get(&header.prev_block)
            .ok_or(ChainStateError::OrphanBlock(hash))?;
        let entry = BlockIndexEntry {
            hash,
            height: parent.height + 1,
            header,
            parent: Some(parent.hash),
        };
        tree.entries.insert(hash, entry.clone());
        Ok(entry)
    }

    /// Drop the active tip, leaving its entry known as a side block.
    pub fn disconnect_tip(&self) -> Option<BlockIndexEntry> {
        let mut tree = self.tree.write();
        let hash = tree.active.pop()?;
        debug!("disconnected tip {}", hash);
        tree.entries.get(&hash).cloned()
    }
}

impl ChainIndex for MemoryChain {
    fn index_at_height(&self, height: u32) -> Option<BlockIndexEntry> {
        let tree = self.tree.read();
        let hash = tree.active.get(height as usize)?;
        tree.entries.get(hash).cloned()
    }

    fn find_block_index(&self, hash: &Hash) -> Option<BlockIndexEntry> {
        self.tree.read().entries.get(hash).cloned()
    }

    fn contains(&self, entry: &BlockIndexEntry) -> bool {
        self.tree.read().active.get(entry.height as usize) == Some(&entry.hash)
    }

    fn active_height(&self) -> u32 {
        (self.tree.read().active.len() as u32).saturating_sub(1)
    }
}

// -----------------------------------------------------------------------
// Block store
// -----------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<Hash, Block>>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_block(&self, block: Block) -> Hash {
        let hash = block.hash();
        self.blocks.write().insert(hash, block);
        hash
    }

    /// Store a block under an explicit hash, as a corrupted store might.
    pub fn put_block_at(&self, hash: Hash, block: Block) {
        self.blocks.write().insert(hash, block);
    }
}

impl BlockStore for MemoryBlockStore {
    fn read_block(&self, entry: &BlockIndexEntry) -> Result<Block, ChainStateError> {
        self.blocks
            .read()
            .get(&entry.hash)
            .cloned()
            .ok_or(ChainStateError::BlockNotFound(entry.hash))
    }
}
