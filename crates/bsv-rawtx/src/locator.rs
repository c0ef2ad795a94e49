//! Transaction locator.
//!
//! Resolves a transaction hash against the pending pool, then the optional
//! persistent index, then (when allowed) unspent-output evidence. Each step
//! is an independent read; the chain may move between them, in which case
//! the caller sees an ordinary not-found and may retry.

use std::sync::Arc;

use log::{debug, trace, warn};

use bsv_chainstate::{access_by_txid, BlockStore, ChainIndex, CoinView, TxIndex, TxPool};
use bsv_primitives::chainhash::Hash;
use bsv_transaction::Transaction;

use crate::error::NotFoundReason;

/// A located transaction and, if confirmed, the hash of its block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatedTx {
    pub tx: Arc<Transaction>,
    /// `None` for pooled (unconfirmed) transactions.
    pub block_hash: Option<Hash>,
}

impl LocatedTx {
    pub fn is_confirmed(&self) -> bool {
        self.block_hash.is_some()
    }
}

/// Three-source transaction lookup.
#[derive(Clone)]
pub struct TxLocator {
    pool: Arc<dyn TxPool>,
    tx_index: Option<Arc<dyn TxIndex>>,
    coins: Arc<dyn CoinView>,
    chain: Arc<dyn ChainIndex>,
    blocks: Arc<dyn BlockStore>,
    probe_ceiling: u32,
}

impl TxLocator {
    /// A locator with the persistent index disabled.
    pub fn new(
        pool: Arc<dyn TxPool>,
        coins: Arc<dyn CoinView>,
        chain: Arc<dyn ChainIndex>,
        blocks: Arc<dyn BlockStore>,
        probe_ceiling: u32,
    ) -> Self {
        TxLocator { pool, tx_index: None, coins, chain, blocks, probe_ceiling }
    }

    /// Enable the persistent-index step.
    pub fn with_tx_index(mut self, tx_index: Arc<dyn TxIndex>) -> Self {
        self.tx_index = Some(tx_index);
        self
    }

    pub fn index_enabled(&self) -> bool {
        self.tx_index.is_some()
    }

    /// Locate the transaction with `hash`.
    ///
    /// The pool always answers first. A fully spent confirmed transaction
    /// leaves no coin behind, so without the persistent index it cannot be
    /// found even when `allow_slow` is set.
    pub fn locate(&self, hash: &Hash, allow_slow: bool) -> Result<LocatedTx, NotFoundReason> {
        if let Some(tx) = self.pool.find_by_hash(hash) {
            debug!("locate {}: found in pool", hash);
            return Ok(LocatedTx { tx, block_hash: None });
        }

        if let Some(found) = self.from_index(hash) {
            debug!("locate {}: found via tx index in block {}", hash, found.block_hash.unwrap_or_default());
            return Ok(found);
        }

        if allow_slow {
            if let Some(found) = self.from_coin_evidence(hash) {
                debug!("locate {}: found via coin view in block {}", hash, found.block_hash.unwrap_or_default());
                return Ok(found);
            }
            return Err(NotFoundReason::SlowPathExhausted);
        }

        if self.index_enabled() {
            Err(NotFoundReason::PoolMiss)
        } else {
            Err(NotFoundReason::IndexDisabled)
        }
    }

    fn from_index(&self, hash: &Hash) -> Option<LocatedTx> {
        let pos = self.tx_index.as_ref()?.resolve(hash)?;
        let entry = match self.chain.find_block_index(&pos.block_hash) {
            Some(entry) => entry,
            None => {
                warn!("tx index points {} at unknown block {}", hash, pos.block_hash);
                return None;
            }
        };
        let mut block = match self.blocks.read_block(&entry) {
            Ok(block) => block,
            Err(e) => {
                warn!("failed to read block {} for {}: {}", entry.hash, hash, e);
                return None;
            }
        };
        let offset = pos.tx_offset as usize;
        if block.transactions.get(offset).map(Transaction::hash) != Some(*hash) {
            warn!(
                "tx index offset {} in block {} does not hold {}",
                pos.tx_offset, entry.hash, hash
            );
            return None;
        }
        let tx = block.transactions.swap_remove(offset);
        Some(LocatedTx { tx: Arc::new(tx), block_hash: Some(entry.hash) })
    }

    fn from_coin_evidence(&self, hash: &Hash) -> Option<LocatedTx> {
        let (_, coin) = access_by_txid(self.coins.as_ref(), hash, self.probe_ceiling)?;
        let entry = self.chain.index_at_height(coin.height)?;
        let mut block = match self.blocks.read_block(&entry) {
            Ok(block) => block,
            Err(e) => {
                warn!("failed to read block {} at height {}: {}", entry.hash, coin.height, e);
                return None;
            }
        };
        match block.find_transaction(hash) {
            Some(offset) => {
                let tx = block.transactions.swap_remove(offset);
                Some(LocatedTx { tx: Arc::new(tx), block_hash: Some(entry.hash) })
            }
            None => {
                trace!("coin height hint {} for {} does not match block {}", coin.height, hash, entry.hash);
                None
            }
        }
    }
}

impl std::fmt::Debug for TxLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxLocator")
            .field("index_enabled", &self.index_enabled())
            .field("probe_ceiling", &self.probe_ceiling)
            .finish()
    }
}
