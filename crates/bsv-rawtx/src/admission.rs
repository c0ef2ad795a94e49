//! Raw-transaction admission.
//!
//! Duplicate detection here is advisory. Whether a transaction is finally
//! accepted is decided by the relay processor's acceptance pipeline, which
//! owns admission exclusivity.

use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;

use bsv_chainstate::{CoinView, MemoryTxPool, TxPool};
use bsv_primitives::chainhash::Hash;
use bsv_transaction::{OutPoint, Transaction};

use crate::RpcError;

/// Refusal from the acceptance pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRejection {
    /// Machine-readable reject code.
    pub code: String,
    pub description: String,
}

impl RelayRejection {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        RelayRejection { code: code.into(), description: description.into() }
    }
}

impl std::fmt::Display for RelayRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

impl std::error::Error for RelayRejection {}

/// The node's transaction acceptance and relay pipeline.
pub trait RelayProcessor: Send + Sync {
    /// Re-relay a transaction that is already in the pending pool.
    fn reprocess(&self, tx: &Transaction);

    /// Validate and accept a new transaction, refusing it if its fee
    /// exceeds `max_fee` satoshis (`0` disables the ceiling).
    fn submit(&self, tx: &Transaction, max_fee: i64) -> Result<(), RelayRejection>;
}

/// Whether any output of `tx` is already an unspent coin.
pub fn have_chain(coins: &dyn CoinView, tx: &Transaction) -> bool {
    let hash = tx.hash();
    (0..tx.outputs.len() as u32).any(|index| coins.have_coin(&OutPoint::new(hash, index)))
}

/// Decode `raw_hex` and hand it to the relay processor.
///
/// An already pooled transaction is reprocessed and its hash returned. One
/// whose outputs are already unspent on the active chain is refused with
/// `AlreadyInChain`. Anything else is submitted with the fee ceiling
/// `max_tx_fee`, or no ceiling when `allow_high_fees` is set.
pub fn send_raw_transaction(
    raw_hex: &str,
    allow_high_fees: bool,
    max_tx_fee: i64,
    coins: &dyn CoinView,
    pool: &dyn TxPool,
    relay: &dyn RelayProcessor,
) -> Result<Hash, RpcError> {
    let bytes = hex::decode(raw_hex).map_err(|_| RpcError::hex_decode(raw_hex))?;
    let tx = Transaction::from_bytes(&bytes)
        .map_err(|e| RpcError::Decode(format!("TX decode failed: {}", e)))?;
    let hash = tx.hash();

    let in_chain = have_chain(coins, &tx);
    let max_fee = if allow_high_fees { 0 } else { max_tx_fee };

    if pool.contains(&hash) {
        debug!("sendrawtransaction {}: already pooled, reprocessing", hash);
        relay.reprocess(&tx);
        return Ok(hash);
    }
    if in_chain {
        debug!("sendrawtransaction {}: outputs already unspent on chain", hash);
        return Err(RpcError::AlreadyInChain("transaction already in block chain".to_string()));
    }

    relay
        .submit(&tx, max_fee)
        .map_err(|e| RpcError::TransactionRejected(e.to_string()))?;
    info!("sendrawtransaction {}: accepted (max fee {})", hash, max_fee);
    Ok(hash)
}

/// What a `RecordingRelay` has been asked to do.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayLog {
    pub reprocessed: Vec<Hash>,
    /// Submitted hashes with the fee ceiling each was submitted under.
    pub submitted: Vec<(Hash, i64)>,
}

/// Relay processor that records calls, optionally accepting into a pool.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    log: Mutex<RelayLog>,
    reject_with: Mutex<Option<RelayRejection>>,
    pool: Option<Arc<MemoryTxPool>>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert accepted transactions into `pool`.
    pub fn accepting_into(pool: Arc<MemoryTxPool>) -> Self {
        RecordingRelay { pool: Some(pool), ..Self::default() }
    }

    /// Refuse every later submission with `rejection`.
    pub fn reject_all(&self, rejection: RelayRejection) {
        *self.reject_with.lock() = Some(rejection);
    }

    pub fn log(&self) -> RelayLog {
        self.log.lock().clone()
    }
}

impl RelayProcessor for RecordingRelay {
    fn reprocess(&self, tx: &Transaction) {
        self.log.lock().reprocessed.push(tx.hash());
    }

    fn submit(&self, tx: &Transaction, max_fee: i64) -> Result<(), RelayRejection> {
        let hash = tx.hash();
        self.log.lock().submitted.push((hash, max_fee));
        if let Some(rejection) = self.reject_with.lock().clone() {
            return Err(rejection);
        }
        if let Some(pool) = &self.pool {
            pool.insert(tx.clone());
        }
        Ok(())
    }
}
