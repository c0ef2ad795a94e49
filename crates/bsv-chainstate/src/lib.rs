/// Chain-state collaborators for the raw-transaction layer.
///
/// The coin view, pending pool, persistent transaction index, chain index
/// and block store are owned elsewhere in a node; this crate defines the
/// narrow traits the transaction layer reads them through, thread-safe
/// in-memory implementations, and the bounded coin probe used to recover a
/// transaction's block height from unspent-output evidence.

pub mod coin;
pub mod view;
pub mod memory;
pub mod access;

mod error;
pub use error::ChainStateError;
pub use coin::Coin;
pub use view::{BlockIndexEntry, BlockStore, ChainIndex, CoinView, DiskTxPos, TxIndex, TxPool};
pub use memory::{MemoryBlockStore, MemoryChain, MemoryCoinView, MemoryTxIndex, MemoryTxPool};
pub use access::{access_by_txid, MAX_PROBE_OUTPUT_INDEX};

#[cfg(test)]
mod tests;
