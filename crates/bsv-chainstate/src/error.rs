use bsv_primitives::chainhash::Hash;

/// Error types for chain-state collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ChainStateError {
    /// The block store has no block for this hash.
    #[error("block {0} not found")]
    BlockNotFound(Hash),

    /// Reading or decoding a stored block failed.
    #[error("reading block {hash}: {reason}")]
    BlockRead { hash: Hash, reason: String },

    /// A block header does not connect to a known parent.
    #[error("orphan block {0}")]
    OrphanBlock(Hash),

    /// Forwarded transaction/block decoding error.
    #[error("transaction error: {0}")]
    Transaction(#[from] bsv_transaction::TransactionError),
}
