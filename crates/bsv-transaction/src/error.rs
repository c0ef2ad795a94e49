/// Error types for transaction and block decoding.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// Binary/hex serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// An underlying script error (forwarded from `bsv-script`).
    #[error("script error: {0}")]
    Script(#[from] bsv_script::ScriptError),
    /// An underlying primitives error (forwarded from `bsv-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] bsv_primitives::PrimitivesError),
}

/// Wrap a wire-read failure with the field being read.
pub(crate) fn reading(field: &'static str) -> impl Fn(bsv_primitives::PrimitivesError) -> TransactionError {
    move |e| TransactionError::SerializationError(format!("reading {}: {}", field, e))
}
