/// Unified error type for primitives operations.
///
/// Covers hex and Base58 decoding, hash sizing, wire-cursor underflow and
/// amount conversion.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("varint too large: {0}")]
    VarIntTooLarge(u64),

    #[error("non-canonical varint")]
    NonCanonicalVarInt,

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount out of range: {0}")]
    AmountOutOfRange(i64),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
