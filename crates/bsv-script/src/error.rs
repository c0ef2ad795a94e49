/// Error types for script operations.
///
/// Covers parsing and assembling scripts, numeric decoding, address
/// validation and signature encoding checks.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Generic invalid script error.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// An ASM token that is neither a number, a hex push nor a mnemonic.
    #[error("invalid asm token '{0}'")]
    InvalidAsmToken(String),

    /// Attempted to append a push opcode through `append_opcode`.
    #[error("use append_push_data for push data opcodes: {0:#04x}")]
    InvalidOpcodeType(u8),

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Decoded address payload has the wrong length.
    #[error("invalid address length for '{0}'")]
    InvalidAddressLength(String),

    /// Address version byte not recognized for any supported network.
    #[error("unsupported address version {0:#04x}")]
    UnsupportedAddressVersion(u8),

    /// Address belongs to a different network than the codec expects.
    #[error("address '{0}' is for the wrong network")]
    WrongNetwork(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds maximum allowed size.
    #[error("data too big")]
    DataTooBig,

    /// Numeric element wider than allowed.
    #[error("script number is {0} bytes which exceeds the allowed width")]
    NumberTooBig(usize),

    /// Numeric element with redundant padding when minimal encoding is required.
    #[error("non-minimally encoded script number {0}")]
    NonMinimalNumber(String),

    /// Signature failed an encoding check.
    #[error("signature encoding: {0}")]
    SigEncoding(#[from] SigEncodingError),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] bsv_primitives::PrimitivesError),
}

/// Reasons a signature fails the encoding rules selected by `ScriptFlags`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigEncodingError {
    #[error("malformed signature: too short: {0} < 8")]
    TooShort(usize),
    #[error("malformed signature: too long: {0} > 72")]
    TooLong(usize),
    #[error("malformed signature: format has wrong type: {0:#x}")]
    InvalidSeqId(u8),
    #[error("malformed signature: bad length: {0} != {1}")]
    InvalidDataLen(usize, usize),
    #[error("malformed signature: S type indicator missing")]
    MissingSTypeId,
    #[error("malformed signature: S length missing")]
    MissingSLen,
    #[error("malformed signature: invalid S length")]
    InvalidSLen,
    #[error("malformed signature: R integer marker: {0:#x} != 0x02")]
    InvalidRIntId(u8),
    #[error("malformed signature: R length is zero")]
    ZeroRLen,
    #[error("malformed signature: R is negative")]
    NegativeR,
    #[error("malformed signature: R value has too much padding")]
    TooMuchRPadding,
    #[error("malformed signature: S integer marker: {0:#x} != 0x02")]
    InvalidSIntId(u8),
    #[error("malformed signature: S length is zero")]
    ZeroSLen,
    #[error("malformed signature: S is negative")]
    NegativeS,
    #[error("malformed signature: S value has too much padding")]
    TooMuchSPadding,
    #[error("signature is not canonical due to unnecessarily high S value")]
    HighS,
    #[error("invalid hash type {0:#x}")]
    UndefinedHashType(u8),
    #[error("hash type {0:#x} uses forkid which is not enabled")]
    IllegalForkId(u8),
    #[error("hash type {0:#x} must use forkid")]
    MustUseForkId(u8),
}
