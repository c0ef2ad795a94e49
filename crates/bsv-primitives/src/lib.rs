/// Foundational types shared by the raw-transaction layer.
///
/// - Hash functions (SHA-256, SHA-256d)
/// - The 256-bit chain `Hash` used for transaction and block ids
/// - Variable-length integers and the `BsvReader`/`BsvWriter` wire cursors
/// - Base58Check decoding for addresses
/// - Money-range checks and decimal amount conversion

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod amount;

mod error;
pub use error::PrimitivesError;
