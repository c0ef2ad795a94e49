/// Transaction and block model for the raw-transaction layer.
///
/// Provides outpoints, inputs, outputs, transactions and blocks with their
/// wire codecs and hashing.

pub mod transaction;
pub mod input;
pub mod output;
pub mod block;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::{OutPoint, TransactionInput, MAX_SEQUENCE_NUMBER};
pub use output::TransactionOutput;
pub use block::{Block, BlockHeader};
