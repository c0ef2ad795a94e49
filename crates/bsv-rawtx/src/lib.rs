//! Raw-transaction layer of a node's RPC surface.
//!
//! Locates transactions across the pending pool, the optional persistent
//! index and unspent-output evidence; builds unsigned raw transactions;
//! admits submitted ones; and shapes the verbose results returned to RPC
//! callers.

pub mod config;
pub mod locator;
pub mod builder;
pub mod admission;
pub mod result;
pub mod rpc;

mod error;
pub use error::{NotFoundReason, RpcError};
pub use config::{RawTxConfig, DEFAULT_MAX_RAW_TX_FEE};
pub use locator::{LocatedTx, TxLocator};
pub use builder::{create_raw_transaction, TransactionInputRef};
pub use admission::{have_chain, send_raw_transaction, RecordingRelay, RelayLog, RelayProcessor, RelayRejection};
pub use result::{ScriptPubKeyResult, ScriptSig, TxRawResult, Vin, Vout};
pub use rpc::{
    CreateRawTransactionCmd, DecodeRawTransactionCmd, DecodeScriptCmd, GetRawTransactionCmd,
    GetTxOutProofCmd, NodeContext, RawTransactionReply, RawTxRpc, RpcReply, SendRawTransactionCmd,
    SignRawTransactionCmd, VerifyTxOutProofCmd,
};
