//! Unspent output record.

use bsv_script::Script;
use bsv_transaction::TransactionOutput;

/// One unspent output.
///
/// Presence in a coin view means the output is unspent; spending removes
/// the entry rather than flagging it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coin {
    /// Value in satoshis.
    pub value: i64,
    pub locking_script: Script,
    /// Height of the block that created the output.
    pub height: u32,
    pub is_coinbase: bool,
}

impl Coin {
    pub fn new(value: i64, locking_script: Script, height: u32, is_coinbase: bool) -> Self {
        Coin { value, locking_script, height, is_coinbase }
    }

    /// Coin for `output`, created at `height`.
    pub fn from_output(output: &TransactionOutput, height: u32, is_coinbase: bool) -> Self {
        Coin {
            value: output.value,
            locking_script: output.locking_script.clone(),
            height,
            is_coinbase,
        }
    }
}
