//! Unsigned raw-transaction construction.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsv_primitives::amount::amount_from_decimal;
use bsv_primitives::chainhash::Hash;
use bsv_script::AddressCodec;
use bsv_transaction::{OutPoint, Transaction, TransactionInput, TransactionOutput, MAX_SEQUENCE_NUMBER};

use crate::RpcError;

/// One input reference as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInputRef {
    pub txid: String,
    pub vout: i64,
}

impl TransactionInputRef {
    pub fn new(txid: impl Into<String>, vout: i64) -> Self {
        TransactionInputRef { txid: txid.into(), vout }
    }
}

/// Build an unsigned transaction spending `inputs` and paying `amounts`.
///
/// Outputs follow the iteration order of `amounts`. Every check runs before
/// the transaction is returned, so a failure never yields a partial result.
pub fn create_raw_transaction(
    inputs: &[TransactionInputRef],
    amounts: &IndexMap<String, Decimal>,
    lock_time: Option<i64>,
    addresses: &dyn AddressCodec,
) -> Result<Transaction, RpcError> {
    let lock_time = match lock_time {
        Some(lt) => u32::try_from(lt)
            .map_err(|_| RpcError::InvalidParameter("Locktime out of range".to_string()))?,
        None => 0,
    };
    let sequence = if lock_time == 0 {
        MAX_SEQUENCE_NUMBER
    } else {
        MAX_SEQUENCE_NUMBER - 1
    };

    let mut tx = Transaction::new();
    tx.lock_time = lock_time;

    for input in inputs {
        let hash = Hash::from_txid_hex(&input.txid).map_err(|_| RpcError::hex_decode(&input.txid))?;
        if input.vout < 0 {
            return Err(RpcError::InvalidParameter(
                "Invalid parameter, vout must be positive".to_string(),
            ));
        }
        let index = u32::try_from(input.vout).map_err(|_| {
            RpcError::InvalidParameter("Invalid parameter, vout out of range".to_string())
        })?;
        tx.add_input(TransactionInput::new(OutPoint::new(hash, index), sequence));
    }

    for (addr, amount) in amounts {
        let address = addresses
            .decode_address(addr)
            .map_err(|_| RpcError::InvalidAddressOrKey(format!("Invalid Bitcoin address: {}", addr)))?;
        let value = amount_from_decimal(*amount)
            .map_err(|_| RpcError::InvalidParameter("Invalid amount".to_string()))?;
        tx.add_output(TransactionOutput::new(value, address.locking_script()));
    }

    Ok(tx)
}
