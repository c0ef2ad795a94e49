//! Verbose `getrawtransaction` result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsv_chainstate::ChainIndex;
use bsv_primitives::amount::amount_to_decimal;
use bsv_primitives::chainhash::Hash;
use bsv_script::Script;
use bsv_transaction::Transaction;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSig {
    pub asm: String,
    pub hex: String,
}

/// Locking-script rendering. Script classification (type, required
/// signatures, addresses) is not reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKeyResult {
    pub asm: String,
    pub hex: String,
}

/// One input. Coinbase inputs carry only `coinbase` and `sequence`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    #[serde(rename = "scriptSig", skip_serializing_if = "Option::is_none")]
    pub script_sig: Option<ScriptSig>,
    pub sequence: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vout {
    /// Value in coins.
    pub value: Decimal,
    pub n: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKeyResult,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRawResult {
    pub txid: String,
    pub hash: String,
    pub size: usize,
    pub version: i32,
    pub locktime: u32,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockhash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocktime: Option<u32>,
}

impl TxRawResult {
    /// Describe `tx`, confirmed in `block_hash` if given.
    ///
    /// Confirmations count from the active tip and are zero for a block
    /// that is known but not on the active chain. Block times are only
    /// reported for active-chain blocks.
    pub fn new(tx: &Transaction, block_hash: Option<&Hash>, chain: &dyn ChainIndex) -> Self {
        let hash = tx.hash().to_string();
        let mut result = TxRawResult {
            txid: hash.clone(),
            hash,
            size: tx.size(),
            version: tx.version,
            locktime: tx.lock_time,
            vin: vin_list(tx),
            vout: vout_list(tx),
            blockhash: None,
            confirmations: None,
            time: None,
            blocktime: None,
        };

        if let Some(block_hash) = block_hash.filter(|h| !h.is_null()) {
            result.blockhash = Some(block_hash.to_string());
            if let Some(entry) = chain.find_block_index(block_hash) {
                if chain.contains(&entry) {
                    let depth = chain.active_height().saturating_sub(entry.height) + 1;
                    result.confirmations = Some(depth);
                    result.time = Some(entry.header.timestamp);
                    result.blocktime = Some(entry.header.timestamp);
                } else {
                    result.confirmations = Some(0);
                }
            }
        }
        result
    }
}

fn vin_list(tx: &Transaction) -> Vec<Vin> {
    let coinbase = tx.is_coinbase();
    tx.inputs
        .iter()
        .map(|input| {
            if coinbase {
                Vin {
                    coinbase: Some(input.unlocking_script.to_hex()),
                    txid: None,
                    vout: None,
                    script_sig: None,
                    sequence: input.sequence,
                }
            } else {
                Vin {
                    coinbase: None,
                    txid: Some(input.previous_output.hash.to_string()),
                    vout: Some(input.previous_output.index),
                    script_sig: Some(ScriptSig {
                        asm: input.unlocking_script.to_asm_str(true),
                        hex: input.unlocking_script.to_hex(),
                    }),
                    sequence: input.sequence,
                }
            }
        })
        .collect()
}

fn vout_list(tx: &Transaction) -> Vec<Vout> {
    tx.outputs
        .iter()
        .enumerate()
        .map(|(n, output)| Vout {
            value: amount_to_decimal(output.value),
            n: n as u32,
            script_pub_key: script_pub_key(&output.locking_script),
        })
        .collect()
}

fn script_pub_key(script: &Script) -> ScriptPubKeyResult {
    ScriptPubKeyResult {
        asm: script.to_asm_str(false),
        hex: script.to_hex(),
    }
}
