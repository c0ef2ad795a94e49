//! RPC-facing raw-transaction service.
//!
//! Each method takes its parsed command and returns the value the RPC
//! layer serializes. Transport and dispatch live elsewhere.

use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use bsv_chainstate::{BlockStore, ChainIndex, CoinView, TxIndex, TxPool};
use bsv_primitives::chainhash::Hash;
use bsv_script::{AddressCodec, Base58AddressCodec};

use crate::admission::{send_raw_transaction, RelayProcessor};
use crate::builder::{create_raw_transaction, TransactionInputRef};
use crate::locator::TxLocator;
use crate::result::TxRawResult;
use crate::{RawTxConfig, RpcError};

/// Reply of an RPC method that may be an accepted no-op.
///
/// `NotImplemented` is a successful call with nothing to report and
/// serializes as `null`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RpcReply<T> {
    Value(T),
    NotImplemented,
}

impl<T> RpcReply<T> {
    pub fn is_implemented(&self) -> bool {
        matches!(self, RpcReply::Value(_))
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            RpcReply::Value(v) => Some(v),
            RpcReply::NotImplemented => None,
        }
    }
}

impl<T: Serialize> Serialize for RpcReply<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RpcReply::Value(v) => v.serialize(serializer),
            RpcReply::NotImplemented => serializer.serialize_none(),
        }
    }
}

/// `getrawtransaction` reply: wire hex, or the verbose description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawTransactionReply {
    Hex(String),
    Verbose(Box<TxRawResult>),
}

// -----------------------------------------------------------------------
// Commands
// -----------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GetRawTransactionCmd {
    pub txid: String,
    /// Non-zero requests the verbose result.
    #[serde(default)]
    pub verbose: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreateRawTransactionCmd {
    pub inputs: Vec<TransactionInputRef>,
    pub amounts: IndexMap<String, Decimal>,
    #[serde(default, rename = "locktime")]
    pub lock_time: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SendRawTransactionCmd {
    #[serde(rename = "hexstring")]
    pub hex_tx: String,
    #[serde(default, rename = "allowhighfees")]
    pub allow_high_fees: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DecodeRawTransactionCmd {
    #[serde(rename = "hexstring")]
    pub hex_tx: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DecodeScriptCmd {
    #[serde(rename = "hexstring")]
    pub hex_script: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SignRawTransactionCmd {
    #[serde(rename = "hexstring")]
    pub hex_tx: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GetTxOutProofCmd {
    pub txids: Vec<String>,
    #[serde(default)]
    pub blockhash: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct VerifyTxOutProofCmd {
    pub proof: String,
}

// -----------------------------------------------------------------------
// Service
// -----------------------------------------------------------------------

/// Shared handles to the node state the raw-transaction methods read.
#[derive(Clone)]
pub struct NodeContext {
    pub coins: Arc<dyn CoinView>,
    pub pool: Arc<dyn TxPool>,
    /// Only consulted when the configuration enables the index.
    pub tx_index: Option<Arc<dyn TxIndex>>,
    pub chain: Arc<dyn ChainIndex>,
    pub blocks: Arc<dyn BlockStore>,
    pub relay: Arc<dyn RelayProcessor>,
}

pub struct RawTxRpc {
    config: RawTxConfig,
    locator: TxLocator,
    context: NodeContext,
    addresses: Box<dyn AddressCodec>,
}

impl RawTxRpc {
    /// Build the service. Addresses are decoded for `config.network`.
    pub fn new(config: RawTxConfig, context: NodeContext) -> Self {
        let addresses = Box::new(Base58AddressCodec::new(config.network));
        Self::with_address_codec(config, context, addresses)
    }

    pub fn with_address_codec(
        config: RawTxConfig,
        context: NodeContext,
        addresses: Box<dyn AddressCodec>,
    ) -> Self {
        let mut locator = TxLocator::new(
            context.pool.clone(),
            context.coins.clone(),
            context.chain.clone(),
            context.blocks.clone(),
            config.probe_ceiling,
        );
        if config.tx_index {
            match &context.tx_index {
                Some(index) => locator = locator.with_tx_index(index.clone()),
                None => debug!("tx_index enabled but no index supplied; index lookups skipped"),
            }
        }
        RawTxRpc { config, locator, context, addresses }
    }

    pub fn config(&self) -> &RawTxConfig {
        &self.config
    }

    pub fn locator(&self) -> &TxLocator {
        &self.locator
    }

    pub fn get_raw_transaction(&self, cmd: &GetRawTransactionCmd) -> Result<RawTransactionReply, RpcError> {
        let hash = Hash::from_txid_hex(&cmd.txid).map_err(|_| RpcError::hex_decode(&cmd.txid))?;
        let located = self
            .locator
            .locate(&hash, true)
            .map_err(|reason| RpcError::not_found(reason, self.config.tx_index))?;

        if cmd.verbose.unwrap_or(0) == 0 {
            return Ok(RawTransactionReply::Hex(located.tx.to_hex()));
        }
        let result = TxRawResult::new(&located.tx, located.block_hash.as_ref(), self.context.chain.as_ref());
        Ok(RawTransactionReply::Verbose(Box::new(result)))
    }

    /// Returns the unsigned transaction as wire hex.
    pub fn create_raw_transaction(&self, cmd: &CreateRawTransactionCmd) -> Result<String, RpcError> {
        let tx = create_raw_transaction(&cmd.inputs, &cmd.amounts, cmd.lock_time, self.addresses.as_ref())?;
        Ok(tx.to_hex())
    }

    /// Returns the transaction hash in display form.
    pub fn send_raw_transaction(&self, cmd: &SendRawTransactionCmd) -> Result<String, RpcError> {
        let hash = send_raw_transaction(
            &cmd.hex_tx,
            cmd.allow_high_fees.unwrap_or(false),
            self.config.max_tx_fee,
            self.context.coins.as_ref(),
            self.context.pool.as_ref(),
            self.context.relay.as_ref(),
        )?;
        Ok(hash.to_string())
    }

    pub fn decode_raw_transaction(&self, _cmd: &DecodeRawTransactionCmd) -> Result<RpcReply<TxRawResult>, RpcError> {
        Ok(RpcReply::NotImplemented)
    }

    pub fn decode_script(&self, _cmd: &DecodeScriptCmd) -> Result<RpcReply<String>, RpcError> {
        Ok(RpcReply::NotImplemented)
    }

    pub fn sign_raw_transaction(&self, _cmd: &SignRawTransactionCmd) -> Result<RpcReply<String>, RpcError> {
        Ok(RpcReply::NotImplemented)
    }

    pub fn get_tx_out_proof(&self, _cmd: &GetTxOutProofCmd) -> Result<RpcReply<String>, RpcError> {
        Ok(RpcReply::NotImplemented)
    }

    pub fn verify_tx_out_proof(&self, _cmd: &VerifyTxOutProofCmd) -> Result<RpcReply<Vec<String>>, RpcError> {
        Ok(RpcReply::NotImplemented)
    }
}
