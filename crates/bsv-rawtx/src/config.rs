//! Configuration for the raw-transaction service.

use serde::{Deserialize, Serialize};

use bsv_chainstate::MAX_PROBE_OUTPUT_INDEX;
use bsv_script::Network;

use crate::RpcError;

/// Default implicit fee ceiling for `sendrawtransaction`, in satoshis.
pub const DEFAULT_MAX_RAW_TX_FEE: i64 = 10_000;

/// Settings for `RawTxRpc`.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTxConfig {
    /// Whether the persistent transaction index is enabled.
    pub tx_index: bool,
    /// Fee ceiling applied unless the caller allows high fees.
    pub max_tx_fee: i64,
    /// Exclusive output-index ceiling for the slow-path coin probe.
    pub probe_ceiling: u32,
    /// Network whose addresses `createrawtransaction` accepts.
    pub network: Network,
}

impl Default for RawTxConfig {
    fn default() -> Self {
        Self {
            tx_index: false,
            max_tx_fee: DEFAULT_MAX_RAW_TX_FEE,
            probe_ceiling: MAX_PROBE_OUTPUT_INDEX,
            network: Network::Mainnet,
        }
    }
}

impl RawTxConfig {
    /// Parse a JSON configuration object.
    pub fn from_json_str(json: &str) -> Result<Self, RpcError> {
        let config: RawTxConfig = serde_json::from_str(json)
            .map_err(|e| RpcError::InvalidParameter(format!("invalid config: {}", e)))?;
        if config.max_tx_fee < 0 {
            return Err(RpcError::InvalidParameter(
                "invalid config: max_tx_fee must not be negative".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RawTxConfig::default();
        assert!(!config.tx_index);
        assert_eq!(config.max_tx_fee, 10_000);
        assert_eq!(config.probe_ceiling, 11_000);
        assert_eq!(config.network, Network::Mainnet);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RawTxConfig::from_json_str(r#"{"tx_index": true, "network": "testnet"}"#).unwrap();
        assert!(config.tx_index);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.max_tx_fee, DEFAULT_MAX_RAW_TX_FEE);
        assert_eq!(RawTxConfig::from_json_str("{}").unwrap(), RawTxConfig::default());
    }

    #[test]
    fn test_overrides_and_rejections() {
        let config = RawTxConfig::from_json_str(r#"{"max_tx_fee": 0, "probe_ceiling": 16}"#).unwrap();
        assert_eq!(config.max_tx_fee, 0);
        assert_eq!(config.probe_ceiling, 16);

        assert!(RawTxConfig::from_json_str(r#"{"max_tx_fee": -1}"#).is_err());
        assert!(RawTxConfig::from_json_str(r#"{"network": "regtest"}"#).is_err());
        assert!(RawTxConfig::from_json_str("not json").is_err());
    }
}
