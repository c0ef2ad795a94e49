use std::fmt;

/// Why the locator could not produce a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Not pooled, and the persistent index is disabled.
    IndexDisabled,
    /// Not pooled and not indexed; the slow path was not allowed.
    PoolMiss,
    /// The slow path ran and found no matching transaction.
    SlowPathExhausted,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotFoundReason::IndexDisabled => "index disabled",
            NotFoundReason::PoolMiss => "pool miss",
            NotFoundReason::SlowPathExhausted => "slow path exhausted",
        })
    }
}

/// Errors surfaced by the raw-transaction RPC operations.
///
/// `code()` gives the numeric code reported at the RPC boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// Malformed hex or wire bytes.
    #[error("{0}")]
    Decode(String),

    /// No transaction could be located.
    #[error("{message}")]
    NotFound { reason: NotFoundReason, message: String },

    #[error("{0}")]
    InvalidAddressOrKey(String),

    #[error("{0}")]
    InvalidParameter(String),

    /// The acceptance pipeline refused the transaction.
    #[error("{0}")]
    TransactionRejected(String),

    /// The transaction already has unspent outputs on the active chain.
    #[error("{0}")]
    AlreadyInChain(String),
}

impl RpcError {
    pub fn code(&self) -> i32 {
        match self {
            RpcError::Decode(_) => -22,
            RpcError::NotFound { .. } | RpcError::InvalidAddressOrKey(_) => -5,
            RpcError::InvalidParameter(_) => -8,
            RpcError::TransactionRejected(_) => -26,
            RpcError::AlreadyInChain(_) => -27,
        }
    }

    /// Decode error for an argument that is not valid hex (or not a valid hash).
    pub fn hex_decode(arg: &str) -> Self {
        RpcError::Decode(format!("Argument must be hexadecimal string (not {:?})", arg))
    }

    /// Not-found error whose message depends on whether the index is enabled.
    pub fn not_found(reason: NotFoundReason, tx_index: bool) -> Self {
        let message = if tx_index {
            "No such mempool or blockchain transaction"
        } else {
            "No such mempool transaction. Use -txindex to enable blockchain transaction queries. Use gettransaction for wallet transactions."
        };
        RpcError::NotFound { reason, message: message.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(RpcError::Decode(String::new()).code(), -22);
        assert_eq!(RpcError::not_found(NotFoundReason::PoolMiss, true).code(), -5);
        assert_eq!(RpcError::InvalidAddressOrKey(String::new()).code(), -5);
        assert_eq!(RpcError::InvalidParameter(String::new()).code(), -8);
        assert_eq!(RpcError::TransactionRejected(String::new()).code(), -26);
        assert_eq!(RpcError::AlreadyInChain(String::new()).code(), -27);
    }

    #[test]
    fn test_not_found_messages() {
        let with_index = RpcError::not_found(NotFoundReason::SlowPathExhausted, true);
        assert_eq!(with_index.to_string(), "No such mempool or blockchain transaction");

        let without = RpcError::not_found(NotFoundReason::IndexDisabled, false);
        assert!(without.to_string().starts_with("No such mempool transaction. Use -txindex"));
    }

    #[test]
    fn test_hex_decode_message() {
        assert_eq!(
            RpcError::hex_decode("xyz").to_string(),
            "Argument must be hexadecimal string (not \"xyz\")"
        );
    }
}
