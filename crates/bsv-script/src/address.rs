/// Base58Check address handling.
///
/// Decodes and encodes P2PKH and P2SH addresses for mainnet and testnet and
/// maps them to their standard locking scripts. The `AddressCodec` trait is
/// the seam the raw-transaction builder decodes destination addresses
/// through.

use std::fmt;

use bsv_primitives::base58::{check_decode, check_encode};

use crate::{Script, ScriptError};

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Mainnet P2SH address version byte.
const MAINNET_P2SH: u8 = 0x05;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;
/// Testnet P2SH address version byte.
const TESTNET_P2SH: u8 = 0xc4;

/// Network an address belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet (P2PKH addresses start with '1', P2SH with '3').
    #[default]
    Mainnet,
    /// Testnet (P2PKH addresses start with 'm' or 'n', P2SH with '2').
    Testnet,
}

/// What the 20-byte address payload hashes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    PubKeyHash,
    ScriptHash,
}

/// A decoded Base58Check address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub kind: AddressKind,
    pub network: Network,
    /// HASH160 of the public key or redeem script.
    pub hash: [u8; 20],
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// The network and kind are taken from the version byte.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let decoded = check_decode(addr)
            .map_err(|e| ScriptError::InvalidAddress(format!("{}: {}", addr, e)))?;
        let (&version, payload) = decoded
            .split_first()
            .ok_or_else(|| ScriptError::InvalidAddressLength(addr.to_string()))?;
        let hash: [u8; 20] = payload
            .try_into()
            .map_err(|_| ScriptError::InvalidAddressLength(addr.to_string()))?;

        let (kind, network) = match version {
            MAINNET_P2PKH => (AddressKind::PubKeyHash, Network::Mainnet),
            MAINNET_P2SH => (AddressKind::ScriptHash, Network::Mainnet),
            TESTNET_P2PKH => (AddressKind::PubKeyHash, Network::Testnet),
            TESTNET_P2SH => (AddressKind::ScriptHash, Network::Testnet),
            other => return Err(ScriptError::UnsupportedAddressVersion(other)),
        };
        Ok(Address { kind, network, hash })
    }

    pub fn from_public_key_hash(hash: [u8; 20], network: Network) -> Self {
        Address { kind: AddressKind::PubKeyHash, network, hash }
    }

    pub fn from_script_hash(hash: [u8; 20], network: Network) -> Self {
        Address { kind: AddressKind::ScriptHash, network, hash }
    }

    fn version(&self) -> u8 {
        match (self.kind, self.network) {
            (AddressKind::PubKeyHash, Network::Mainnet) => MAINNET_P2PKH,
            (AddressKind::ScriptHash, Network::Mainnet) => MAINNET_P2SH,
            (AddressKind::PubKeyHash, Network::Testnet) => TESTNET_P2PKH,
            (AddressKind::ScriptHash, Network::Testnet) => TESTNET_P2SH,
        }
    }

    /// The standard locking script paying to this address.
    pub fn locking_script(&self) -> Script {
        match self.kind {
            AddressKind::PubKeyHash => Script::new_p2pkh(&self.hash),
            AddressKind::ScriptHash => Script::new_p2sh(&self.hash),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.version());
        payload.extend_from_slice(&self.hash);
        f.write_str(&check_encode(&payload))
    }
}

/// Decodes destination address strings into addresses for one network.
pub trait AddressCodec: Send + Sync {
    fn decode_address(&self, addr: &str) -> Result<Address, ScriptError>;
}

/// Base58Check codec that only accepts addresses of its configured network.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base58AddressCodec {
    pub network: Network,
}

impl Base58AddressCodec {
    pub fn new(network: Network) -> Self {
        Base58AddressCodec { network }
    }
}

impl AddressCodec for Base58AddressCodec {
    fn decode_address(&self, addr: &str) -> Result<Address, ScriptError> {
        let address = Address::from_string(addr)?;
        if address.network != self.network {
            return Err(ScriptError::WrongNetwork(addr.to_string()));
        }
        Ok(address)
    }
}
