/// Script type - a sequence of opcodes and data pushes.
///
/// Scripts appear in transaction inputs (unlocking) and outputs (locking).
/// The `Script` newtype wraps the raw bytes and provides construction,
/// classification, hex/serde encoding, and the disassembly used by RPC
/// display output together with its inverse assembler.

use std::fmt;

use crate::chunk::{decode_script, push_data_prefix, read_op, ScriptChunk};
use crate::flags::ScriptFlags;
use crate::opcodes::*;
use crate::scriptnum::{ScriptNum, DEFAULT_MAX_NUM_SIZE};
use crate::sigencoding::{check_signature_encoding, SIGHASH_FORKID};
use crate::ScriptError;

/// Scripts larger than this are provably unspendable.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Literal token emitted when disassembly hits an undecodable instruction.
pub const ASM_ERROR_TOKEN: &str = "[error]";

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

/// One token of a disassembled script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsmToken {
    /// A push of at most four bytes, read as a script number.
    Number(i64),
    /// A push whose payload passed the strict signature encoding check.
    Signature { sig: Vec<u8>, hash_type: u8 },
    /// Any other push.
    Data(Vec<u8>),
    /// A non-push opcode.
    Opcode(u8),
    /// Decoding stopped at a malformed instruction.
    Error,
}

impl fmt::Display for AsmToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmToken::Number(n) => write!(f, "{}", n),
            // The hash type is not annotated; signatures render as hex.
            AsmToken::Signature { sig, .. } => f.write_str(&hex::encode(sig)),
            AsmToken::Data(data) => f.write_str(&hex::encode(data)),
            AsmToken::Opcode(op) => f.write_str(opcode_name(*op)),
            AsmToken::Error => f.write_str(ASM_ERROR_TOKEN),
        }
    }
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Assemble a script from whitespace-separated ASM tokens.
    ///
    /// Tokens are tried in order as:
    /// 1. a canonical decimal integer within the 4-byte script number range,
    ///    emitted as `OP_0`, `OP_1NEGATE`, `OP_1`..`OP_16` or a number push;
    /// 2. an opcode mnemonic such as `OP_DUP`;
    /// 3. an even-length hex string, emitted as a data push.
    ///
    /// Anything else, including the `[error]` token, fails with
    /// `ScriptError::InvalidAsmToken`. Reassembling the output of
    /// `to_asm_str` yields a script that disassembles to the same tokens.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            if let Some(n) = parse_asm_number(token) {
                script.append_number(n)?;
            } else if let Some(op) = opcode_from_name(token) {
                script.append_opcode(op)?;
            } else if token.len() % 2 == 0 {
                let data = hex::decode(token)
                    .map_err(|_| ScriptError::InvalidAsmToken(token.to_string()))?;
                script.append_push_data(&data)?;
            } else {
                return Err(ScriptError::InvalidAsmToken(token.to_string()));
            }
        }
        Ok(script)
    }

    /// Standard pay-to-public-key-hash locking script.
    pub fn new_p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(25);
        b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(pubkey_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script(b)
    }

    /// Standard pay-to-script-hash locking script.
    pub fn new_p2sh(script_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(23);
        b.extend_from_slice(&[OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(script_hash);
        b.push(OP_EQUAL);
        Script(b)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the whole script into chunks, failing on a truncated push.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    // -----------------------------------------------------------------------
    // Disassembly
    // -----------------------------------------------------------------------

    /// Tokenize the script for display.
    ///
    /// Pushes of up to four bytes become numbers (non-minimal encodings
    /// accepted). Longer pushes are data, or signatures when
    /// `attempt_sighash_decode` is set, the script is spendable and the
    /// payload passes strict signature encoding (with forkid enabled when
    /// the trailing byte carries the forkid bit). A malformed instruction
    /// produces a final `AsmToken::Error`.
    pub fn asm_tokens(&self, attempt_sighash_decode: bool) -> Vec<AsmToken> {
        let decode_sigs = attempt_sighash_decode && !self.is_unspendable();
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < self.0.len() {
            let chunk = match read_op(&self.0, &mut pos) {
                Ok(chunk) => chunk,
                Err(_) => {
                    tokens.push(AsmToken::Error);
                    break;
                }
            };
            if !chunk.is_push() {
                tokens.push(AsmToken::Opcode(chunk.op));
                continue;
            }
            let data = chunk.data.unwrap_or_default();
            if data.len() <= DEFAULT_MAX_NUM_SIZE {
                match ScriptNum::from_bytes(&data, false, DEFAULT_MAX_NUM_SIZE) {
                    Ok(n) => tokens.push(AsmToken::Number(n.value())),
                    Err(_) => {
                        tokens.push(AsmToken::Error);
                        break;
                    }
                }
            } else if decode_sigs && is_strict_signature(&data) {
                let hash_type = data[data.len() - 1];
                tokens.push(AsmToken::Signature { sig: data, hash_type });
            } else {
                tokens.push(AsmToken::Data(data));
            }
        }
        tokens
    }

    /// Render the script as space-separated ASM.
    ///
    /// Never fails: a malformed script ends with the `[error]` token.
    pub fn to_asm_str(&self, attempt_sighash_decode: bool) -> String {
        self.asm_tokens(attempt_sighash_decode)
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ASM without signature decoding.
    pub fn to_asm(&self) -> String {
        self.to_asm_str(false)
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Provably unspendable: starts with OP_RETURN or exceeds `MAX_SCRIPT_SIZE`.
    pub fn is_unspendable(&self) -> bool {
        self.0.first() == Some(&OP_RETURN) || self.0.len() > MAX_SCRIPT_SIZE
    }

    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append data with the smallest OP_PUSHDATA prefix that fits its length.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append a single non-push opcode.
    ///
    /// Push opcodes other than `OP_0` carry a payload and must go through
    /// `append_push_data`.
    pub fn append_opcode(&mut self, op: u8) -> Result<(), ScriptError> {
        if (OP_DATA_1..=OP_PUSHDATA4).contains(&op) {
            return Err(ScriptError::InvalidOpcodeType(op));
        }
        self.0.push(op);
        Ok(())
    }

    /// Append a number using the small-integer opcodes where possible.
    pub fn append_number(&mut self, n: i64) -> Result<(), ScriptError> {
        match n {
            0 => self.append_opcode(OP_0),
            -1 => self.append_opcode(OP_1NEGATE),
            1..=16 => self.append_opcode(OP_1 + (n as u8) - 1),
            _ => self.append_push_data(&ScriptNum(n).to_bytes()),
        }
    }
}

/// Whether `data` is a signature under strict encoding, with forkid enabled
/// when its trailing byte carries the forkid bit.
fn is_strict_signature(data: &[u8]) -> bool {
    let mut flags = ScriptFlags::VERIFY_STRICT_ENCODING;
    if data.last().is_some_and(|b| b & SIGHASH_FORKID != 0) {
        flags |= ScriptFlags::ENABLE_SIGHASH_FORKID;
    }
    check_signature_encoding(data, flags).is_ok()
}

/// Parse a token the disassembler could have produced for a number.
fn parse_asm_number(token: &str) -> Option<i64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if token == "-0" {
        return None;
    }
    let n: i64 = token.parse().ok()?;
    (n.abs() <= i32::MAX as i64).then_some(n)
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
