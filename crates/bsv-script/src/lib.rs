/// Script model for the raw-transaction layer.
///
/// Provides the Script type, opcode definitions, instruction decoding,
/// script numbers, signature encoding checks, display disassembly and the
/// Base58Check address codec.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod scriptnum;
pub mod flags;
pub mod sigencoding;
pub mod address;

mod error;
pub use error::{ScriptError, SigEncodingError};
pub use script::{AsmToken, Script};
pub use address::{Address, AddressCodec, AddressKind, Base58AddressCodec, Network};
pub use chunk::ScriptChunk;
pub use flags::ScriptFlags;
pub use scriptnum::ScriptNum;
