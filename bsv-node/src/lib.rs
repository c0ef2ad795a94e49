#![deny(missing_docs)]

//! BSV node - transaction resolution and raw-transaction admission.
//!
//! Re-exports the node's transaction-layer components for convenient
//! single-crate usage.

pub use bsv_primitives as primitives;
pub use bsv_script as script;
pub use bsv_transaction as transaction;
pub use bsv_chainstate as chainstate;
pub use bsv_rawtx as rawtx;
