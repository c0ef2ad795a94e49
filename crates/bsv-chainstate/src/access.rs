//! Bounded coin probe by transaction hash.

use log::trace;

use bsv_primitives::chainhash::Hash;
use bsv_transaction::OutPoint;

use crate::coin::Coin;
use crate::view::CoinView;

/// Default exclusive ceiling on the output indices probed by `access_by_txid`.
///
/// A conservative bound on plausible output counts, not a protocol limit.
pub const MAX_PROBE_OUTPUT_INDEX: u32 = 11_000;

/// Return the lowest-indexed unspent coin of transaction `hash`.
///
/// Probes `(hash, 0)`, `(hash, 1)`, ... up to but excluding `ceiling` and
/// stops at the first hit. Unspent outputs at or beyond the ceiling are not
/// found. Each probe is a separate point lookup; no snapshot is held across
/// them.
pub fn access_by_txid(view: &dyn CoinView, hash: &Hash, ceiling: u32) -> Option<(u32, Coin)> {
    let hit = (0..ceiling).find_map(|index| {
        view.get_coin(&OutPoint::new(*hash, index))
            .map(|coin| (index, coin))
    });
    match &hit {
        Some((index, coin)) => trace!("coin probe {}: output {} at height {}", hash, index, coin.height),
        None => trace!("coin probe {}: no unspent output below {}", hash, ceiling),
    }
    hit
}
