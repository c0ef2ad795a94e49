//! Consensus money range and conversion between decimal coin amounts and
//! integer satoshis.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::PrimitivesError;

/// Satoshis per coin.
pub const COIN: i64 = 100_000_000;

/// Upper bound of the consensus money range, in satoshis.
pub const MAX_MONEY: i64 = 21_000_000 * COIN;

/// Fractional decimal digits an amount may carry.
pub const AMOUNT_DECIMALS: u32 = 8;

/// Whether `value` lies within `[0, MAX_MONEY]`.
pub fn money_range(value: i64) -> bool {
    (0..=MAX_MONEY).contains(&value)
}

/// Convert a decimal coin amount into satoshis.
///
/// Fails with `InvalidAmount` when the amount carries more than eight
/// significant fractional digits or does not fit an `i64`, and with
/// `AmountOutOfRange` when the result falls outside the money range.
pub fn amount_from_decimal(amount: Decimal) -> Result<i64, PrimitivesError> {
    let normalized = amount.normalize();
    if normalized.scale() > AMOUNT_DECIMALS {
        return Err(PrimitivesError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            amount, AMOUNT_DECIMALS
        )));
    }
    let satoshis = normalized
        .checked_mul(Decimal::from(COIN))
        .and_then(|v| v.to_i64())
        .ok_or_else(|| PrimitivesError::InvalidAmount(amount.to_string()))?;
    if !money_range(satoshis) {
        return Err(PrimitivesError::AmountOutOfRange(satoshis));
    }
    Ok(satoshis)
}

/// Render satoshis as a decimal coin amount with eight fractional digits.
pub fn amount_to_decimal(satoshis: i64) -> Decimal {
    Decimal::new(satoshis, AMOUNT_DECIMALS)
}
