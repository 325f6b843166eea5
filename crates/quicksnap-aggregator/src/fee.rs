//! Platform fee normalization.
//!
//! Incentive deposits are recorded net of a flat 5% platform fee, amounts
//! shown to voters are grossed back up.

/// The deposited share of a gross incentive, in percent.
pub const NET_SHARE_PERCENT: f64 = 95.0;

/// Number of digits after the decimal point in the shortest representation
/// of `value`, `0` for integral values.
#[must_use]
pub fn decimal_places(value: f64) -> usize {
    if value.fract() == 0.0 {
        return 0;
    }
    value
        .to_string()
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

/// Grosses a human token amount back up by the platform fee: `amount * 100 / 95`.
///
/// The result keeps at most one more decimal digit than `amount` has, it is
/// rounded (not truncated) to that precision when the division introduces
/// more. Negative amounts go through the same arithmetic.
#[must_use]
pub fn apply_incentive_fee(amount: f64) -> f64 {
    let gross = amount * 100.0 / NET_SHARE_PERCENT;
    let precision = decimal_places(amount) + 1;
    if decimal_places(gross) <= precision {
        return gross;
    }
    format!("{gross:.precision$}").parse().unwrap_or(gross)
}
