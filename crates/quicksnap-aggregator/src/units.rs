//! Fixed point token amounts to and from floats.

use ethers::types::U256;
use ethers::utils::{format_units, parse_units};
use quicksnap_utils::{Error, Result};

/// Decimals of gauge weights.
pub const GAUGE_WEIGHT_DECIMALS: u8 = 18;

/// `raw / 10^decimals`, as a float.
pub fn to_human_amount(raw: U256, decimals: u8) -> Result<f64> {
    let formatted = format_units(raw, u32::from(decimals))?;
    Ok(formatted.parse()?)
}

/// `amount * 10^decimals`, in the token's smallest unit.
///
/// Fails for negative or non finite amounts, and for amounts more precise
/// than the token.
pub fn to_raw_amount(amount: f64, decimals: u8) -> Result<U256> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    let raw = parse_units(amount.to_string(), u32::from(decimals))?;
    Ok(raw.into())
}
