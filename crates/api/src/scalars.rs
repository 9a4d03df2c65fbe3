//! Provider scalar conversions.
//!
//! Providers ship balances as integer strings in the token's smallest unit;
//! derivations work in token units as `Decimal`.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;

/// Parse a hex address string. Parsing is case-insensitive.
pub fn parse_address(s: &str) -> Option<Address> {
    Address::from_str(s).ok()
}

/// Parse a provider integer string into token units by shifting `decimals`.
///
/// Returns `None` for malformed strings and for amounts beyond `Decimal`
/// range; callers skip such entries rather than fail the whole response.
pub fn parse_units(raw: &str, decimals: u8) -> Option<Decimal> {
    let value = U256::from_str(raw).ok()?;
    let value = u128::try_from(value).ok()?;
    let value = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(value, u32::from(decimals)).ok()
}
