//! Price Strings

use std::str::FromStr;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::iso;

use crate::fixtures::FixtureError;

/// Parse a fixture price string of the form `"<amount> <CODE>"` (for
/// example `"2.50 GBP"` or `"100000 VND"`) into minor units and currency.
///
/// # Errors
///
/// - [`FixtureError::InvalidPrice`]: the string is malformed or the amount
///   does not land on a whole number of minor units.
/// - [`FixtureError::UnknownCurrency`]: the currency code is not an ISO
///   alpha code.
pub fn parse_price(value: &str) -> Result<(i64, &'static iso::Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(value.to_string());

    let mut parts = value.split_whitespace();
    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let currency =
        iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let Ok(amount) = Decimal::from_str(amount) else {
        return Err(invalid());
    };

    let Some(scale) = Decimal::from_i64(10_i64.pow(currency.exponent)) else {
        return Err(invalid());
    };

    let minor = amount.checked_mul(scale).ok_or_else(invalid)?;

    if minor != minor.trunc() {
        return Err(invalid());
    }

    let minor = minor.to_i64().ok_or_else(invalid)?;

    Ok((minor, currency))
}
