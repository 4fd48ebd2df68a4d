//! Pricing

use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    items::BrandId,
    selection::Selection,
    summary::PricingSummary,
    vouchers::{Voucher, VoucherError},
};

/// Errors that can occur while computing totals.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A line or order total overflowed the minor-unit range.
    #[error("total overflowed minor units")]
    Overflow,

    /// Wrapped voucher calculation error.
    #[error(transparent)]
    Voucher(#[from] VoucherError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Aggregated totals over the selected cart items, before any voucher.
#[derive(Debug, Clone, Copy)]
pub struct CartTotals<'a> {
    /// Sum of original unit price times quantity over the selection.
    pub product_cost: Money<'a, Currency>,

    /// Sum of effective unit price times quantity over the selection.
    pub subtotal: Money<'a, Currency>,

    /// Item-level discount already baked into the unit prices
    /// (`product_cost` minus `subtotal`).
    pub product_discount: Money<'a, Currency>,
}

/// Multiply a unit price by a quantity, in minor units.
fn line_minor(unit: &Money<'_, Currency>, quantity: u32) -> Result<i64, PricingError> {
    unit.to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Add two minor-unit amounts, surfacing overflow.
fn add_minor(acc: i64, amount: i64) -> Result<i64, PricingError> {
    acc.checked_add(amount).ok_or(PricingError::Overflow)
}

/// Calculates the pre-voucher totals over the selected cart items.
///
/// Identifiers in the selection that no longer exist in the cart are
/// skipped. An empty selection yields all-zero totals in the cart currency.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a total exceeded the minor-unit range.
/// - [`PricingError::Money`]: money arithmetic failed.
pub fn cart_totals<'a>(
    cart: &Cart<'a>,
    selection: &Selection,
) -> Result<CartTotals<'a>, PricingError> {
    let mut cost_minor = 0i64;
    let mut price_minor = 0i64;

    for item in cart.items().filter(|item| selection.contains(item.id())) {
        cost_minor = add_minor(
            cost_minor,
            line_minor(item.price().original(), item.quantity())?,
        )?;
        price_minor = add_minor(
            price_minor,
            line_minor(item.price().effective(), item.quantity())?,
        )?;
    }

    let product_cost = Money::from_minor(cost_minor, cart.currency());
    let subtotal = Money::from_minor(price_minor, cart.currency());
    let product_discount = product_cost.sub(subtotal)?;

    Ok(CartTotals {
        product_cost,
        subtotal,
        product_discount,
    })
}

/// Calculates one brand's selected subtotal at effective prices.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the subtotal exceeded the minor-unit range.
pub fn brand_subtotal<'a>(
    cart: &Cart<'a>,
    selection: &Selection,
    brand: BrandId,
) -> Result<Money<'a, Currency>, PricingError> {
    let mut minor = 0i64;

    for item in cart
        .brand_items(brand)
        .iter()
        .filter(|item| selection.contains(item.id()))
    {
        minor = add_minor(minor, line_minor(item.price().effective(), item.quantity())?)?;
    }

    Ok(Money::from_minor(minor, cart.currency()))
}

/// Calculates the total discount contributed by the chosen brand vouchers.
///
/// Each brand's contribution is independent: the voucher applies to that
/// brand's selected subtotal only, gated by its minimum order value and
/// clamped so it never exceeds the subtotal. Brands with nothing selected
/// contribute zero.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a total exceeded the minor-unit range.
/// - [`PricingError::Voucher`]: a voucher calculation failed.
pub fn brand_voucher_discount<'a>(
    cart: &Cart<'a>,
    selection: &Selection,
    vouchers: &FxHashMap<BrandId, Voucher<'a>>,
) -> Result<Money<'a, Currency>, PricingError> {
    let mut minor = 0i64;

    for (brand, voucher) in vouchers {
        let subtotal = brand_subtotal(cart, selection, *brand)?;
        let discount = voucher.discount_on(&subtotal)?;

        minor = add_minor(minor, discount.to_minor_units())?;
    }

    Ok(Money::from_minor(minor, cart.currency()))
}

/// Calculates the platform voucher discount.
///
/// The platform voucher applies after brand vouchers, to
/// `subtotal - brand_discount` floored at zero, so the same value is never
/// discounted twice. The result is within `[0, base]`.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a total exceeded the minor-unit range.
/// - [`PricingError::Voucher`]: the voucher calculation failed.
pub fn platform_voucher_discount<'a>(
    cart: &Cart<'a>,
    selection: &Selection,
    voucher: Option<&Voucher<'a>>,
    brand_discount: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let Some(voucher) = voucher else {
        return Ok(Money::from_minor(0, cart.currency()));
    };

    let totals = cart_totals(cart, selection)?;
    let base_minor = totals
        .subtotal
        .to_minor_units()
        .saturating_sub(brand_discount.to_minor_units())
        .max(0);
    let base = Money::from_minor(base_minor, cart.currency());

    Ok(voucher.discount_on(&base)?)
}

/// Computes the full pricing summary for one checkout pass.
///
/// All four inputs are read as one snapshot: cart contents, selection, the
/// per-brand voucher choices, and the platform voucher choice. The payable
/// amount is `subtotal - brand_discount - platform_discount`, floored at
/// zero.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a total exceeded the minor-unit range.
/// - [`PricingError::Voucher`]: a voucher calculation failed.
/// - [`PricingError::Money`]: money arithmetic failed.
pub fn price<'a>(
    cart: &Cart<'a>,
    selection: &Selection,
    brand_vouchers: &FxHashMap<BrandId, Voucher<'a>>,
    platform_voucher: Option<&Voucher<'a>>,
) -> Result<PricingSummary<'a>, PricingError> {
    let totals = cart_totals(cart, selection)?;
    let brand_discount = brand_voucher_discount(cart, selection, brand_vouchers)?;
    let platform_discount =
        platform_voucher_discount(cart, selection, platform_voucher, &brand_discount)?;

    let payable_minor = totals
        .subtotal
        .to_minor_units()
        .saturating_sub(brand_discount.to_minor_units())
        .saturating_sub(platform_discount.to_minor_units())
        .max(0);
    let payable = Money::from_minor(payable_minor, cart.currency());

    Ok(PricingSummary::new(
        totals.product_cost,
        totals.product_discount,
        totals.subtotal,
        brand_discount,
        platform_discount,
        payable,
    ))
}
