//! Vouchers

use std::fmt;

use percentage::PercentageDecimal;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::BrandId;

/// Identifier of a voucher, as issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoucherId(u64);

impl VoucherId {
    /// Creates a new voucher identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        VoucherId(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Errors specific to voucher discount calculations.
#[derive(Debug, Error)]
pub enum VoucherError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A voucher amount's currency differs from the base currency (voucher currency, base currency).
    #[error("Voucher currency {0} does not match order currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The discount a voucher grants on an eligible base amount.
pub enum DiscountKind<'a> {
    /// A fixed amount off, clamped to the base it discounts.
    FixedAmount(Money<'a, Currency>),

    /// A percentage of the base, optionally capped at a maximum amount.
    Percentage {
        /// The discount rate.
        rate: PercentageDecimal,

        /// Maximum discount amount, if the voucher carries a cap.
        cap: Option<Money<'a, Currency>>,
    },
}

impl fmt::Debug for DiscountKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountKind::FixedAmount(amount) => {
                f.debug_tuple("FixedAmount").field(amount).finish()
            }
            DiscountKind::Percentage { rate, cap } => f
                .debug_struct("Percentage")
                .field("rate", &rate.value())
                .field("cap", cap)
                .finish(),
        }
    }
}

impl Clone for DiscountKind<'_> {
    fn clone(&self) -> Self {
        match self {
            DiscountKind::FixedAmount(amount) => DiscountKind::FixedAmount(*amount),
            DiscountKind::Percentage { rate, cap } => DiscountKind::Percentage {
                rate: percentage::Percentage::from_decimal(rate.value()),
                cap: *cap,
            },
        }
    }
}

/// A discount voucher, scoped either to one brand or to the whole order.
///
/// Brand vouchers carry the brand they apply to; a platform voucher carries
/// no brand scope. Eligibility requires the discounted base to reach the
/// voucher's minimum order value; a subtotal exactly equal to the minimum
/// qualifies.
#[derive(Debug, Clone)]
pub struct Voucher<'a> {
    id: VoucherId,
    brand: Option<BrandId>,
    min_order_value: Money<'a, Currency>,
    discount: DiscountKind<'a>,
}

impl<'a> Voucher<'a> {
    /// Creates a voucher scoped to a single brand.
    #[must_use]
    pub fn for_brand(
        id: VoucherId,
        brand: BrandId,
        min_order_value: Money<'a, Currency>,
        discount: DiscountKind<'a>,
    ) -> Self {
        Self {
            id,
            brand: Some(brand),
            min_order_value,
            discount,
        }
    }

    /// Creates a platform-wide voucher.
    #[must_use]
    pub fn for_platform(
        id: VoucherId,
        min_order_value: Money<'a, Currency>,
        discount: DiscountKind<'a>,
    ) -> Self {
        Self {
            id,
            brand: None,
            min_order_value,
            discount,
        }
    }

    /// Returns the voucher identifier.
    pub fn id(&self) -> VoucherId {
        self.id
    }

    /// Returns the brand scope, or `None` for a platform voucher.
    pub fn brand(&self) -> Option<BrandId> {
        self.brand
    }

    /// Returns the minimum order value the base must reach.
    pub fn min_order_value(&self) -> &Money<'a, Currency> {
        &self.min_order_value
    }

    /// Returns the discount specification.
    pub fn discount(&self) -> &DiscountKind<'a> {
        &self.discount
    }

    /// Calculates the discount this voucher grants on the given base amount.
    ///
    /// Returns zero when the base is below the minimum order value. The
    /// result is always within `[0, base]`: a voucher never discounts more
    /// than the amount it applies to.
    ///
    /// # Errors
    ///
    /// - [`VoucherError::CurrencyMismatch`]: the voucher's money fields are
    ///   in a different currency than the base.
    /// - [`VoucherError::PercentConversion`]: a percentage calculation could
    ///   not be safely represented in minor units.
    pub fn discount_on(
        &self,
        base: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, VoucherError> {
        self.check_currency(base)?;

        let base_minor = base.to_minor_units();
        let zero = Money::from_minor(0, base.currency());

        if base_minor < self.min_order_value.to_minor_units() || base_minor <= 0 {
            return Ok(zero);
        }

        let raw_minor = match &self.discount {
            DiscountKind::FixedAmount(amount) => amount.to_minor_units(),
            DiscountKind::Percentage { rate, cap } => {
                let percent_minor = percent_of_minor(rate, base_minor)?;
                let cap_minor = cap.as_ref().map_or(base_minor, |cap| cap.to_minor_units());

                percent_minor.min(cap_minor)
            }
        };

        Ok(Money::from_minor(
            raw_minor.clamp(0, base_minor),
            base.currency(),
        ))
    }

    fn check_currency(&self, base: &Money<'a, Currency>) -> Result<(), VoucherError> {
        let mut currencies = vec![self.min_order_value.currency()];

        match &self.discount {
            DiscountKind::FixedAmount(amount) => currencies.push(amount.currency()),
            DiscountKind::Percentage { cap, .. } => {
                if let Some(cap) = cap {
                    currencies.push(cap.currency());
                }
            }
        }

        for currency in currencies {
            if currency != base.currency() {
                return Err(VoucherError::CurrencyMismatch(
                    currency.iso_alpha_code,
                    base.currency().iso_alpha_code,
                ));
            }
        }

        Ok(())
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
fn percent_of_minor(percent: &PercentageDecimal, minor: i64) -> Result<i64, VoucherError> {
    let Some(percent) = Decimal::from_f64_retain(percent.value()) else {
        return Err(VoucherError::PercentConversion);
    };

    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let Some(applied) = percent.checked_mul(minor) else {
        return Err(VoucherError::PercentConversion);
    };

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(rounded) = rounded.to_i64() else {
        return Err(VoucherError::PercentConversion);
    };

    Ok(rounded)
}
