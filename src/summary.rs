//! Pricing Summary

use rusty_money::{Money, MoneyError, iso::Currency};

/// The computed totals for one checkout pass.
///
/// Derived, never stored: the caller recomputes it whenever the cart, the
/// selection, or a voucher choice changes.
#[derive(Debug, Clone, Copy)]
pub struct PricingSummary<'a> {
    product_cost: Money<'a, Currency>,
    product_discount: Money<'a, Currency>,
    subtotal: Money<'a, Currency>,
    brand_voucher_discount: Money<'a, Currency>,
    platform_voucher_discount: Money<'a, Currency>,
    payable: Money<'a, Currency>,
}

impl<'a> PricingSummary<'a> {
    /// Creates a new summary with the given totals.
    #[must_use]
    pub fn new(
        product_cost: Money<'a, Currency>,
        product_discount: Money<'a, Currency>,
        subtotal: Money<'a, Currency>,
        brand_voucher_discount: Money<'a, Currency>,
        platform_voucher_discount: Money<'a, Currency>,
        payable: Money<'a, Currency>,
    ) -> Self {
        Self {
            product_cost,
            product_discount,
            subtotal,
            brand_voucher_discount,
            platform_voucher_discount,
            payable,
        }
    }

    /// Total cost of the selected items at original unit prices.
    pub fn product_cost(&self) -> Money<'a, Currency> {
        self.product_cost
    }

    /// Item-level discount already reflected in the effective unit prices.
    pub fn product_discount(&self) -> Money<'a, Currency> {
        self.product_discount
    }

    /// Total of the selected items at effective unit prices, before vouchers.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total discount from the chosen brand vouchers.
    pub fn brand_voucher_discount(&self) -> Money<'a, Currency> {
        self.brand_voucher_discount
    }

    /// Discount from the chosen platform voucher.
    pub fn platform_voucher_discount(&self) -> Money<'a, Currency> {
        self.platform_voucher_discount
    }

    /// The final payable amount.
    pub fn payable(&self) -> Money<'a, Currency> {
        self.payable
    }

    /// Total savings against the original product cost.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.product_cost.sub(self.payable)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::VND;
    use testresult::TestResult;

    use super::*;

    fn summary<'a>() -> PricingSummary<'a> {
        PricingSummary::new(
            Money::from_minor(280_000, VND),
            Money::from_minor(20_000, VND),
            Money::from_minor(260_000, VND),
            Money::from_minor(30_000, VND),
            Money::from_minor(23_000, VND),
            Money::from_minor(207_000, VND),
        )
    }

    #[test]
    fn accessors_return_totals() {
        let summary = summary();

        assert_eq!(summary.product_cost(), Money::from_minor(280_000, VND));
        assert_eq!(summary.product_discount(), Money::from_minor(20_000, VND));
        assert_eq!(summary.subtotal(), Money::from_minor(260_000, VND));
        assert_eq!(
            summary.brand_voucher_discount(),
            Money::from_minor(30_000, VND)
        );
        assert_eq!(
            summary.platform_voucher_discount(),
            Money::from_minor(23_000, VND)
        );
        assert_eq!(summary.payable(), Money::from_minor(207_000, VND));
    }

    #[test]
    fn savings_subtract_payable_from_cost() -> TestResult {
        let summary = summary();

        assert_eq!(summary.savings()?, Money::from_minor(73_000, VND));

        Ok(())
    }
}
