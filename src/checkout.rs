//! Checkout

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::Cart,
    items::{BrandId, LineItemId},
    pricing::{self, PricingError},
    selection::Selection,
    summary::PricingSummary,
    vouchers::{Voucher, VoucherId},
};

/// Errors related to checkout session operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A voucher was chosen for a brand it is not scoped to (voucher, brand).
    #[error("Voucher {0:?} is not scoped to brand {1:?}")]
    BrandScopeMismatch(VoucherId, BrandId),

    /// A brand-scoped voucher was chosen as the platform voucher.
    #[error("Voucher {0:?} is brand-scoped and cannot apply platform-wide")]
    NotAPlatformVoucher(VoucherId),

    /// Wrapped pricing calculation error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One checkout session: the cart snapshot, the selection, and the chosen
/// vouchers.
///
/// Every mutation re-runs the voucher sweep, so reads always observe one
/// coherent snapshot: an empty selection carries no voucher choices, and a
/// chosen brand voucher whose discount has collapsed to zero is removed
/// rather than displayed as active.
#[derive(Debug)]
pub struct Checkout<'a> {
    cart: Cart<'a>,
    selection: Selection,
    brand_vouchers: FxHashMap<BrandId, Voucher<'a>>,
    platform_voucher: Option<Voucher<'a>>,
}

impl<'a> Checkout<'a> {
    /// Creates a session over the given cart with nothing selected.
    #[must_use]
    pub fn new(cart: Cart<'a>) -> Self {
        Self {
            cart,
            selection: Selection::new(),
            brand_vouchers: FxHashMap::default(),
            platform_voucher: None,
        }
    }

    /// Returns the current cart snapshot.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Returns the current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the chosen voucher for a brand, if any.
    pub fn brand_voucher(&self, brand: BrandId) -> Option<&Voucher<'a>> {
        self.brand_vouchers.get(&brand)
    }

    /// Returns the chosen platform voucher, if any.
    pub fn platform_voucher(&self) -> Option<&Voucher<'a>> {
        self.platform_voucher.as_ref()
    }

    /// Replaces the cart snapshot with freshly fetched contents.
    ///
    /// Runs the reconciliation pass of the selection against the new cart,
    /// then the voucher sweep. Items removed server-side fall out of the
    /// selection here.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a voucher recomputation fails.
    pub fn update_cart(&mut self, cart: Cart<'a>) -> Result<(), CheckoutError> {
        self.cart = cart;
        self.selection.reconcile(&self.cart);
        self.sweep_vouchers()
    }

    /// Toggles one item's selection. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a voucher recomputation fails.
    pub fn toggle_item(&mut self, id: LineItemId) -> Result<bool, CheckoutError> {
        let selected = self.toggle_known(id);
        self.sweep_vouchers()?;

        Ok(selected)
    }

    fn toggle_known(&mut self, id: LineItemId) -> bool {
        if !self.cart.contains(id) {
            // Stale id from an outdated render; treat as unselected.
            self.selection.deselect(id);
            return false;
        }

        self.selection.toggle(id)
    }

    /// Selects every item in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a voucher recomputation fails.
    pub fn select_all(&mut self) -> Result<(), CheckoutError> {
        self.selection.select_all(&self.cart);
        self.sweep_vouchers()
    }

    /// Selects every item of one brand.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a voucher recomputation fails.
    pub fn select_brand(&mut self, brand: BrandId) -> Result<(), CheckoutError> {
        self.selection.select_brand(&self.cart, brand);
        self.sweep_vouchers()
    }

    /// Deselects every item of one brand.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if a voucher recomputation fails.
    pub fn deselect_brand(&mut self, brand: BrandId) -> Result<(), CheckoutError> {
        self.selection.deselect_brand(&self.cart, brand);
        self.sweep_vouchers()
    }

    /// Clears the selection, which also clears every voucher choice.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.brand_vouchers.clear();
        self.platform_voucher = None;
    }

    /// Chooses a voucher for one brand, replacing any previous choice.
    ///
    /// The voucher must be scoped to that brand. If its discount computes to
    /// zero for the current selection it is swept away immediately, leaving
    /// the brand with no choice, the same end state a later reconciliation
    /// pass would produce.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::BrandScopeMismatch`]: the voucher is scoped to a
    ///   different brand or is platform-wide.
    /// - [`CheckoutError::Pricing`]: a voucher recomputation failed.
    pub fn choose_brand_voucher(
        &mut self,
        brand: BrandId,
        voucher: Voucher<'a>,
    ) -> Result<(), CheckoutError> {
        if voucher.brand() != Some(brand) {
            return Err(CheckoutError::BrandScopeMismatch(voucher.id(), brand));
        }

        self.brand_vouchers.insert(brand, voucher);
        self.sweep_vouchers()
    }

    /// Clears the voucher choice for one brand.
    pub fn clear_brand_voucher(&mut self, brand: BrandId) {
        self.brand_vouchers.remove(&brand);
    }

    /// Chooses the platform voucher, replacing any previous choice.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NotAPlatformVoucher`]: the voucher is brand-scoped.
    /// - [`CheckoutError::Pricing`]: a voucher recomputation failed.
    pub fn choose_platform_voucher(&mut self, voucher: Voucher<'a>) -> Result<(), CheckoutError> {
        if voucher.brand().is_some() {
            return Err(CheckoutError::NotAPlatformVoucher(voucher.id()));
        }

        self.platform_voucher = Some(voucher);
        self.sweep_vouchers()
    }

    /// Clears the platform voucher choice.
    pub fn clear_platform_voucher(&mut self) {
        self.platform_voucher = None;
    }

    /// Computes the pricing summary for the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a total or voucher computation fails.
    pub fn summary(&self) -> Result<PricingSummary<'a>, PricingError> {
        pricing::price(
            &self.cart,
            &self.selection,
            &self.brand_vouchers,
            self.platform_voucher.as_ref(),
        )
    }

    /// Drops voucher choices that no longer have any effect.
    ///
    /// An empty selection clears both choices. A brand voucher whose
    /// discount computes to zero (nothing of that brand selected, or the
    /// subtotal fell below its minimum) is removed so no ghost voucher is
    /// shown as active.
    fn sweep_vouchers(&mut self) -> Result<(), CheckoutError> {
        if self.selection.is_empty() {
            self.brand_vouchers.clear();
            self.platform_voucher = None;
            return Ok(());
        }

        let mut inert: SmallVec<[BrandId; 4]> = SmallVec::new();

        for (brand, voucher) in &self.brand_vouchers {
            let subtotal = pricing::brand_subtotal(&self.cart, &self.selection, *brand)
                .map_err(CheckoutError::Pricing)?;
            let discount = voucher
                .discount_on(&subtotal)
                .map_err(PricingError::Voucher)?;

            if discount.to_minor_units() == 0 {
                inert.push(*brand);
            }
        }

        for brand in inert {
            self.brand_vouchers.remove(&brand);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use percentage::Percentage;
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use crate::{
        items::{ItemPrice, LineItem},
        vouchers::DiscountKind,
    };

    use super::*;

    const AURORA: BrandId = BrandId::new(1);
    const BONSAI: BrandId = BrandId::new(2);

    fn item<'a>(id: u64, brand: BrandId, quantity: u32, unit_minor: i64) -> LineItem<'a> {
        LineItem::new(
            LineItemId::new(id),
            brand,
            quantity,
            ItemPrice::new(Money::from_minor(unit_minor, VND)),
        )
    }

    fn cart<'a>() -> Result<Cart<'a>, crate::cart::CartError> {
        Cart::with_groups(
            [
                (
                    AURORA,
                    vec![item(10, AURORA, 2, 100_000), item(11, AURORA, 1, 40_000)],
                ),
                (BONSAI, vec![item(20, BONSAI, 1, 150_000)]),
            ],
            VND,
        )
    }

    fn aurora_fixed<'a>() -> Voucher<'a> {
        Voucher::for_brand(
            VoucherId::new(1),
            AURORA,
            Money::from_minor(100_000, VND),
            DiscountKind::FixedAmount(Money::from_minor(50_000, VND)),
        )
    }

    fn platform_percent<'a>() -> Voucher<'a> {
        Voucher::for_platform(
            VoucherId::new(9),
            Money::from_minor(0, VND),
            DiscountKind::Percentage {
                rate: Percentage::from_decimal(0.10),
                cap: None,
            },
        )
    }

    #[test]
    fn summary_reflects_selection_and_vouchers() -> TestResult {
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;
        checkout.choose_brand_voucher(AURORA, aurora_fixed())?;
        checkout.choose_platform_voucher(platform_percent())?;

        let summary = checkout.summary()?;

        // 390_000 selected, 50_000 brand discount, 10% of 340_000 platform.
        assert_eq!(summary.subtotal(), Money::from_minor(390_000, VND));
        assert_eq!(
            summary.brand_voucher_discount(),
            Money::from_minor(50_000, VND)
        );
        assert_eq!(
            summary.platform_voucher_discount(),
            Money::from_minor(34_000, VND)
        );
        assert_eq!(summary.payable(), Money::from_minor(306_000, VND));

        Ok(())
    }

    #[test]
    fn clearing_selection_clears_vouchers() -> TestResult {
        // Scenario E: deselecting everything resets totals and choices.
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;
        checkout.choose_brand_voucher(AURORA, aurora_fixed())?;
        checkout.choose_platform_voucher(platform_percent())?;

        checkout.clear_selection();

        assert!(checkout.brand_voucher(AURORA).is_none());
        assert!(checkout.platform_voucher().is_none());

        let summary = checkout.summary()?;
        assert_eq!(summary.subtotal(), Money::from_minor(0, VND));
        assert_eq!(summary.payable(), Money::from_minor(0, VND));

        Ok(())
    }

    #[test]
    fn deselecting_last_brand_item_sweeps_its_voucher() -> TestResult {
        // Scenario F: the subtotal drops below the voucher minimum.
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;
        checkout.choose_brand_voucher(AURORA, aurora_fixed())?;

        // Only the 40_000 item remains selected for the brand, below the
        // 100_000 minimum.
        checkout.toggle_item(LineItemId::new(10))?;

        assert!(checkout.brand_voucher(AURORA).is_none());
        assert_eq!(
            checkout.summary()?.brand_voucher_discount(),
            Money::from_minor(0, VND)
        );

        Ok(())
    }

    #[test]
    fn update_cart_prunes_selection_and_vouchers() -> TestResult {
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;
        checkout.choose_brand_voucher(AURORA, aurora_fixed())?;

        // The backend removed both aurora items (sold out).
        let refreshed = Cart::with_groups([(BONSAI, vec![item(20, BONSAI, 1, 150_000)])], VND)?;
        checkout.update_cart(refreshed)?;

        assert!(!checkout.selection().contains(LineItemId::new(10)));
        assert!(checkout.selection().contains(LineItemId::new(20)));
        assert!(checkout.brand_voucher(AURORA).is_none());
        assert_eq!(
            checkout.summary()?.subtotal(),
            Money::from_minor(150_000, VND)
        );

        Ok(())
    }

    #[test]
    fn update_cart_emptying_everything_resets_state() -> TestResult {
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;
        checkout.choose_platform_voucher(platform_percent())?;

        checkout.update_cart(Cart::new(VND))?;

        assert!(checkout.selection().is_empty());
        assert!(checkout.platform_voucher().is_none());
        assert_eq!(checkout.summary()?.payable(), Money::from_minor(0, VND));

        Ok(())
    }

    #[test]
    fn choose_brand_voucher_rejects_foreign_scope() -> TestResult {
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;

        let result = checkout.choose_brand_voucher(BONSAI, aurora_fixed());

        assert!(matches!(
            result,
            Err(CheckoutError::BrandScopeMismatch(id, brand))
                if id == VoucherId::new(1) && brand == BONSAI
        ));

        Ok(())
    }

    #[test]
    fn choose_platform_voucher_rejects_brand_scope() -> TestResult {
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;

        let result = checkout.choose_platform_voucher(aurora_fixed());

        assert!(matches!(
            result,
            Err(CheckoutError::NotAPlatformVoucher(id)) if id == VoucherId::new(1)
        ));

        Ok(())
    }

    #[test]
    fn voucher_for_unselected_brand_is_swept_immediately() -> TestResult {
        let mut checkout = Checkout::new(cart()?);
        checkout.select_brand(BONSAI)?;

        checkout.choose_brand_voucher(AURORA, aurora_fixed())?;

        assert!(checkout.brand_voucher(AURORA).is_none());

        Ok(())
    }

    #[test]
    fn toggling_stale_id_is_harmless() -> TestResult {
        let mut checkout = Checkout::new(cart()?);

        let selected = checkout.toggle_item(LineItemId::new(999))?;

        assert!(!selected);
        assert!(checkout.selection().is_empty());

        Ok(())
    }

    #[test]
    fn platform_voucher_survives_partial_deselection() -> TestResult {
        let mut checkout = Checkout::new(cart()?);
        checkout.select_all()?;
        checkout.choose_platform_voucher(platform_percent())?;

        checkout.toggle_item(LineItemId::new(11))?;

        assert!(checkout.platform_voucher().is_some());

        Ok(())
    }
}
