//! Cart

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use smallvec::SmallVec;
use thiserror::Error;

use crate::items::{BrandId, LineItem, LineItemId};

/// Errors related to cart construction.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item, item currency, cart currency).
    #[error("Item {0:?} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineItemId, &'static str, &'static str),

    /// An item was grouped under a brand other than its own (item, group brand).
    #[error("Item {0:?} does not belong to brand group {1:?}")]
    BrandMismatch(LineItemId, BrandId),

    /// The same line item identifier appeared more than once.
    #[error("Duplicate line item {0:?}")]
    DuplicateItem(LineItemId),
}

/// The cart contents as fetched from the backend, grouped by brand.
///
/// Each line item belongs to exactly one brand group, and its own brand
/// reference must match the group it sits under. All prices share the cart
/// currency.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    groups: FxHashMap<BrandId, SmallVec<[LineItem<'a>; 10]>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Creates an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            groups: FxHashMap::default(),
            currency,
        }
    }

    /// Creates a cart from brand groups, validating the grouping invariants.
    ///
    /// # Errors
    ///
    /// - [`CartError::CurrencyMismatch`]: an item is priced in another currency.
    /// - [`CartError::BrandMismatch`]: an item sits under a foreign brand group.
    /// - [`CartError::DuplicateItem`]: a line item identifier repeats.
    pub fn with_groups(
        groups: impl IntoIterator<Item = (BrandId, Vec<LineItem<'a>>)>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Cart::new(currency);

        for (brand, items) in groups {
            for item in items {
                cart.check_item(brand, &item)?;
                cart.groups.entry(brand).or_default().push(item);
            }
        }

        Ok(cart)
    }

    fn check_item(&self, brand: BrandId, item: &LineItem<'a>) -> Result<(), CartError> {
        if item.brand() != brand {
            return Err(CartError::BrandMismatch(item.id(), brand));
        }

        for unit in [item.price().original(), item.price().effective()] {
            if unit.currency() != self.currency {
                return Err(CartError::CurrencyMismatch(
                    item.id(),
                    unit.currency().iso_alpha_code,
                    self.currency.iso_alpha_code,
                ));
            }
        }

        if self.contains(item.id()) {
            return Err(CartError::DuplicateItem(item.id()));
        }

        Ok(())
    }

    /// Returns the item with the given identifier, if present.
    pub fn get(&self, id: LineItemId) -> Option<&LineItem<'a>> {
        self.items().find(|item| item.id() == id)
    }

    /// Returns whether an item with the given identifier is in the cart.
    pub fn contains(&self, id: LineItemId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over all line items across every brand group.
    pub fn items(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.groups.values().flat_map(|items| items.iter())
    }

    /// Iterates over all line item identifiers.
    pub fn item_ids(&self) -> impl Iterator<Item = LineItemId> + '_ {
        self.items().map(LineItem::id)
    }

    /// Iterates over the brand identifiers present in the cart.
    pub fn brands(&self) -> impl Iterator<Item = BrandId> + '_ {
        self.groups.keys().copied()
    }

    /// Returns the items grouped under a brand, in cart order.
    pub fn brand_items(&self, brand: BrandId) -> &[LineItem<'a>] {
        self.groups.get(&brand).map_or(&[], SmallVec::as_slice)
    }

    /// Returns the total number of line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(SmallVec::len).sum()
    }

    /// Returns whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(SmallVec::is_empty)
    }

    /// Returns the cart currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use crate::items::ItemPrice;

    use super::*;

    fn item<'a>(id: u64, brand: u64, quantity: u32, minor: i64) -> LineItem<'a> {
        LineItem::new(
            LineItemId::new(id),
            BrandId::new(brand),
            quantity,
            ItemPrice::new(Money::from_minor(minor, GBP)),
        )
    }

    #[test]
    fn with_groups_builds_brand_groups() -> TestResult {
        let cart = Cart::with_groups(
            [
                (BrandId::new(1), vec![item(10, 1, 1, 100), item(11, 1, 2, 200)]),
                (BrandId::new(2), vec![item(20, 2, 1, 300)]),
            ],
            GBP,
        )?;

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.brand_items(BrandId::new(1)).len(), 2);
        assert_eq!(cart.brand_items(BrandId::new(2)).len(), 1);
        assert!(cart.contains(LineItemId::new(11)));

        Ok(())
    }

    #[test]
    fn with_groups_rejects_currency_mismatch() {
        let foreign = LineItem::new(
            LineItemId::new(10),
            BrandId::new(1),
            1,
            ItemPrice::new(Money::from_minor(100, USD)),
        );

        let result = Cart::with_groups([(BrandId::new(1), vec![foreign])], GBP);

        assert!(matches!(
            result,
            Err(CartError::CurrencyMismatch(id, "USD", "GBP")) if id == LineItemId::new(10)
        ));
    }

    #[test]
    fn with_groups_rejects_foreign_brand_group() {
        let result = Cart::with_groups([(BrandId::new(2), vec![item(10, 1, 1, 100)])], GBP);

        assert!(matches!(
            result,
            Err(CartError::BrandMismatch(id, brand))
                if id == LineItemId::new(10) && brand == BrandId::new(2)
        ));
    }

    #[test]
    fn with_groups_rejects_duplicate_ids() {
        let result = Cart::with_groups(
            [(BrandId::new(1), vec![item(10, 1, 1, 100), item(10, 1, 1, 100)])],
            GBP,
        );

        assert!(matches!(
            result,
            Err(CartError::DuplicateItem(id)) if id == LineItemId::new(10)
        ));
    }

    #[test]
    fn get_returns_item_by_id() -> TestResult {
        let cart = Cart::with_groups([(BrandId::new(1), vec![item(10, 1, 2, 100)])], GBP)?;

        let found = cart.get(LineItemId::new(10));

        assert_eq!(found.map(LineItem::quantity), Some(2));
        assert!(cart.get(LineItemId::new(99)).is_none());

        Ok(())
    }

    #[test]
    fn brand_items_for_unknown_brand_is_empty() {
        let cart = Cart::new(GBP);

        assert!(cart.brand_items(BrandId::new(1)).is_empty());
        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
    }

    #[test]
    fn currency_accessor() {
        let cart = Cart::new(GBP);

        assert_eq!(cart.currency(), GBP);
    }
}
