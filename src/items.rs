//! Line Items

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

/// Identifier of a cart line item, as issued by the backend.
///
/// Stable across cart refreshes, which is what makes selection
/// reconciliation possible after an item disappears server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemId(u64);

impl LineItemId {
    /// Creates a new line item identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        LineItemId(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Identifier of a brand (seller) grouping within the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BrandId(u64);

impl BrandId {
    /// Creates a new brand identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        BrandId(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// The kind of promotion already baked into a line item's unit price.
///
/// These are item-level promotions priced in by the backend before checkout;
/// voucher discounts are computed separately on top of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    /// A time-boxed flash sale price.
    FlashSale,

    /// A livestream-session price, valid while the stream runs.
    Livestream,

    /// A pre-order price for a product not yet released.
    PreOrder,
}

/// An item-level promotion currently active on a line item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePromotion<'a> {
    kind: PromotionKind,
    unit_price: Money<'a, Currency>,
}

impl<'a> ActivePromotion<'a> {
    /// Creates a new active promotion with the discounted unit price.
    #[must_use]
    pub fn new(kind: PromotionKind, unit_price: Money<'a, Currency>) -> Self {
        Self { kind, unit_price }
    }

    /// Returns the promotion kind.
    pub fn kind(&self) -> PromotionKind {
        self.kind
    }

    /// Returns the promotional unit price.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }
}

/// Unit pricing for a line item, before any voucher is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPrice<'a> {
    original: Money<'a, Currency>,
    promotion: Option<ActivePromotion<'a>>,
}

impl<'a> ItemPrice<'a> {
    /// Creates a price with no active promotion.
    #[must_use]
    pub fn new(original: Money<'a, Currency>) -> Self {
        Self {
            original,
            promotion: None,
        }
    }

    /// Creates a price with an active item-level promotion.
    #[must_use]
    pub fn with_promotion(original: Money<'a, Currency>, promotion: ActivePromotion<'a>) -> Self {
        Self {
            original,
            promotion: Some(promotion),
        }
    }

    /// Returns the original (pre-promotion) unit price.
    pub fn original(&self) -> &Money<'a, Currency> {
        &self.original
    }

    /// Returns the active promotion, if any.
    pub fn promotion(&self) -> Option<&ActivePromotion<'a>> {
        self.promotion.as_ref()
    }

    /// Returns the effective unit price: the promotional price when a
    /// promotion is active, the original price otherwise.
    pub fn effective(&self) -> &Money<'a, Currency> {
        match &self.promotion {
            Some(promotion) => promotion.unit_price(),
            None => &self.original,
        }
    }
}

/// One product-classification entry in a cart, belonging to exactly one brand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem<'a> {
    id: LineItemId,
    brand: BrandId,
    quantity: u32,
    price: ItemPrice<'a>,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item.
    #[must_use]
    pub fn new(id: LineItemId, brand: BrandId, quantity: u32, price: ItemPrice<'a>) -> Self {
        Self {
            id,
            brand,
            quantity,
            price,
        }
    }

    /// Returns the line item identifier.
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Returns the owning brand.
    pub fn brand(&self) -> BrandId {
        self.brand
    }

    /// Returns the quantity in the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit pricing.
    pub fn price(&self) -> &ItemPrice<'a> {
        &self.price
    }
}
