//! Fixtures
//!
//! YAML-backed test data standing in for the backend cart-fetch and
//! voucher-recommendation responses. Sets live under `fixtures/` at the
//! repository root: `carts/<set>.yml` and `vouchers/<set>.yml`.

use std::{fs, path::PathBuf};

use percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    items::{ActivePromotion, BrandId, ItemPrice, LineItem, LineItemId},
    vouchers::{DiscountKind, Voucher, VoucherId},
};

pub mod carts;
pub mod prices;
pub mod vouchers;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage value (must be a finite decimal in `0.0..=1.0`)
    #[error("Invalid percentage value: {0}")]
    InvalidPercentage(f64),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between fixture entries
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Brand not found
    #[error("Brand not found: {0}")]
    BrandNotFound(String),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Voucher not found
    #[error("Voucher not found: {0}")]
    VoucherNotFound(String),

    /// No cart loaded yet
    #[error("No cart loaded yet; currency unknown")]
    NoCurrency,

    /// Wrapped cart construction error
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A loaded fixture set: cart contents keyed by string, vouchers keyed by
/// string, with string keys mapped to the typed identifiers the engine uses.
#[derive(Debug)]
pub struct Fixture {
    base_path: PathBuf,

    /// String key -> typed id mappings for lookups
    brand_keys: FxHashMap<String, BrandId>,
    item_keys: FxHashMap<String, LineItemId>,

    /// Pre-built cart groups, in file order per brand
    groups: Vec<(BrandId, Vec<LineItem<'static>>)>,

    /// Pre-built vouchers by string key
    vouchers: FxHashMap<String, Voucher<'static>>,

    /// Currency for the fixture set
    currency: Option<&'static iso::Currency>,

    next_brand_id: u64,
    next_item_id: u64,
    next_voucher_id: u64,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            brand_keys: FxHashMap::default(),
            item_keys: FxHashMap::default(),
            groups: Vec::new(),
            vouchers: FxHashMap::default(),
            currency: None,
            next_brand_id: 1,
            next_item_id: 1,
            next_voucher_id: 1,
        }
    }

    /// Load the cart and voucher files of one named set.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    pub fn from_set(set: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();
        fixture.load_cart(set)?;
        fixture.load_vouchers(set)?;

        Ok(fixture)
    }

    /// Load cart contents from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are
    /// currency mismatches.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: carts::CartFixture = serde_norway::from_str(&contents)?;

        let currency = iso::find(&fixture.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(fixture.currency.clone()))?;
        self.set_currency(currency)?;

        for brand_fixture in fixture.brands {
            let brand = BrandId::new(self.next_brand_id);
            self.next_brand_id += 1;
            self.brand_keys.insert(brand_fixture.key.clone(), brand);

            let mut items = Vec::with_capacity(brand_fixture.items.len());

            for item_fixture in brand_fixture.items {
                let id = LineItemId::new(self.next_item_id);
                self.next_item_id += 1;
                self.item_keys.insert(item_fixture.key.clone(), id);

                items.push(self.build_item(id, brand, &item_fixture)?);
            }

            self.groups.push((brand, items));
        }

        Ok(self)
    }

    /// Load vouchers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a voucher
    /// references an unknown brand.
    pub fn load_vouchers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("vouchers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: vouchers::VouchersFixture = serde_norway::from_str(&contents)?;

        for voucher_fixture in fixture.vouchers {
            let id = VoucherId::new(self.next_voucher_id);
            self.next_voucher_id += 1;

            let min_order_value = self.parse_money(&voucher_fixture.min_order_value)?;
            let discount = self.build_discount(&voucher_fixture.discount)?;

            let voucher = match &voucher_fixture.brand {
                Some(brand_key) => {
                    let brand = self.brand(brand_key)?;
                    Voucher::for_brand(id, brand, min_order_value, discount)
                }
                None => Voucher::for_platform(id, min_order_value, discount),
            };

            self.vouchers.insert(voucher_fixture.key, voucher);
        }

        Ok(self)
    }

    /// Build the cart from the loaded groups.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] before a cart file is loaded, or
    /// a wrapped [`CartError`] if the contents violate a cart invariant.
    pub fn cart(&self) -> Result<Cart<'static>, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;
        let groups = self
            .groups
            .iter()
            .map(|(brand, items)| (*brand, items.clone()))
            .collect::<Vec<_>>();

        Ok(Cart::with_groups(groups, currency)?)
    }

    /// Look up the typed id of a brand by its fixture key.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::BrandNotFound`] for an unknown key.
    pub fn brand(&self, key: &str) -> Result<BrandId, FixtureError> {
        self.brand_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::BrandNotFound(key.to_string()))
    }

    /// Look up the typed id of a line item by its fixture key.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::ItemNotFound`] for an unknown key.
    pub fn item(&self, key: &str) -> Result<LineItemId, FixtureError> {
        self.item_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ItemNotFound(key.to_string()))
    }

    /// Look up a voucher by its fixture key.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::VoucherNotFound`] for an unknown key.
    pub fn voucher(&self, key: &str) -> Result<Voucher<'static>, FixtureError> {
        self.vouchers
            .get(key)
            .cloned()
            .ok_or_else(|| FixtureError::VoucherNotFound(key.to_string()))
    }

    /// The currency of the loaded set, if a cart file has been loaded.
    #[must_use]
    pub fn currency(&self) -> Option<&'static iso::Currency> {
        self.currency
    }

    fn set_currency(&mut self, currency: &'static iso::Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            _ => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }

    fn build_item(
        &mut self,
        id: LineItemId,
        brand: BrandId,
        fixture: &carts::ItemFixture,
    ) -> Result<LineItem<'static>, FixtureError> {
        let original = self.parse_money(&fixture.price)?;

        let price = match &fixture.promotion {
            Some(promotion) => {
                let unit_price = self.parse_money(&promotion.price)?;
                ItemPrice::with_promotion(original, ActivePromotion::new(promotion.kind, unit_price))
            }
            None => ItemPrice::new(original),
        };

        Ok(LineItem::new(id, brand, fixture.quantity, price))
    }

    fn build_discount(
        &mut self,
        config: &vouchers::DiscountFixtureConfig,
    ) -> Result<DiscountKind<'static>, FixtureError> {
        match config {
            vouchers::DiscountFixtureConfig::FixedAmount { value } => {
                Ok(DiscountKind::FixedAmount(self.parse_money(value)?))
            }
            vouchers::DiscountFixtureConfig::Percentage {
                value,
                max_discount_value,
            } => {
                if !value.is_finite() || !(0.0..=1.0).contains(value) {
                    return Err(FixtureError::InvalidPercentage(*value));
                }

                let cap = match max_discount_value {
                    Some(cap) => Some(self.parse_money(cap)?),
                    None => None,
                };

                Ok(DiscountKind::Percentage {
                    rate: Percentage::from_decimal(*value),
                    cap,
                })
            }
        }
    }

    /// Parse a price string and check it against the set currency.
    fn parse_money(&mut self, value: &str) -> Result<Money<'static, iso::Currency>, FixtureError> {
        let (minor_units, currency) = prices::parse_price(value)?;
        self.set_currency(currency)?;

        Ok(Money::from_minor(minor_units, currency))
    }
}
