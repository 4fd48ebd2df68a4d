//! Cart Fixtures

use serde::Deserialize;

use crate::items::PromotionKind;

/// Wrapper for cart contents in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// ISO alpha code of the cart currency (e.g. `VND`)
    pub currency: String,

    /// Brand groups, in file order
    pub brands: Vec<BrandFixture>,
}

/// One brand group from YAML
#[derive(Debug, Deserialize)]
pub struct BrandFixture {
    /// Fixture key used to reference the brand
    pub key: String,

    /// Line items of the brand, in file order
    pub items: Vec<ItemFixture>,
}

/// One line item from YAML
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Fixture key used to reference the item
    pub key: String,

    /// Quantity in the cart
    pub quantity: u32,

    /// Original unit price string (e.g. `"100000 VND"`)
    pub price: String,

    /// Active item-level promotion, if any
    pub promotion: Option<PromotionFixture>,
}

/// An active item-level promotion from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion kind (`flash_sale`, `livestream`, `pre_order`)
    pub kind: PromotionKind,

    /// Promotional unit price string
    pub price: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cart_fixture_parses_from_yaml() -> TestResult {
        let yaml = r#"
currency: VND
brands:
  - key: aurora
    items:
      - key: aurora_tee
        quantity: 2
        price: "100000 VND"
      - key: aurora_cap
        quantity: 1
        price: "80000 VND"
        promotion:
          kind: livestream
          price: "60000 VND"
"#;

        let fixture: CartFixture = serde_norway::from_str(yaml)?;

        assert_eq!(fixture.currency, "VND");
        assert_eq!(fixture.brands.len(), 1);

        let items = fixture
            .brands
            .first()
            .map_or(&[][..], |brand| brand.items.as_slice());
        assert_eq!(items.len(), 2);
        assert!(matches!(
            items.get(1).and_then(|item| item.promotion.as_ref()),
            Some(promotion) if promotion.kind == PromotionKind::Livestream
        ));

        Ok(())
    }

    #[test]
    fn missing_quantity_is_a_parse_error() {
        let yaml = r#"
currency: VND
brands:
  - key: aurora
    items:
      - key: aurora_tee
        price: "100000 VND"
"#;

        let result: Result<CartFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err(), "quantity is required");
    }
}
