//! Voucher Fixtures

use serde::Deserialize;

/// Wrapper for vouchers in YAML
#[derive(Debug, Deserialize)]
pub struct VouchersFixture {
    /// Vouchers, in file order
    pub vouchers: Vec<VoucherFixture>,
}

/// One voucher from YAML
#[derive(Debug, Deserialize)]
pub struct VoucherFixture {
    /// Fixture key used to reference the voucher
    pub key: String,

    /// Brand the voucher is scoped to; omitted for a platform voucher
    pub brand: Option<String>,

    /// Minimum order value string (e.g. `"100000 VND"`)
    pub min_order_value: String,

    /// Discount configuration
    pub discount: DiscountFixtureConfig,
}

/// Discount configuration from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixtureConfig {
    /// Fixed amount off (e.g. `"50000 VND"`)
    FixedAmount {
        /// Discount amount string
        value: String,
    },

    /// Percentage discount (value between 0.0 and 1.0)
    Percentage {
        /// Discount rate as decimal (e.g. 0.15 for 15%)
        value: f64,

        /// Maximum discount amount string, if capped
        max_discount_value: Option<String>,
    },
}
