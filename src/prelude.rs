//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    checkout::{Checkout, CheckoutError},
    fixtures::{Fixture, FixtureError},
    items::{ActivePromotion, BrandId, ItemPrice, LineItem, LineItemId, PromotionKind},
    pricing::{
        CartTotals, PricingError, brand_subtotal, brand_voucher_discount, cart_totals,
        platform_voucher_discount, price,
    },
    selection::Selection,
    summary::PricingSummary,
    vouchers::{DiscountKind, Voucher, VoucherError, VoucherId},
};
