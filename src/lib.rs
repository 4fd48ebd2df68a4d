//! Tally
//!
//! Tally is a cart pricing and voucher reconciliation engine for storefront
//! checkouts. It takes a snapshot of the cart grouped by brand, the set of
//! items selected for purchase, and the chosen brand and platform vouchers,
//! and computes the payable total with discount-type-aware voucher math.

pub mod cart;
pub mod checkout;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod selection;
pub mod summary;
pub mod vouchers;
