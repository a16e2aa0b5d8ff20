//! CLI command implementations.
//!
//! Command output goes to stdout; logs go to stderr.

pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod notifications;
pub mod products;

use rust_decimal::Decimal;
use shopfront_core::Price;

/// Format an amount the way the storefront displays prices.
fn money(amount: Decimal) -> String {
    Price::usd(amount).display()
}

