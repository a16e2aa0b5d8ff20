//! Simulated orders produced at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::{CartLineItem, CartSnapshot};
use super::id::OrderId;
use super::status::PaymentMethod;

/// Price breakdown shown before placing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuote {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Shipping fee (zero when the free-shipping threshold is met).
    pub shipping: Decimal,
    /// `subtotal + shipping`.
    pub total: Decimal,
}

impl OrderQuote {
    /// Quote `snapshot` with a flat `fee` waived at or above `free_threshold`.
    #[must_use]
    pub fn for_snapshot(snapshot: &CartSnapshot, free_threshold: Decimal, fee: Decimal) -> Self {
        let subtotal = snapshot.total_price;
        let shipping = if subtotal >= free_threshold {
            Decimal::ZERO
        } else {
            fee
        };
        Self {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
        }
    }

    /// Returns true when shipping is waived.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// A placed (simulated) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub items: Vec<CartLineItem>,
    pub quote: OrderQuote,
}

impl Order {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
