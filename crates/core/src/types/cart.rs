//! Cart line items and derived totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One product's entry in the cart.
///
/// Serializes as the product's fields plus `quantity`, so a persisted cart
/// is a flat array of records. The product data is captured when the line
/// is created; later catalog price changes do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    /// Create a line item for `product`.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price captured at insertion.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.product.price
    }

    /// `unit_price * quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// `unit_price * quantity`, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Aggregates derived from a list of line items. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Sum of all line quantities.
    pub count: u64,
    /// Sum of `price * quantity` over all lines.
    pub total_price: Decimal,
}

impl CartSnapshot {
    /// Fold `items` into a snapshot. The total saturates at `Decimal::MAX`.
    #[must_use]
    pub fn of(items: &[CartLineItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            count: acc.count.saturating_add(u64::from(item.quantity)),
            total_price: acc.total_price.saturating_add(item.line_total()),
        })
    }

    /// Fold `items` into a snapshot, or `None` if the total overflows.
    #[must_use]
    pub fn checked_of(items: &[CartLineItem]) -> Option<Self> {
        items.iter().try_fold(Self::default(), |acc, item| {
            Some(Self {
                count: acc.count.saturating_add(u64::from(item.quantity)),
                total_price: acc.total_price.checked_add(item.checked_line_total()?)?,
            })
        })
    }

    /// Returns true when the cart holds no units.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}
