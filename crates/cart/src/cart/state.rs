//! Observable cart state and mutation results.

use rust_decimal::Decimal;

use shopfront_core::{CartLineItem, CartSnapshot, ProductId};

/// The cart as seen by observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    /// Line items in insertion order, at most one per product.
    pub items: Vec<CartLineItem>,
    /// False until the initial load has finished.
    pub ready: bool,
}

impl CartState {
    /// Sum of quantities. Recomputed on every call.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.snapshot().count
    }

    /// Sum of `price * quantity`. Recomputed on every call.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.snapshot().total_price
    }

    /// Both aggregates at once.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.items)
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    pub(crate) fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
    }
}

/// What a mutation did to the in-memory cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added { product_id: ProductId, quantity: u32 },
    /// An existing line's quantity was increased.
    Merged { product_id: ProductId, quantity: u32 },
    /// A line's quantity was replaced.
    QuantitySet { product_id: ProductId, quantity: u32 },
    /// A line was removed.
    Removed { product_id: ProductId },
    /// All lines were removed.
    Cleared,
    /// Nothing changed (absent product or invalid input).
    Unchanged,
}

/// Completion signal returned by every cart mutation.
///
/// The in-memory change always stands; `persisted` reports whether the
/// durable copy caught up. A UI may show a non-blocking warning when it is
/// false.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct MutationReport {
    pub change: CartChange,
    pub persisted: bool,
}

impl MutationReport {
    pub(crate) const fn unchanged() -> Self {
        Self {
            change: CartChange::Unchanged,
            persisted: true,
        }
    }

    /// Returns true if the in-memory cart changed.
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self.change, CartChange::Unchanged)
    }
}
