//! Simulated checkout.
//!
//! There is no payment gateway and no server-side order processing: placing
//! an order waits a short processing delay, records the order in local
//! history, clears the cart and logs a notification.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use shopfront_core::{Order, OrderId, OrderQuote, PaymentMethod};

use crate::cart::{CartState, CartStore};
use crate::notifications::NotificationLog;
use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to buy.
    #[error("Add items to your cart before checking out")]
    EmptyCart,
}

/// Shipping and processing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Flat shipping fee below the threshold.
    pub shipping_fee: Decimal,
    /// Simulated payment processing time.
    pub processing_delay: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(150, 0),
            shipping_fee: Decimal::new(999, 2),
            processing_delay: Duration::from_millis(1400),
        }
    }
}

/// Places simulated orders against a cart.
pub struct Checkout {
    cart: Arc<CartStore>,
    storage: Arc<dyn KeyValueStore>,
    notifications: Arc<NotificationLog>,
    settings: CheckoutSettings,
    // Serializes order placement and history writes.
    order_lock: Mutex<()>,
}

impl Checkout {
    /// Create a checkout over `cart`, storing history in `storage`.
    #[must_use]
    pub fn new(
        cart: Arc<CartStore>,
        storage: Arc<dyn KeyValueStore>,
        notifications: Arc<NotificationLog>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            cart,
            storage,
            notifications,
            settings,
            order_lock: Mutex::new(()),
        }
    }

    /// The active settings.
    #[must_use]
    pub const fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Price breakdown for `state`.
    #[must_use]
    pub fn quote(&self, state: &CartState) -> OrderQuote {
        OrderQuote::for_snapshot(
            &state.snapshot(),
            self.settings.free_shipping_threshold,
            self.settings.shipping_fee,
        )
    }

    /// Price breakdown for the current cart.
    #[must_use]
    pub fn current_quote(&self) -> OrderQuote {
        self.quote(&self.cart.state())
    }

    /// Place an order for everything in the cart.
    ///
    /// The cart contents are captured after the processing delay, so edits
    /// made while "processing" are included.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart is empty.
    #[instrument(skip(self))]
    pub async fn place_order(&self, payment_method: PaymentMethod) -> Result<Order, CheckoutError> {
        if self.cart.items().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let _guard = self.order_lock.lock().await;
        tokio::time::sleep(self.settings.processing_delay).await;

        let state = self.cart.state();
        if state.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = Order {
            id: OrderId::generate(),
            placed_at: Utc::now(),
            payment_method,
            quote: self.quote(&state),
            items: state.items,
        };

        if let Err(e) = self.append_history(&order).await {
            warn!(error = %e, order_id = %order.id, "Failed to save order history");
        }

        let _ = self.cart.clear_cart().await;
        self.notifications
            .append("Order placed successfully!")
            .await;

        info!(
            order_id = %order.id,
            items = order.item_count(),
            total = %order.quote.total,
            "Order placed"
        );
        Ok(order)
    }

    /// Placed orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read or parsed.
    pub async fn order_history(&self) -> Result<Vec<Order>, StorageError> {
        let mut orders = read_json::<Vec<Order>>(self.storage.as_ref(), keys::ORDERS)
            .await?
            .unwrap_or_default();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        Ok(orders)
    }

    async fn append_history(&self, order: &Order) -> Result<(), StorageError> {
        let mut orders = match read_json::<Vec<Order>>(self.storage.as_ref(), keys::ORDERS).await
        {
            Ok(orders) => orders.unwrap_or_default(),
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Order history unreadable, starting fresh");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        orders.push(order.clone());
        write_json(self.storage.as_ref(), keys::ORDERS, &orders).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shopfront_core::{NotificationKind, Product, ProductId};

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "Dress".to_string(),
            price: Decimal::new(cents, 2),
            description: String::new(),
            image_url: String::new(),
            rating: 4.8,
            in_stock: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn setup() -> (Arc<MemoryStore>, Arc<NotificationLog>, Arc<CartStore>, Checkout) {
        let storage = Arc::new(MemoryStore::new());
        let notifications = Arc::new(NotificationLog::new(storage.clone(), None));
        let cart = Arc::new(CartStore::open(storage.clone(), notifications.clone()).await);
        let checkout = Checkout::new(
            cart.clone(),
            storage.clone(),
            notifications.clone(),
            CheckoutSettings {
                processing_delay: Duration::ZERO,
                ..CheckoutSettings::default()
            },
        );
        (storage, notifications, cart, checkout)
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let (_, _, _, checkout) = setup().await;
        assert!(matches!(
            checkout.place_order(PaymentMethod::Card).await,
            Err(CheckoutError::EmptyCart)
        ));
        assert!(checkout.order_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quote_applies_shipping_threshold() {
        let (_, _, cart, checkout) = setup().await;
        let _ = cart.add_to_cart(&product("p1", 5000), 2).await;
        let quote = checkout.current_quote();
        assert_eq!(quote.shipping, Decimal::new(999, 2));
        assert_eq!(quote.total, Decimal::new(10999, 2));

        let _ = cart.add_to_cart(&product("p1", 5000), 1).await;
        assert!(checkout.current_quote().free_shipping());
    }

    #[tokio::test]
    async fn test_place_order_records_and_clears() {
        let (_, notifications, cart, checkout) = setup().await;
        let _ = cart.add_to_cart(&product("p1", 15650), 1).await;
        let _ = cart.add_to_cart(&product("p2", 4599), 2).await;

        let order = checkout.place_order(PaymentMethod::ApplePay).await.unwrap();
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.quote.subtotal, Decimal::new(24848, 2));
        assert!(order.quote.free_shipping());
        assert!(cart.items().is_empty());

        let history = checkout.order_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], order);

        let latest = &notifications.list().await.unwrap()[0];
        assert_eq!(latest.message, "Order placed successfully!");
        assert_eq!(latest.kind, NotificationKind::Order);
    }

    #[tokio::test]
    async fn test_history_failure_does_not_block_order() {
        let (storage, _, cart, checkout) = setup().await;
        let _ = cart.add_to_cart(&product("p1", 1000), 1).await;
        storage.set_unavailable(true);

        let order = checkout.place_order(PaymentMethod::Paypal).await.unwrap();
        assert_eq!(order.item_count(), 1);
        assert!(cart.items().is_empty());
    }
}
