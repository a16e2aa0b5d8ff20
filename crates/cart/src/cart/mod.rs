//! Cart store: the authoritative list of cart line items for a session.
//!
//! # Lifecycle
//!
//! 1. Construct once per session with [`CartStore::open`] (or
//!    [`CartStore::new`] followed by [`CartStore::load`])
//! 2. Mutate via `add_to_cart`, `remove_from_cart`, `update_quantity`,
//!    `clear_cart`
//! 3. Observe via [`CartStore::subscribe`] or the read accessors
//!
//! # Consistency
//!
//! Mutations are applied to the in-memory state synchronously, before any
//! I/O, and are immediately visible to readers. The durable copy is then
//! written under a lock that serializes writers, and each write carries the
//! latest state, so storage always converges on the last mutation issued.
//! A crash between the two steps loses that mutation; persistence failures
//! are logged and never roll back the in-memory change.
//!
//! Mutations issued before the initial load completes wait for it, then
//! apply to the restored cart.

mod state;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use shopfront_core::{CartLineItem, CartSnapshot, CurrencyCode, Price, Product, ProductId};

use crate::notifications::NotificationLog;
use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};

pub use state::{CartChange, CartState, MutationReport};

/// Holds the cart line items, persists them and records notifications.
///
/// Shared by `Arc` between whichever UI components need it.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    notifications: Arc<NotificationLog>,
    state: watch::Sender<CartState>,
    // Held across each persistence write so writes land in issue order.
    write_lock: Mutex<()>,
}

impl CartStore {
    /// Create an empty, not-yet-ready store.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, notifications: Arc<NotificationLog>) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            storage,
            notifications,
            state,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store and restore the persisted cart.
    pub async fn open(
        storage: Arc<dyn KeyValueStore>,
        notifications: Arc<NotificationLog>,
    ) -> Self {
        let store = Self::new(storage, notifications);
        store.load().await;
        store
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Watch the cart. The receiver sees every state published after this call.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// A copy of the current line items.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.state.borrow().items.clone()
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<CartLineItem> {
        self.state.borrow().item(product_id).cloned()
    }

    /// Quantity of `product_id` in the cart (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.state
            .borrow()
            .item(product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.state.borrow().count()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn total_price(&self) -> rust_decimal::Decimal {
        self.state.borrow().total_price()
    }

    /// Count and total together, from one consistent view.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.borrow().snapshot()
    }

    /// False until the initial load has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replace the in-memory cart with the persisted one.
    ///
    /// Missing or unreadable data leaves the cart empty. Returns the number
    /// of line items restored. The store is marked ready either way.
    #[instrument(skip(self))]
    pub async fn load(&self) -> usize {
        let _guard = self.write_lock.lock().await;

        let items = match read_json::<Vec<CartLineItem>>(self.storage.as_ref(), keys::CART).await {
            Ok(Some(items)) => normalize(items),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Error loading cart, starting empty");
                Vec::new()
            }
        };

        let restored = items.len();
        self.state.send_modify(|state| {
            state.items = items;
            state.ready = true;
        });
        info!(lines = restored, "Cart loaded");
        restored
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product` (at least one).
    ///
    /// An existing line for the same product has its quantity increased;
    /// otherwise a new line is appended. A blank product id, a price outside
    /// `0..=Price::MAX_AMOUNT`, or a change that would overflow the cart
    /// total is ignored.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> MutationReport {
        if product.id.is_blank() {
            warn!("Ignoring add to cart with blank product id");
            return MutationReport::unchanged();
        }
        if let Err(e) = Price::try_new(product.price, CurrencyCode::default()) {
            warn!(error = %e, "Ignoring add to cart with invalid price");
            return MutationReport::unchanged();
        }
        let quantity = quantity.max(1);
        self.wait_until_ready().await;

        let mut change = CartChange::Unchanged;
        self.state.send_if_modified(|state| {
            let mut items = state.items.clone();
            let candidate = merge_line(&mut items, product, quantity);
            if CartSnapshot::checked_of(&items).is_none() {
                return false;
            }
            state.items = items;
            change = candidate;
            true
        });

        let message = match change {
            CartChange::Unchanged => {
                warn!("Ignoring add to cart that would overflow the total");
                return MutationReport::unchanged();
            }
            CartChange::Merged { .. } => format!("Updated {} quantity in cart.", product.name),
            _ => format!("{} added to cart.", product.name),
        };
        self.finish(change, message).await
    }

    /// Remove the line for `product_id`. Absent products are a no-op.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> MutationReport {
        self.wait_until_ready().await;

        let mut removed = None;
        self.state.send_modify(|state| {
            if let Some(index) = state.position(product_id) {
                removed = Some(state.items.remove(index));
            }
        });

        let Some(item) = removed else {
            debug!("Product not in cart, nothing to remove");
            return MutationReport::unchanged();
        };

        let change = CartChange::Removed {
            product_id: product_id.clone(),
        };
        let message = format!("{} removed from cart.", item.product.name);
        self.finish(change, message).await
    }

    /// Set the quantity for `product_id` exactly.
    ///
    /// Zero or negative quantities remove the line. Absent products are a
    /// no-op.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> MutationReport {
        if quantity <= 0 {
            return self.remove_from_cart(product_id).await;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.wait_until_ready().await;

        let mut updated_name = None;
        let mut overflowed = false;
        self.state.send_if_modified(|state| {
            let mut items = state.items.clone();
            let Some(item) = items.iter_mut().find(|item| item.product_id() == product_id) else {
                return false;
            };
            item.quantity = quantity;
            let name = item.product.name.clone();
            if CartSnapshot::checked_of(&items).is_none() {
                overflowed = true;
                return false;
            }
            state.items = items;
            updated_name = Some(name);
            true
        });

        if overflowed {
            warn!("Ignoring quantity update that would overflow the total");
            return MutationReport::unchanged();
        }
        let Some(name) = updated_name else {
            debug!("Product not in cart, nothing to update");
            return MutationReport::unchanged();
        };

        let change = CartChange::QuantitySet {
            product_id: product_id.clone(),
            quantity,
        };
        let message = format!("Updated {name} quantity in cart.");
        self.finish(change, message).await
    }

    /// Remove every line and delete the persisted cart.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> MutationReport {
        self.wait_until_ready().await;
        self.state.send_modify(|state| state.items.clear());
        self.finish(CartChange::Cleared, "Cart cleared.".to_string())
            .await
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Block until the initial load has published its state, so a mutation
    /// issued during the load applies on top of the restored cart.
    async fn wait_until_ready(&self) {
        let mut state = self.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = state.wait_for(|cart| cart.ready).await;
    }

    /// Persist the current state, then record `message`.
    async fn finish(&self, change: CartChange, message: String) -> MutationReport {
        let persisted = match self.persist().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Error saving cart, in-memory state kept");
                false
            }
        };
        self.notifications.append(message).await;
        MutationReport { change, persisted }
    }

    /// Write the latest line items, or delete the key when the cart is empty.
    async fn persist(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let items = self.items();
        if items.is_empty() {
            self.storage.delete(keys::CART).await
        } else {
            write_json(self.storage.as_ref(), keys::CART, &items).await
        }
    }
}

/// Increase the line for `product` by `quantity`, or append a new line.
fn merge_line(items: &mut Vec<CartLineItem>, product: &Product, quantity: u32) -> CartChange {
    if let Some(item) = items.iter_mut().find(|item| item.product_id() == &product.id) {
        item.quantity = item.quantity.saturating_add(quantity);
        CartChange::Merged {
            product_id: product.id.clone(),
            quantity: item.quantity,
        }
    } else {
        items.push(CartLineItem::new(product.clone(), quantity));
        CartChange::Added {
            product_id: product.id.clone(),
            quantity,
        }
    }
}

/// Enforce line invariants on restored data: no blank ids, no zero
/// quantities, prices within bounds, one line per product (duplicates merged
/// in first-seen order) and a total that fits in a `Decimal`.
fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut lines: Vec<CartLineItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.product_id().is_blank()
            || item.quantity == 0
            || Price::try_new(item.product.price, CurrencyCode::default()).is_err()
        {
            warn!(product_id = %item.product.id, "Dropping invalid persisted cart line");
            continue;
        }
        if let Some(existing) = lines
            .iter_mut()
            .find(|line| line.product_id() == item.product_id())
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            lines.push(item);
        }
    }
    while CartSnapshot::checked_of(&lines).is_none() {
        if let Some(dropped) = lines.pop() {
            warn!(
                product_id = %dropped.product.id,
                "Dropping persisted cart line that overflows the total"
            );
        }
    }
    lines
}
