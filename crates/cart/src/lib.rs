//! Shopfront Cart - client-side commerce core.
//!
//! This crate owns everything between the UI layer and durable storage:
//!
//! - [`cart`] - the cart store: deduplicated line items, derived totals,
//!   persist-after-every-mutation
//! - [`storage`] - key-value persistence (in-memory, file-backed, timeouts)
//! - [`notifications`] - append-only activity log written on each mutation
//! - [`catalog`] - read-only product lookup with a cached wrapper
//! - [`checkout`] - simulated order placement and order history
//! - [`addresses`] - saved shipping addresses with a default
//! - [`config`] - environment-driven settings
//! - [`state`] - the session root wiring all of the above together
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopfront_cart::{CartStore, NotificationLog, storage::MemoryStore};
//!
//! let storage = Arc::new(MemoryStore::new());
//! let notifications = Arc::new(NotificationLog::new(storage.clone(), None));
//! let cart = CartStore::open(storage, notifications).await;
//!
//! cart.add_to_cart(&product, 2).await;
//! assert_eq!(cart.count(), 2);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod addresses;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod notifications;
pub mod state;
pub mod storage;

pub use addresses::{AddressBook, AddressError};
pub use cart::{CartChange, CartState, CartStore, MutationReport};
pub use catalog::{CachedCatalog, CatalogError, MemoryCatalog, ProductCatalog};
pub use checkout::{Checkout, CheckoutError, CheckoutSettings};
pub use config::{ConfigError, ShopfrontConfig};
pub use notifications::NotificationLog;
pub use state::Shop;
pub use storage::{KeyValueStore, StorageError};
