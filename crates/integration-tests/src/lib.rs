//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - cart store invariants over in-memory storage, both
//!   hand-picked cases and `proptest` runs over random mutation sequences
//! - `session` - full sessions over the file store: restarts, checkout,
//!   notifications, catalog administration and shipping addresses
//!
//! Every test gets its own temporary data directory, so tests run in
//! parallel without sharing state.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use shopfront_cart::storage::MemoryStore;
use shopfront_cart::{CartStore, NotificationLog, Shop, ShopfrontConfig};
use shopfront_core::{Product, ProductId};
use tempfile::TempDir;

/// A session rooted in a private temporary directory.
pub struct TestContext {
    pub dir: TempDir,
    pub shop: Shop,
}

impl TestContext {
    /// Open a fresh session.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let shop = Shop::open(config_for(&dir)).await;
        Self { dir, shop }
    }

    /// Open a second session over the same data directory, as an app restart
    /// would.
    pub async fn reopen(&self) -> Shop {
        Shop::open(config_for(&self.dir)).await
    }
}

/// Configuration for a session in `dir`, with no checkout delay.
#[must_use]
pub fn config_for(dir: &TempDir) -> ShopfrontConfig {
    let mut config = ShopfrontConfig::new(dir.path());
    config.checkout.processing_delay = Duration::ZERO;
    config.storage_timeout = Duration::from_secs(2);
    config
}

/// A cart store over fresh in-memory storage. The storage handle is returned
/// so tests can inspect it or simulate outages.
pub async fn memory_cart() -> (Arc<MemoryStore>, CartStore) {
    let storage = Arc::new(MemoryStore::new());
    let notifications = Arc::new(NotificationLog::new(storage.clone(), None));
    let cart = CartStore::open(storage.clone(), notifications).await;
    (storage, cart)
}

/// A product priced at `cents` / 100.
#[must_use]
pub fn product(id: &str, name: &str, cents: i64) -> Product {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap_or_default();
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: "Shirt".to_string(),
        price: Decimal::new(cents, 2),
        description: String::new(),
        image_url: String::new(),
        rating: 4.0,
        in_stock: true,
        created_at: created,
        updated_at: created,
    }
}
