//! Session state shared across the UI layer.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use shopfront_core::{NewProduct, Product, ProductId, ProductUpdate};

use crate::addresses::AddressBook;
use crate::cart::CartStore;
use crate::catalog::{CachedCatalog, CatalogError, MemoryCatalog};
use crate::checkout::Checkout;
use crate::config::ShopfrontConfig;
use crate::notifications::NotificationLog;
use crate::storage::{
    FileStore, KeyValueStore, StorageError, TimeoutStore, keys, read_json, write_json,
};

/// Everything one storefront session needs.
///
/// This struct is cheaply cloneable via `Arc`. Construct it once per session;
/// the cart is loaded from storage before [`Shop::open`] returns.
#[derive(Clone)]
pub struct Shop {
    inner: Arc<ShopInner>,
}

struct ShopInner {
    config: ShopfrontConfig,
    storage: Arc<dyn KeyValueStore>,
    notifications: Arc<NotificationLog>,
    cart: Arc<CartStore>,
    catalog: CachedCatalog<Arc<MemoryCatalog>>,
    checkout: Checkout,
    addresses: AddressBook,
}

impl Shop {
    /// Open a session over the file store in `config.data_dir`, with each
    /// storage call bounded by `config.storage_timeout`.
    pub async fn open(config: ShopfrontConfig) -> Self {
        let storage: Arc<dyn KeyValueStore> = Arc::new(TimeoutStore::new(
            FileStore::new(config.data_dir.clone()),
            config.storage_timeout,
        ));
        Self::with_storage(config, storage).await
    }

    /// Open a session over an arbitrary store.
    #[instrument(skip_all)]
    pub async fn with_storage(config: ShopfrontConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        let notifications = Arc::new(NotificationLog::new(
            storage.clone(),
            config.notification_limit,
        ));
        let cart = Arc::new(CartStore::open(storage.clone(), notifications.clone()).await);

        let products = Arc::new(load_catalog(storage.as_ref()).await);
        let catalog = CachedCatalog::new(products, config.catalog_cache_ttl);

        let checkout = Checkout::new(
            cart.clone(),
            storage.clone(),
            notifications.clone(),
            config.checkout,
        );
        let addresses = AddressBook::new(storage.clone());

        Self {
            inner: Arc::new(ShopInner {
                config,
                storage,
                notifications,
                cart,
                catalog,
                checkout,
                addresses,
            }),
        }
    }

    /// Get a reference to the session configuration.
    #[must_use]
    pub fn config(&self) -> &ShopfrontConfig {
        &self.inner.config
    }

    /// Get the cart store.
    #[must_use]
    pub fn cart(&self) -> &Arc<CartStore> {
        &self.inner.cart
    }

    /// Get the notification log.
    #[must_use]
    pub fn notifications(&self) -> &Arc<NotificationLog> {
        &self.inner.notifications
    }

    /// Get the cached product catalog.
    #[must_use]
    pub fn catalog(&self) -> &CachedCatalog<Arc<MemoryCatalog>> {
        &self.inner.catalog
    }

    /// Get the checkout.
    #[must_use]
    pub fn checkout(&self) -> &Checkout {
        &self.inner.checkout
    }

    /// Get the shipping address book.
    #[must_use]
    pub fn addresses(&self) -> &AddressBook {
        &self.inner.addresses
    }

    // =========================================================================
    // Catalog administration
    // =========================================================================

    /// Create a product and save the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation error from the catalog, or
    /// `CatalogError::Unavailable` if the catalog cannot be saved.
    pub async fn add_product(&self, input: NewProduct) -> Result<Product, CatalogError> {
        let product = self.inner.catalog.inner().add_product(input).await?;
        self.inner.catalog.invalidate_product(&product.id).await;
        self.save_catalog().await?;
        Ok(product)
    }

    /// Apply a partial product update and save the catalog.
    ///
    /// Line items already in the cart keep the name and price captured when
    /// they were added.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound`, a validation error, or
    /// `CatalogError::Unavailable` if the catalog cannot be saved.
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, CatalogError> {
        let product = self.inner.catalog.inner().update_product(id, update).await?;
        self.inner.catalog.invalidate_product(id).await;
        self.save_catalog().await?;
        Ok(product)
    }

    /// Delete a product and save the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound`, or `CatalogError::Unavailable` if
    /// the catalog cannot be saved.
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.inner.catalog.inner().delete_product(id).await?;
        self.inner.catalog.invalidate_product(id).await;
        self.save_catalog().await
    }

    async fn save_catalog(&self) -> Result<(), CatalogError> {
        let products = self.inner.catalog.inner().snapshot().await;
        write_json(self.inner.storage.as_ref(), keys::PRODUCTS, &products)
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }
}

/// Restore the saved catalog, or seed and save the sample products when
/// nothing usable is stored.
async fn load_catalog(storage: &dyn KeyValueStore) -> MemoryCatalog {
    match read_json::<Vec<Product>>(storage, keys::PRODUCTS).await {
        Ok(Some(products)) if !products.is_empty() => {
            info!(count = products.len(), "Catalog restored");
            return MemoryCatalog::from_products(products);
        }
        Ok(_) => {}
        Err(StorageError::Serialization(e)) => {
            warn!(error = %e, "Saved catalog unreadable, reseeding");
        }
        Err(e) => {
            warn!(error = %e, "Failed to read saved catalog, using samples");
        }
    }

    let catalog = MemoryCatalog::new();
    catalog.seed_samples().await;
    if let Err(e) = write_json(storage, keys::PRODUCTS, &catalog.snapshot().await).await {
        warn!(error = %e, "Failed to save sample catalog");
    }
    catalog
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::ProductCatalog;
    use crate::storage::MemoryStore;

    fn config() -> ShopfrontConfig {
        let mut config = ShopfrontConfig::new("unused");
        config.checkout.processing_delay = Duration::ZERO;
        config
    }

    fn hat() -> NewProduct {
        NewProduct {
            name: "Bucket Hat".to_string(),
            category: "Hat".to_string(),
            price: Decimal::new(2500, 2),
            description: "Keeps the sun off.".to_string(),
            image_url: String::new(),
            rating: 4.2,
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn test_first_open_seeds_and_saves_catalog() {
        let storage = Arc::new(MemoryStore::new());
        let shop = Shop::with_storage(config(), storage.clone()).await;

        assert_eq!(shop.catalog().list_all().await.unwrap().len(), 6);
        let saved: Vec<Product> = read_json(storage.as_ref(), keys::PRODUCTS)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.len(), 6);
        assert!(shop.cart().is_ready());
    }

    #[tokio::test]
    async fn test_admin_changes_survive_reopen() {
        let storage = Arc::new(MemoryStore::new());
        let shop = Shop::with_storage(config(), storage.clone()).await;

        // Prime the cache so the add has to invalidate it.
        assert_eq!(shop.catalog().list_all().await.unwrap().len(), 6);
        let created = shop.add_product(hat()).await.unwrap();
        assert_eq!(shop.catalog().list_all().await.unwrap().len(), 7);

        shop.delete_product(&ProductId::new("cargo-pants")).await.unwrap();

        let reopened = Shop::with_storage(config(), storage).await;
        let listed = reopened.catalog().list_all().await.unwrap();
        assert_eq!(listed.len(), 6);
        assert!(listed.iter().any(|p| p.id == created.id));
        assert!(listed.iter().all(|p| p.id.as_str() != "cargo-pants"));
    }

    #[tokio::test]
    async fn test_update_does_not_reprice_cart() {
        let shop = Shop::with_storage(config(), Arc::new(MemoryStore::new())).await;
        let id = ProductId::new("cotton-polo-shirt");
        let product = shop.catalog().get_by_id(&id).await.unwrap().unwrap();
        let _ = shop.cart().add_to_cart(&product, 2).await;

        let updated = shop
            .update_product(
                &id,
                ProductUpdate {
                    price: Some(Decimal::new(100, 0)),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, Decimal::new(100, 0));
        assert_eq!(
            shop.catalog().get_by_id(&id).await.unwrap().unwrap().price,
            Decimal::new(100, 0)
        );
        assert_eq!(shop.cart().total_price(), product.price * Decimal::from(2));
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let storage = Arc::new(MemoryStore::new());
        let shop = Shop::with_storage(config(), storage.clone()).await;
        storage.set_unavailable(true);

        assert!(matches!(
            shop.add_product(hat()).await,
            Err(CatalogError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_catalog_is_reseeded() {
        let storage = Arc::new(MemoryStore::new());
        storage.write(keys::PRODUCTS, "{not json").await.unwrap();

        let shop = Shop::with_storage(config(), storage).await;
        assert_eq!(shop.catalog().list_all().await.unwrap().len(), 6);
    }
}
