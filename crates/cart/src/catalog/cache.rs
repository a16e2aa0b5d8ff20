//! Read-through cache over a product catalog.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use shopfront_core::{Product, ProductId};

use super::{CatalogError, ProductCatalog};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    AllProducts,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Option<Box<Product>>),
    Products(Vec<Product>),
}

/// Caches `list_all` and `get_by_id` results of the wrapped catalog.
///
/// Errors are never cached. After editing the underlying catalog, call
/// [`CachedCatalog::invalidate_product`] or [`CachedCatalog::invalidate_all`].
pub struct CachedCatalog<C> {
    inner: C,
    cache: Cache<CacheKey, CacheValue>,
}

impl<C: ProductCatalog> CachedCatalog<C> {
    /// Wrap `inner`, keeping entries for `ttl`.
    #[must_use]
    pub fn new(inner: C, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }

    /// The wrapped catalog.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop the cached entry for `id` and the cached full listing.
    pub async fn invalidate_product(&self, id: &ProductId) {
        self.cache.invalidate(&CacheKey::Product(id.clone())).await;
        self.cache.invalidate(&CacheKey::AllProducts).await;
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<C: ProductCatalog> ProductCatalog for CachedCatalog<C> {
    async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.cache.get(&CacheKey::AllProducts).await
        {
            debug!("Catalog listing served from cache");
            return Ok(products);
        }

        let products = self.inner.list_all().await?;
        self.cache
            .insert(CacheKey::AllProducts, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!(product_id = %id, "Product served from cache");
            return Ok(product.map(|p| *p));
        }

        let product = self.inner.get_by_id(id).await?;
        self.cache
            .insert(key, CacheValue::Product(product.clone().map(Box::new)))
            .await;
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use shopfront_core::ProductUpdate;

    use super::*;
    use crate::catalog::MemoryCatalog;

    async fn cached() -> CachedCatalog<Arc<MemoryCatalog>> {
        let memory = Arc::new(MemoryCatalog::new());
        memory.seed_samples().await;
        CachedCatalog::new(memory, Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_serves_stale_until_invalidated() {
        let catalog = cached().await;
        let id = ProductId::new("cargo-pants");
        let before = catalog.get_by_id(&id).await.unwrap().unwrap();

        catalog
            .inner()
            .update_product(
                &id,
                ProductUpdate {
                    price: Some(Decimal::new(9999, 2)),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();

        let cached_copy = catalog.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(cached_copy.price, before.price);

        catalog.invalidate_product(&id).await;
        let fresh = catalog.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fresh.price, Decimal::new(9999, 2));
    }

    #[tokio::test]
    async fn test_caches_misses() {
        let catalog = cached().await;
        let id = ProductId::new("missing");
        assert!(catalog.get_by_id(&id).await.unwrap().is_none());
        assert!(catalog.get_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_invalidated_with_product() {
        let catalog = cached().await;
        assert_eq!(catalog.list_all().await.unwrap().len(), 6);

        let id = ProductId::new("cargo-pants");
        catalog.inner().delete_product(&id).await.unwrap();
        assert_eq!(catalog.list_all().await.unwrap().len(), 6);

        catalog.invalidate_product(&id).await;
        assert_eq!(catalog.list_all().await.unwrap().len(), 5);
    }
}
