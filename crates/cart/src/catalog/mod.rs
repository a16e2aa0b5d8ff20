//! Product catalog: the read-only source of product records.
//!
//! # Architecture
//!
//! - [`ProductCatalog`] is the lookup interface the cart side consumes
//! - [`MemoryCatalog`] is an in-memory catalog with the admin operations
//!   (add, update, delete, seed)
//! - [`CachedCatalog`] wraps any catalog with a `moka` read-through cache
//!
//! Category, search and featured listings are derived from `list_all`.
//! Search is a plain case-insensitive substring match; there is no index.

mod cache;
mod memory;
mod samples;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shopfront_core::{PriceError, Product, ProductId};

pub use cache::CachedCatalog;
pub use memory::MemoryCatalog;
pub use samples::sample_products;

/// Minimum rating for a product to be featured.
pub const FEATURED_MIN_RATING: f64 = 4.5;

/// Errors that can occur when reading or editing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product does not exist.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Product data failed validation.
    #[error("Invalid product: {0}")]
    Invalid(String),

    /// Price failed validation.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// Backing source could not be reached.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only product lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// All products, newest first.
    async fn list_all(&self) -> Result<Vec<Product>, CatalogError>;

    /// One product by id.
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;

    /// Products whose category equals `category` exactly, newest first.
    async fn by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let products = self.list_all().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    /// Products whose name, description or category contains `term`.
    async fn search(&self, term: &str) -> Result<Vec<Product>, CatalogError> {
        let products = self.list_all().await?;
        Ok(products.into_iter().filter(|p| p.matches(term)).collect())
    }

    /// Up to `limit` products rated at least [`FEATURED_MIN_RATING`],
    /// highest rated first.
    async fn featured(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        let mut products: Vec<Product> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|p| p.rating >= FEATURED_MIN_RATING)
            .collect();
        products.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        products.truncate(limit);
        Ok(products)
    }
}

#[async_trait]
impl<C: ProductCatalog + ?Sized> ProductCatalog for Arc<C> {
    async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        (**self).list_all().await
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        (**self).get_by_id(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryCatalog {
        let catalog = MemoryCatalog::new();
        catalog.seed_samples().await;
        catalog
    }

    #[tokio::test]
    async fn test_by_category() {
        let catalog = seeded().await;
        let dresses = catalog.by_category("Dress").await.unwrap();
        assert_eq!(dresses.len(), 2);
        assert!(dresses.iter().all(|p| p.category == "Dress"));
    }

    #[tokio::test]
    async fn test_search_matches_description() {
        let catalog = seeded().await;
        let results = catalog.search("POCKETS").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Cargo Pants");
    }

    #[tokio::test]
    async fn test_featured_sorted_and_limited() {
        let catalog = seeded().await;
        let featured = catalog.featured(3).await.unwrap();
        assert_eq!(featured.len(), 3);
        assert!((featured[0].rating - 5.0).abs() < f64::EPSILON);
        assert!(featured.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[tokio::test]
    async fn test_arc_catalog_delegates() {
        let catalog: Arc<dyn ProductCatalog> = Arc::new(seeded().await);
        assert_eq!(catalog.list_all().await.unwrap().len(), 6);
    }
}
