//! In-memory catalog with admin operations.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use shopfront_core::{CurrencyCode, NewProduct, Price, Product, ProductId, ProductUpdate};

use super::{CatalogError, ProductCatalog, sample_products};

/// Catalog held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<Vec<Product>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `products`.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// Copy of every product in storage order.
    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    /// Insert the sample products if the catalog is empty. Returns how many
    /// were inserted.
    #[instrument(skip(self))]
    pub async fn seed_samples(&self) -> usize {
        let mut products = self.products.write().await;
        if !products.is_empty() {
            return 0;
        }
        *products = sample_products(Utc::now());
        info!(count = products.len(), "Sample products initialized");
        products.len()
    }

    /// Create a product with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` for a blank name or out-of-range
    /// rating, and `CatalogError::Price` for a negative or oversized price.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_product(&self, input: NewProduct) -> Result<Product, CatalogError> {
        validate(&input.name, input.price, input.rating)?;
        let product = input.into_product(ProductId::generate(), Utc::now());
        self.products.write().await.push(product.clone());
        info!(product_id = %product.id, "Product added");
        Ok(product)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or a
    /// validation error if the updated product would be invalid.
    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, CatalogError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        let mut updated = product.clone();
        update.apply_to(&mut updated, Utc::now());
        validate(&updated.name, updated.price, updated.rating)?;

        *product = updated.clone();
        info!("Product updated");
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Err(CatalogError::NotFound(id.clone()));
        }
        info!("Product deleted");
        Ok(())
    }
}

fn validate(name: &str, price: rust_decimal::Decimal, rating: f64) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::Invalid("name cannot be empty".to_string()));
    }
    Price::try_new(price, CurrencyCode::default())?;
    if !(0.0..=5.0).contains(&rating) {
        return Err(CatalogError::Invalid(format!(
            "rating must be between 0 and 5 (got {rating})"
        )));
    }
    Ok(())
}

#[async_trait]
impl ProductCatalog for MemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.products.read().await.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::PriceError;

    use super::*;

    fn new_product(name: &str, cents: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: "Hat".to_string(),
            price: Decimal::new(cents, 2),
            description: "A hat.".to_string(),
            image_url: String::new(),
            rating: 4.0,
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let catalog = MemoryCatalog::new();
        assert_eq!(catalog.seed_samples().await, 6);
        assert_eq!(catalog.seed_samples().await, 0);
        assert_eq!(catalog.list_all().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let catalog = MemoryCatalog::new();
        let created = catalog.add_product(new_product("Bucket Hat", 2500)).await.unwrap();

        let fetched = catalog.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let catalog = MemoryCatalog::new();
        assert!(matches!(
            catalog.add_product(new_product("  ", 2500)).await,
            Err(CatalogError::Invalid(_))
        ));
        assert!(matches!(
            catalog.add_product(new_product("Hat", -1)).await,
            Err(CatalogError::Price(_))
        ));
        let mut oversized = new_product("Hat", 100);
        oversized.price = Decimal::MAX;
        assert!(matches!(
            catalog.add_product(oversized).await,
            Err(CatalogError::Price(PriceError::TooLarge { .. }))
        ));
        assert!(catalog.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let catalog = MemoryCatalog::new();
        let created = catalog.add_product(new_product("Bucket Hat", 2500)).await.unwrap();

        let updated = catalog
            .update_product(
                &created.id,
                ProductUpdate {
                    price: Some(Decimal::new(1999, 2)),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Decimal::new(1999, 2));
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_result() {
        let catalog = MemoryCatalog::new();
        let created = catalog.add_product(new_product("Bucket Hat", 2500)).await.unwrap();

        let result = catalog
            .update_product(
                &created.id,
                ProductUpdate {
                    rating: Some(7.0),
                    ..ProductUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogError::Invalid(_))));

        let unchanged = catalog.get_by_id(&created.id).await.unwrap().unwrap();
        assert!((unchanged.rating - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_delete() {
        let catalog = MemoryCatalog::new();
        let created = catalog.add_product(new_product("Bucket Hat", 2500)).await.unwrap();

        catalog.delete_product(&created.id).await.unwrap();
        assert!(catalog.get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            catalog.delete_product(&created.id).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let catalog = MemoryCatalog::new();
        catalog.seed_samples().await;
        let listed = catalog.list_all().await.unwrap();
        assert_eq!(listed[0].name, "Modern Light Clothes");
        assert_eq!(listed[5].name, "Cargo Pants");
    }
}
