//! Catalog product records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product as listed by the catalog.
///
/// Field names serialize in camelCase, matching the documents the catalog
/// serves and the line items already persisted on devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Unit price in the store currency. Never negative.
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    /// Image URL or local file URI.
    #[serde(default)]
    pub image_url: String,
    /// Average review rating (0.0 - 5.0).
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Returns true if `term` (lowercased) occurs in the name, description
    /// or category.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
    }
}

/// Input for creating a catalog product (admin panel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
    pub rating: f64,
    pub in_stock: bool,
}

impl NewProduct {
    /// Build a full product record with the given id and timestamp.
    #[must_use]
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
            rating: self.rating,
            in_stock: self.in_stock,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a catalog product. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub in_stock: Option<bool>,
}

impl ProductUpdate {
    /// Apply the update to `product`, stamping `updated_at`.
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        product.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        NewProduct {
            name: "Cotton Polo Shirt".to_string(),
            category: "T-Shirt".to_string(),
            price: Decimal::new(4599, 2),
            description: "Comfortable cotton polo shirt.".to_string(),
            image_url: "https://example.com/polo.jpg".to_string(),
            rating: 4.9,
            in_stock: true,
        }
        .into_product(ProductId::new("p1"), Utc::now())
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let product = shirt();
        assert!(product.matches("POLO"));
        assert!(product.matches("t-shirt"));
        assert!(product.matches("cotton"));
        assert!(!product.matches("dress"));
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut product = shirt();
        let before = product.clone();
        let later = before.updated_at + chrono::Duration::seconds(5);

        ProductUpdate {
            price: Some(Decimal::new(3999, 2)),
            in_stock: Some(false),
            ..ProductUpdate::default()
        }
        .apply_to(&mut product, later);

        assert_eq!(product.price, Decimal::new(3999, 2));
        assert!(!product.in_stock);
        assert_eq!(product.name, before.name);
        assert_eq!(product.created_at, before.created_at);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{"id":"p9","name":"Scarf","price":12.5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(125, 1));
        assert!(product.in_stock);
        assert!(product.category.is_empty());
    }
}
