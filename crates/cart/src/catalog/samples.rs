//! Sample catalog used to seed an empty store.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use shopfront_core::{NewProduct, Product, ProductId};

/// (id, name, category, price in cents, rating, image, description)
const SAMPLES: &[(&str, &str, &str, i64, f64, &str, &str)] = &[
    (
        "modern-light-clothes",
        "Modern Light Clothes",
        "T-Shirt",
        5099,
        5.0,
        "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=400",
        "A modern and comfortable light t-shirt perfect for everyday wear.",
    ),
    (
        "elegant-summer-dress",
        "Elegant Summer Dress",
        "Dress",
        15650,
        4.8,
        "https://images.unsplash.com/photo-1595777457583-95e059d581b8?w=400",
        "Beautiful and elegant summer dress for special occasions.",
    ),
    (
        "classic-denim-pants",
        "Classic Denim Pants",
        "Pants",
        8999,
        4.6,
        "https://images.unsplash.com/photo-1542272604-787c3835535d?w=400",
        "Classic denim pants that never go out of style.",
    ),
    (
        "cotton-polo-shirt",
        "Cotton Polo Shirt",
        "T-Shirt",
        4599,
        4.9,
        "https://images.unsplash.com/photo-1586790170083-2f9ceadc732d?w=400",
        "Comfortable cotton polo shirt for casual and formal wear.",
    ),
    (
        "floral-print-dress",
        "Floral Print Dress",
        "Dress",
        19800,
        4.7,
        "https://images.unsplash.com/photo-1572804013309-59a88b7e92f1?w=400",
        "Stylish floral print dress perfect for spring and summer.",
    ),
    (
        "cargo-pants",
        "Cargo Pants",
        "Pants",
        12499,
        4.5,
        "https://images.unsplash.com/photo-1473966968600-fa801b869a1a?w=400",
        "Versatile cargo pants with multiple pockets for functionality.",
    ),
];

/// The sample products, stamped one minute apart ending at `now` (the first
/// sample is the newest).
#[must_use]
pub fn sample_products(now: DateTime<Utc>) -> Vec<Product> {
    SAMPLES
        .iter()
        .zip(0_i64..)
        .map(
            |(&(id, name, category, cents, rating, image_url, description), age)| {
                NewProduct {
                    name: name.to_string(),
                    category: category.to_string(),
                    price: Decimal::new(cents, 2),
                    description: description.to_string(),
                    image_url: image_url.to_string(),
                    rating,
                    in_stock: true,
                }
                .into_product(ProductId::new(id), now - Duration::minutes(age))
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_have_unique_ids() {
        let products = sample_products(Utc::now());
        let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
    }

    #[test]
    fn test_samples_are_newest_first() {
        let products = sample_products(Utc::now());
        assert!(
            products
                .windows(2)
                .all(|w| w.first().map(|p| p.created_at) > w.get(1).map(|p| p.created_at))
        );
    }
}
