//! Product browsing and catalog administration.

#![allow(clippy::print_stdout)]

use shopfront_cart::{ProductCatalog, Shop};
use shopfront_core::{NewProduct, Product, ProductId, ProductUpdate};

use super::money;

/// List every product, newest first.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub async fn list(shop: &Shop) -> Result<(), Box<dyn std::error::Error>> {
    print_table(&shop.catalog().list_all().await?);
    Ok(())
}

/// Show one product in full.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub async fn show(shop: &Shop, id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let product = shop
        .catalog()
        .get_by_id(id)
        .await?
        .ok_or_else(|| format!("Product not found: {id}"))?;

    println!("{}", product.name);
    println!("  id:          {}", product.id);
    println!("  category:    {}", product.category);
    println!("  price:       {}", money(product.price));
    println!("  rating:      {:.1}", product.rating);
    println!(
        "  stock:       {}",
        if product.in_stock { "In Stock" } else { "Out of Stock" }
    );
    if !product.image_url.is_empty() {
        println!("  image:       {}", product.image_url);
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }

    let in_cart = shop.cart().quantity_of(&product.id);
    if in_cart > 0 {
        println!();
        println!("{in_cart} in your cart");
    }
    Ok(())
}

/// Search names, descriptions and categories.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub async fn search(shop: &Shop, term: &str) -> Result<(), Box<dyn std::error::Error>> {
    let results = shop.catalog().search(term).await?;
    if results.is_empty() {
        println!("No products match {term:?}");
        return Ok(());
    }
    print_table(&results);
    Ok(())
}

/// List the top-rated products.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub async fn featured(shop: &Shop, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    print_table(&shop.catalog().featured(limit).await?);
    Ok(())
}

/// List products in one category.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub async fn category(shop: &Shop, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let results = shop.catalog().by_category(name).await?;
    if results.is_empty() {
        println!("No products in category {name:?}");
        return Ok(());
    }
    print_table(&results);
    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns an error if the product is invalid or cannot be saved.
pub async fn add(shop: &Shop, input: NewProduct) -> Result<(), Box<dyn std::error::Error>> {
    let product = shop.add_product(input).await?;
    println!("Product added successfully: {} ({})", product.name, product.id);
    Ok(())
}

/// Apply a partial update to a product.
///
/// # Errors
///
/// Returns an error if the product does not exist, the result is invalid, or
/// the catalog cannot be saved.
pub async fn update(
    shop: &Shop,
    id: &ProductId,
    update: ProductUpdate,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = shop.update_product(id, update).await?;
    println!("Product updated successfully: {}", product.name);
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the catalog cannot be
/// saved.
pub async fn delete(shop: &Shop, id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    shop.delete_product(id).await?;
    println!("Product deleted successfully: {id}");
    Ok(())
}

fn print_table(products: &[Product]) {
    if products.is_empty() {
        println!("No products");
        return;
    }
    for product in products {
        println!(
            "{:<24} {:<28} {:<8} {:>9}  {:.1}{}",
            product.id.as_str(),
            product.name,
            product.category,
            money(product.price),
            product.rating,
            if product.in_stock { "" } else { "  (out of stock)" }
        );
    }
}
