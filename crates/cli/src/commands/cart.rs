//! Cart commands.

#![allow(clippy::print_stdout)]

use shopfront_cart::{CartChange, MutationReport, ProductCatalog, Shop};
use shopfront_core::ProductId;
use tracing::warn;

use super::money;

/// Print line items and totals.
pub fn show(shop: &Shop) {
    let state = shop.cart().state();
    if state.items.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in &state.items {
        println!(
            "{:<24} {:<28} {:>3} x {:>9} = {:>9}",
            item.product_id().as_str(),
            item.product.name,
            item.quantity,
            money(item.unit_price()),
            money(item.line_total())
        );
    }

    let quote = shop.checkout().quote(&state);
    println!();
    println!("Items:    {}", state.count());
    println!("Subtotal: {}", money(quote.subtotal));
    if quote.free_shipping() {
        println!("Shipping: Free");
    } else {
        println!("Shipping: {}", money(quote.shipping));
    }
    println!("Total:    {}", money(quote.total));
}

/// Add `quantity` of a catalog product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the catalog cannot be
/// read.
pub async fn add(
    shop: &Shop,
    id: &ProductId,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = shop
        .catalog()
        .get_by_id(id)
        .await?
        .ok_or_else(|| format!("Product not found: {id}"))?;
    if !product.in_stock {
        return Err(format!("{} is out of stock", product.name).into());
    }

    report(shop, &shop.cart().add_to_cart(&product, quantity).await);
    Ok(())
}

/// Remove a product's line.
pub async fn remove(shop: &Shop, id: &ProductId) {
    report(shop, &shop.cart().remove_from_cart(id).await);
}

/// Set a line's quantity exactly.
pub async fn update(shop: &Shop, id: &ProductId, quantity: i64) {
    report(shop, &shop.cart().update_quantity(id, quantity).await);
}

/// Empty the cart.
pub async fn clear(shop: &Shop) {
    report(shop, &shop.cart().clear_cart().await);
}

fn report(shop: &Shop, report: &MutationReport) {
    match &report.change {
        CartChange::Added { product_id, quantity } => {
            println!("Added {quantity} x {product_id}");
        }
        CartChange::Merged { product_id, quantity } => {
            println!("{product_id} now x {quantity}");
        }
        CartChange::QuantitySet { product_id, quantity } => {
            println!("{product_id} set to x {quantity}");
        }
        CartChange::Removed { product_id } => println!("Removed {product_id}"),
        CartChange::Cleared => println!("Cart cleared"),
        CartChange::Unchanged => println!("Cart unchanged"),
    }
    if report.changed() && !report.persisted {
        warn!("Cart change was not saved and will be lost when this session ends");
    }

    let snapshot = shop.cart().snapshot();
    println!(
        "{} item(s), {}",
        snapshot.count,
        money(snapshot.total_price)
    );
}
