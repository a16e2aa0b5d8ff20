//! Checkout and order history.

#![allow(clippy::print_stdout)]

use shopfront_cart::Shop;
use shopfront_core::{Order, PaymentMethod};

use super::money;

/// Place an order for the whole cart.
///
/// # Errors
///
/// Returns an error if the cart is empty.
pub async fn place_order(
    shop: &Shop,
    payment: PaymentMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let quote = shop.checkout().current_quote();
    if !shop.cart().snapshot().is_empty() {
        println!("Processing {} payment of {}...", payment.label(), money(quote.total));
    }

    let order = shop.checkout().place_order(payment).await?;
    println!("Order placed successfully!");
    print_order(&order);
    Ok(())
}

/// List placed orders, newest first.
///
/// # Errors
///
/// Returns an error if the order history cannot be read.
pub async fn orders(shop: &Shop) -> Result<(), Box<dyn std::error::Error>> {
    let orders = shop.checkout().order_history().await?;
    if orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }
    for (i, order) in orders.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_order(order);
    }
    Ok(())
}

fn print_order(order: &Order) {
    println!(
        "Order {} - {} - {}",
        order.id,
        order.placed_at.format("%Y-%m-%d %H:%M"),
        order.payment_method
    );
    for item in &order.items {
        println!(
            "  {:>3} x {:<28} {:>9}",
            item.quantity,
            item.product.name,
            money(item.line_total())
        );
    }
    println!("  Subtotal: {}", money(order.quote.subtotal));
    if order.quote.free_shipping() {
        println!("  Shipping: Free");
    } else {
        println!("  Shipping: {}", money(order.quote.shipping));
    }
    println!("  Total:    {}", money(order.quote.total));
}
