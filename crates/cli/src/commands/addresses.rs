//! Shipping address book commands.

#![allow(clippy::print_stdout)]

use shopfront_cart::Shop;
use shopfront_core::{Address, AddressId, AddressInput};

/// List saved addresses, default marked.
///
/// # Errors
///
/// Returns an error if the address book cannot be read.
pub async fn list(shop: &Shop) -> Result<(), Box<dyn std::error::Error>> {
    let addresses = shop.addresses().list().await?;
    if addresses.is_empty() {
        println!("No saved addresses");
        return Ok(());
    }
    for address in &addresses {
        print_address(address);
        println!();
    }
    Ok(())
}

/// Save a new address.
///
/// # Errors
///
/// Returns an error if a required field is blank or the book cannot be saved.
pub async fn add(shop: &Shop, input: AddressInput) -> Result<(), Box<dyn std::error::Error>> {
    let address = shop.addresses().add(input).await?;
    println!("Address saved");
    print_address(&address);
    Ok(())
}

/// Replace an address's fields.
///
/// # Errors
///
/// Returns an error if the address does not exist, a required field is
/// blank, or the book cannot be saved.
pub async fn edit(
    shop: &Shop,
    id: &AddressId,
    input: AddressInput,
) -> Result<(), Box<dyn std::error::Error>> {
    let address = shop.addresses().update(id, input).await?;
    println!("Address updated");
    print_address(&address);
    Ok(())
}

/// Delete an address.
///
/// # Errors
///
/// Returns an error if the address does not exist or the book cannot be
/// saved.
pub async fn delete(shop: &Shop, id: &AddressId) -> Result<(), Box<dyn std::error::Error>> {
    shop.addresses().delete(id).await?;
    println!("Address deleted");
    Ok(())
}

/// Make an address the default.
///
/// # Errors
///
/// Returns an error if the address does not exist or the book cannot be
/// saved.
pub async fn set_default(shop: &Shop, id: &AddressId) -> Result<(), Box<dyn std::error::Error>> {
    let address = shop.addresses().set_default(id).await?;
    println!("Default address set to {}", address.name);
    Ok(())
}

fn print_address(address: &Address) {
    let marker = if address.is_default { "  [Default]" } else { "" };
    println!("{}{marker}", address.name);
    println!("  id:      {}", address.id);
    println!("  phone:   {}", address.phone);
    println!("  street:  {}", address.street);
    println!("  city:    {}", address.locality());
    println!("  country: {}", address.country);
}
