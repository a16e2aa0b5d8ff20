//! Notification log commands.

#![allow(clippy::print_stdout)]

use shopfront_cart::Shop;
use shopfront_core::NotificationId;

/// List notifications, newest first.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub async fn list(shop: &Shop) -> Result<(), Box<dyn std::error::Error>> {
    let notifications = shop.notifications().list().await?;
    if notifications.is_empty() {
        println!("No notifications");
        return Ok(());
    }
    for notification in notifications {
        println!(
            "{}  {}  {:<7}  {}",
            notification.id,
            notification.created_at.format("%Y-%m-%d %H:%M:%S"),
            notification.kind.to_string(),
            notification.message
        );
    }
    Ok(())
}

/// Delete one notification.
///
/// # Errors
///
/// Returns an error if the id is unknown or the log cannot be written.
pub async fn remove(shop: &Shop, id: NotificationId) -> Result<(), Box<dyn std::error::Error>> {
    if !shop.notifications().remove(id).await? {
        return Err(format!("Notification not found: {id}").into());
    }
    println!("Notification removed");
    Ok(())
}

/// Delete every notification.
///
/// # Errors
///
/// Returns an error if the log cannot be deleted.
pub async fn clear(shop: &Shop) -> Result<(), Box<dyn std::error::Error>> {
    shop.notifications().clear().await?;
    println!("All notifications cleared");
    Ok(())
}
