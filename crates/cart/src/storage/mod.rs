//! Key-value persistence for cart, notification and order data.
//!
//! # Architecture
//!
//! The persistence service is a dumb string store: it knows nothing about
//! carts. Callers serialize to JSON and pick a key from [`keys`]. Each key
//! has exactly one writer (the cart store owns `cart`, the notification log
//! owns `notify`, checkout owns `orders`, the address book owns
//! `shipping_addresses`).
//!
//! # Implementations
//!
//! - [`MemoryStore`] - process-local map, for tests and ephemeral sessions
//! - [`FileStore`] - one file per key under a data directory
//! - [`TimeoutStore`] - bounds every call of a wrapped store

mod file;
mod memory;
mod timeout;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use timeout::TimeoutStore;

/// Well-known storage keys.
pub mod keys {
    /// Serialized cart line items.
    pub const CART: &str = "cart";
    /// Notification log.
    pub const NOTIFICATIONS: &str = "notify";
    /// Placed order history.
    pub const ORDERS: &str = "orders";
    /// Catalog snapshot used by the admin tools.
    pub const PRODUCTS: &str = "products";
    /// Saved shipping addresses.
    pub const ADDRESSES: &str = "shipping_addresses";
}

/// Errors that can occur when reading or writing persisted data.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the backend cannot store.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Backend did not answer in time.
    #[error("Timed out after {after:?} on key {key:?}")]
    Timeout { key: String, after: Duration },

    /// Backend is unreachable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Stored value is not valid JSON for the expected type.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable string storage that survives process restarts.
///
/// Deleting an absent key succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize a JSON value.
///
/// # Errors
///
/// Returns `StorageError` if the read fails or the stored value does not
/// parse as `T`.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.read(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the write fails.
pub async fn write_json<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.write(key, &raw).await
}

/// Returns true if `key` is safe to use as a file name on every backend.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(is_valid_key("cart"));
        assert!(is_valid_key("orders-v2.json"));
        assert!(is_valid_key("notify_log"));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(!is_valid_key(""));
        assert!(!is_valid_key(".hidden"));
        assert!(!is_valid_key("../escape"));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key("with space"));
    }

    #[tokio::test]
    async fn test_json_helpers_roundtrip() {
        let store = MemoryStore::new();
        write_json(&store, "numbers", &vec![1, 2, 3]).await.unwrap();

        let read: Option<Vec<i32>> = read_json(&store, "numbers").await.unwrap();
        assert_eq!(read, Some(vec![1, 2, 3]));

        let missing: Option<Vec<i32>> = read_json(&store, "absent").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_read_json_reports_corruption() {
        let store = MemoryStore::new();
        store.write("numbers", "{not json").await.unwrap();

        let result: Result<Option<Vec<i32>>, _> = read_json(&store, "numbers").await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
