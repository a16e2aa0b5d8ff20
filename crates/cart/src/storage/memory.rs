//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StorageError};

/// Process-local store. Contents are lost when the process exits.
///
/// [`MemoryStore::set_unavailable`] makes every call fail, which lets tests
/// exercise the degraded-durability paths of the cart store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_delete() {
        let store = MemoryStore::new();
        assert!(store.read("cart").await.unwrap().is_none());

        store.write("cart", "[]").await.unwrap();
        assert_eq!(store.read("cart").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len().await, 1);

        store.delete("cart").await.unwrap();
        assert!(store.read("cart").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_absent_key_succeeds() {
        let store = MemoryStore::new();
        assert!(store.delete("never-written").await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let store = MemoryStore::new();
        store.write("cart", "[]").await.unwrap();
        store.set_unavailable(true);

        assert!(matches!(
            store.read("cart").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(store.write("cart", "[1]").await.is_err());
        assert!(store.delete("cart").await.is_err());

        store.set_unavailable(false);
        assert_eq!(store.read("cart").await.unwrap().as_deref(), Some("[]"));
    }
}
