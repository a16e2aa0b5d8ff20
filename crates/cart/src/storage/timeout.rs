//! Timeout guard for slow storage backends.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{KeyValueStore, StorageError};

/// Wraps a store so no single call can hang longer than `timeout`.
#[derive(Debug)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: KeyValueStore> TimeoutStore<S> {
    /// Wrap `inner`, bounding each call by `timeout`.
    #[must_use]
    pub const fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// The wrapped store.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        key: &str,
        op: impl Future<Output = Result<T, StorageError>> + Send,
    ) -> Result<T, StorageError> {
        if let Ok(result) = tokio::time::timeout(self.timeout, op).await {
            result
        } else {
            warn!(key, timeout = ?self.timeout, "Storage call timed out");
            Err(StorageError::Timeout {
                key: key.to_owned(),
                after: self.timeout,
            })
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for TimeoutStore<S> {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.bounded(key, self.inner.read(key)).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.bounded(key, self.inner.write(key, value)).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.bounded(key, self.inner.delete(key)).await
    }
}
