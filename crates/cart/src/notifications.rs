//! Append-only activity log.
//!
//! Every cart mutation records a human-readable message here. Writes are
//! best effort: a failed append is logged and swallowed so it can never
//! block or fail the mutation that triggered it.
//!
//! The log is unbounded unless a `max_entries` limit is configured, in which
//! case the oldest entries are pruned after each append.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use shopfront_core::{Notification, NotificationId, StoredNotification};

use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Durable notification log stored under [`keys::NOTIFICATIONS`].
pub struct NotificationLog {
    storage: Arc<dyn KeyValueStore>,
    max_entries: Option<usize>,
    // Serializes read-modify-write cycles on the log key.
    write_lock: Mutex<()>,
}

impl NotificationLog {
    /// Create a log over `storage`, optionally keeping at most `max_entries`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, max_entries: Option<usize>) -> Self {
        Self {
            storage,
            max_entries,
            write_lock: Mutex::new(()),
        }
    }

    /// Append `message`. Returns the stored record, or `None` if the write
    /// failed.
    #[instrument(skip(self, message))]
    pub async fn append(&self, message: impl Into<String> + Send) -> Option<Notification> {
        let notification = Notification::new(message);
        let _guard = self.write_lock.lock().await;

        // A corrupt or foreign value is replaced rather than blocking the log.
        let mut entries = match self.load_entries().await {
            Ok(entries) => entries,
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Notification log unreadable, starting fresh");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read notification log");
                return None;
            }
        };

        entries.push(notification.clone());
        if let Some(max) = self.max_entries {
            let excess = entries.len().saturating_sub(max);
            if excess > 0 {
                entries.drain(..excess);
                debug!(pruned = excess, "Pruned oldest notifications");
            }
        }

        match write_json(self.storage.as_ref(), keys::NOTIFICATIONS, &entries).await {
            Ok(()) => Some(notification),
            Err(e) => {
                warn!(error = %e, "Failed to save notification");
                None
            }
        }
    }

    /// All notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read or parsed.
    pub async fn list(&self) -> Result<Vec<Notification>, StorageError> {
        // Loading may write back upgraded legacy entries.
        let guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await?;
        drop(guard);
        entries.reverse();
        // Stable sort keeps later appends first among equal timestamps.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Remove one notification. Returns true if it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read or written.
    pub async fn remove(&self, id: NotificationId) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await?;
        let before = entries.len();
        entries.retain(|n| n.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        write_json(self.storage.as_ref(), keys::NOTIFICATIONS, &entries).await?;
        Ok(true)
    }

    /// Delete the whole log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.storage.delete(keys::NOTIFICATIONS).await
    }

    /// Load the log in insertion order, upgrading bare-string entries.
    /// Callers hold `write_lock`.
    ///
    /// Legacy entries have no timestamp; they are staggered one second apart
    /// ending now so their relative order survives sorting. Upgraded records
    /// are written back so their ids stay stable.
    async fn load_entries(&self) -> Result<Vec<Notification>, StorageError> {
        let Some(stored) =
            read_json::<Vec<StoredNotification>>(self.storage.as_ref(), keys::NOTIFICATIONS)
                .await?
        else {
            return Ok(Vec::new());
        };

        let now = Utc::now();
        let total = stored.len();
        let mut upgraded = false;
        let entries: Vec<Notification> = stored
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                if matches!(entry, StoredNotification::Legacy(_)) {
                    upgraded = true;
                }
                let offset = i64::try_from(total - index).unwrap_or(i64::MAX);
                entry.into_notification(now - Duration::seconds(offset))
            })
            .collect();

        if upgraded
            && let Err(e) = write_json(self.storage.as_ref(), keys::NOTIFICATIONS, &entries).await
        {
            warn!(error = %e, "Failed to persist upgraded notifications");
        }

        Ok(entries)
    }
}
