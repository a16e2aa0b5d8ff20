//! Activity notification records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::NotificationId;
use super::status::NotificationKind;

/// A locally logged, human-readable activity message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    /// Create a notification stamped now, with its kind inferred from the text.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(message, Utc::now())
    }

    /// Create a notification with an explicit timestamp.
    #[must_use]
    pub fn at(message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let message = message.into();
        Self {
            id: NotificationId::generate(),
            kind: NotificationKind::infer(&message),
            message,
            created_at,
        }
    }
}

/// A stored log entry: either a full record or a bare message written by
/// older app versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredNotification {
    Record(Notification),
    Legacy(String),
}

impl StoredNotification {
    /// Upgrade to a full record. Legacy entries get a fresh id and the
    /// supplied timestamp.
    #[must_use]
    pub fn into_notification(self, fallback_time: DateTime<Utc>) -> Notification {
        match self {
            Self::Record(notification) => notification,
            Self::Legacy(message) => Notification::at(message, fallback_time),
        }
    }
}
