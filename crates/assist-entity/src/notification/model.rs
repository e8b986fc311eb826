//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assist_core::types::NotificationId;

use super::kind::NotificationKind;

/// A notification surfaced to the dashboard user.
///
/// Field names serialize in camelCase to match the push-frame wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Source category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// When the notification was created. Immutable once set.
    pub timestamp: DateTime<Utc>,
    /// Whether the user has read this notification.
    #[serde(default)]
    pub read: bool,
    /// Opaque routing payload for the category-specific action handlers.
    /// Never interpreted by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Future delivery instant. While set, the notification is pending and
    /// fires no side effects; the sweep clears it once due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Reserved grouping handle. Derived groups are computed on the fly and
    /// never written back here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl Notification {
    /// Check whether the notification is unread.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Check whether the notification is still pending delivery.
    pub fn is_pending(&self) -> bool {
        self.scheduled_for.is_some()
    }

    /// Check whether a pending notification has come due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_for.map(|at| at <= now).unwrap_or(false)
    }
}

/// The caller-supplied part of a locally scheduled notification.
///
/// Id, timestamp, and read state are assigned by the store at schedule time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// Source category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Opaque routing payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Reserved grouping handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}
