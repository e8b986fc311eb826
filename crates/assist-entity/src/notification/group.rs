//! Derived notification grouping by source kind and calendar day.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::kind::NotificationKind;
use super::model::Notification;

/// A derived group of notifications sharing a kind and a calendar day.
///
/// Groups are regenerated deterministically from the notification
/// collection and never mutated directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationGroup {
    /// Group key, `{kind}-{calendar day}`.
    pub id: String,
    /// Source category shared by every member.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Member notifications, in collection order.
    pub notifications: Vec<Notification>,
    /// Number of unread members.
    pub unread_count: usize,
    /// Latest creation timestamp among members.
    pub latest_timestamp: DateTime<Utc>,
}
