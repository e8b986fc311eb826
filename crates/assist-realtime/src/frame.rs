//! Wire frame definitions for the push event stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assist_core::types::NotificationId;
use assist_entity::{Notification, NotificationKind};

/// One pushed notification per text frame.
///
/// The shape matches [`Notification`] minus `scheduledFor` — the remote
/// origin only pushes immediate notifications; scheduling is a local
/// concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushFrame {
    /// Identifier assigned by the remote origin.
    pub id: NotificationId,
    /// Source category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    /// Read state; origins normally push unread.
    #[serde(default)]
    pub read: bool,
    /// Opaque routing payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Reserved grouping handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl From<PushFrame> for Notification {
    fn from(frame: PushFrame) -> Self {
        Notification {
            id: frame.id,
            kind: frame.kind,
            title: frame.title,
            message: frame.message,
            timestamp: frame.timestamp,
            read: frame.read,
            data: frame.data,
            scheduled_for: None,
            group_id: frame.group_id,
        }
    }
}

/// Envelope for frames sent back to the remote origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundFrame {
    /// Frame discriminator.
    #[serde(rename = "type")]
    pub frame_type: String,
    /// Frame payload.
    pub data: serde_json::Value,
}

impl OutboundFrame {
    /// Build an envelope.
    pub fn new(frame_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            frame_type: frame_type.into(),
            data,
        }
    }
}
