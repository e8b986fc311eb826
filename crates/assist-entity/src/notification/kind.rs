//! Notification source-kind enumeration.

use serde::{Deserialize, Serialize};

/// Source category of a notification.
///
/// This is a closed set: every notification the dashboard surfaces comes
/// from one of the three integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// New or updated email.
    Email,
    /// File activity on the connected share.
    File,
    /// Social-media activity.
    Social,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::File => "file",
            Self::Social => "social",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
