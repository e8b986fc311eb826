//! User settings blob.
//!
//! Every field carries a serde default so a blob written by an older
//! version deserializes cleanly: missing keys fall back to the built-in
//! defaults with no explicit migration step.

use serde::{Deserialize, Serialize};

use super::quiet_hours::QuietHours;

/// The full durable settings blob.
///
/// The engine only consults [`NotificationSettings`]; the integration
/// sections belong to the dashboard and are round-tripped untouched so the
/// settings file stays the single source both sides read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Notification delivery preferences.
    #[serde(default)]
    pub notifications: NotificationSettings,
    /// Mail server integration (dashboard-owned).
    #[serde(default)]
    pub email: EmailSettings,
    /// NAS integration (dashboard-owned).
    #[serde(default)]
    pub nas: NasSettings,
    /// Social platform integration (dashboard-owned).
    #[serde(default)]
    pub social: SocialSettings,
}

/// Notification delivery preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Master switch; when off, no side effects fire at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Play the alert tone on delivery.
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Raise a desktop alert on delivery.
    #[serde(default = "default_true")]
    pub browser: bool,
    /// Forward notifications by email (dashboard-owned channel).
    #[serde(default)]
    pub email: bool,
    /// Alert tone volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Daily suppression window.
    #[serde(default)]
    pub quiet_hours: QuietHours,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            browser: true,
            email: false,
            volume: default_volume(),
            quiet_hours: QuietHours::default(),
        }
    }
}

/// Mail server credentials. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub server: String,
    #[serde(default = "default_smtp_port")]
    pub port: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            server: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// NAS share credentials. Opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NasSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub share: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Social platform API credentials. Opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialSettings {
    #[serde(default)]
    pub twitter: TwitterSettings,
    #[serde(default)]
    pub facebook: FacebookSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacebookSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_secret: String,
}

fn default_true() -> bool {
    true
}

fn default_volume() -> u8 {
    50
}

fn default_smtp_port() -> String {
    "587".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        // A blob from an older version that only knows about sound.
        let blob = r#"{"notifications": {"sound": false}}"#;
        let settings: Settings = serde_json::from_str(blob).unwrap();

        assert!(!settings.notifications.sound);
        assert!(settings.notifications.enabled);
        assert_eq!(settings.notifications.volume, 50);
        assert!(!settings.notifications.quiet_hours.enabled);
        assert_eq!(settings.email.port, "587");
    }

    #[test]
    fn quiet_hours_round_trip_camel_case() {
        let settings = Settings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json["notifications"].get("quietHours").is_some());
    }
}
