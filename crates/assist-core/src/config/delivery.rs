//! Alert side-effect configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the sound and desktop-alert sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Alert tone frequency in hertz.
    #[serde(default = "default_tone_frequency")]
    pub tone_frequency_hz: f32,
    /// Alert tone duration in milliseconds.
    #[serde(default = "default_tone_duration")]
    pub tone_duration_ms: u64,
    /// Icon reference attached to desktop alerts.
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Override for the desktop notification command.
    ///
    /// When empty, the platform default is used (`notify-send` on Linux,
    /// `osascript` on macOS).
    #[serde(default)]
    pub notifier_command: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            tone_frequency_hz: default_tone_frequency(),
            tone_duration_ms: default_tone_duration(),
            icon: default_icon(),
            notifier_command: String::new(),
        }
    }
}

fn default_tone_frequency() -> f32 {
    880.0
}

fn default_tone_duration() -> u64 {
    350
}

fn default_icon() -> String {
    "assist".to_string()
}
