//! Durable user-settings blob configuration.

use serde::{Deserialize, Serialize};

/// Location of the persisted settings blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Path to the JSON settings file.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "data/settings.json".to_string()
}
