//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod delivery;
pub mod logging;
pub mod realtime;
pub mod settings;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::delivery::DeliveryConfig;
use self::logging::LoggingConfig;
use self::realtime::RealtimeConfig;
use self::settings::SettingsConfig;
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Event-stream (WebSocket client) settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Periodic sweep settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Alert side-effect settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// Durable user-settings blob location.
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ASSIST__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ASSIST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
