//! Event-stream (WebSocket client) configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the push event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint delivering notification frames.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Delay before reconnecting after a disconnect, in seconds.
    ///
    /// The reconnect policy is deliberately flat: retry forever at this
    /// fixed delay, with no backoff growth and no retry cap.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_seconds: u64,
    /// Internal buffer size for the parsed-notification channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reconnect_delay_seconds: default_reconnect_delay(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_endpoint() -> String {
    "ws://localhost:3001/notifications".to_string()
}

fn default_reconnect_delay() -> u64 {
    5
}

fn default_channel_buffer() -> usize {
    256
}
