//! Daily quiet-hours window.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A configured daily time window during which delivery side effects are
/// suppressed. Storage and unread counting still occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    /// Whether the window is active at all.
    #[serde(default)]
    pub enabled: bool,
    /// Window start as a local "HH:MM" wall-clock string.
    #[serde(default = "default_start")]
    pub start: String,
    /// Window end as a local "HH:MM" wall-clock string.
    #[serde(default = "default_end")]
    pub end: String,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: default_start(),
            end: default_end(),
        }
    }
}

fn default_start() -> String {
    "22:00".to_string()
}

fn default_end() -> String {
    "08:00".to_string()
}

impl QuietHours {
    /// Test whether a local wall-clock time falls inside the window.
    ///
    /// With `start <= end` the window is the closed interval `[start, end]`.
    /// With `start > end` it wraps past midnight: quiet when
    /// `now >= start || now <= end`. A disabled or unparseable window is
    /// never quiet.
    pub fn contains(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        let (Some(start), Some(end)) = (minute_of_day(&self.start), minute_of_day(&self.end))
        else {
            return false;
        };
        let current = now.hour() * 60 + now.minute();
        if start <= end {
            current >= start && current <= end
        } else {
            current >= start || current <= end
        }
    }
}

/// Parse an "HH:MM" string into a minute-of-day value.
fn minute_of_day(value: &str) -> Option<u32> {
    let (hours, minutes) = value.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}
