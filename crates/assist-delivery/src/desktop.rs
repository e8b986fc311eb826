//! Desktop alert integration.

use std::process::Command;
use std::sync::Mutex;

use tracing::{debug, warn};

use assist_core::config::delivery::DeliveryConfig;

/// Platform permission to raise desktop alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not yet probed.
    Undetermined,
    /// Alerts can be raised.
    Granted,
    /// Alerts are unavailable; deliveries skip them silently.
    Denied,
}

/// Raises desktop-level alerts.
pub trait DesktopNotifier: Send + Sync + std::fmt::Debug {
    /// Current permission state.
    fn permission(&self) -> Permission;

    /// Resolve an undetermined permission state, returning the result.
    fn request_permission(&self) -> Permission;

    /// Raise an alert. Failures are logged and swallowed.
    fn notify(&self, title: &str, body: &str, icon: &str);
}

/// Desktop alerts via the platform notification command: `notify-send` on
/// Linux, `osascript` on macOS. The permission model maps to command
/// availability — the first delivery probes for the binary and the result
/// is cached; a missing binary reads as denied.
#[derive(Debug)]
pub struct CommandNotifier {
    command: String,
    state: Mutex<Permission>,
}

impl CommandNotifier {
    /// Create a notifier using the configured command override or the
    /// platform default.
    pub fn new(config: &DeliveryConfig) -> Self {
        let command = if config.notifier_command.is_empty() {
            default_command().to_string()
        } else {
            config.notifier_command.clone()
        };
        Self {
            command,
            state: Mutex::new(Permission::Undetermined),
        }
    }

    fn probe(&self) -> Permission {
        if self.command.is_empty() {
            return Permission::Denied;
        }
        match Command::new(&self.command).args(probe_args()).output() {
            Ok(_) => Permission::Granted,
            Err(e) => {
                debug!("Desktop notifier '{}' unavailable: {e}", self.command);
                Permission::Denied
            }
        }
    }
}

impl DesktopNotifier for CommandNotifier {
    fn permission(&self) -> Permission {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn request_permission(&self) -> Permission {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == Permission::Undetermined {
            *state = self.probe();
        }
        *state
    }

    fn notify(&self, title: &str, body: &str, icon: &str) {
        let mut command = Command::new(&self.command);
        apply_alert_args(&mut command, title, body, icon);
        // Fire and forget; the alert either shows or it doesn't.
        if let Err(e) = command.spawn() {
            warn!("Failed to raise desktop alert: {e}");
        }
    }
}

#[cfg(target_os = "macos")]
fn default_command() -> &'static str {
    "osascript"
}

#[cfg(target_os = "linux")]
fn default_command() -> &'static str {
    "notify-send"
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn default_command() -> &'static str {
    ""
}

#[cfg(target_os = "macos")]
fn probe_args() -> Vec<String> {
    vec!["-e".to_string(), "return".to_string()]
}

#[cfg(not(target_os = "macos"))]
fn probe_args() -> Vec<String> {
    vec!["--version".to_string()]
}

#[cfg(target_os = "macos")]
fn apply_alert_args(command: &mut Command, title: &str, body: &str, _icon: &str) {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(body),
        escape_applescript(title)
    );
    command.arg("-e").arg(script);
}

#[cfg(not(target_os = "macos"))]
fn apply_alert_args(command: &mut Command, title: &str, body: &str, icon: &str) {
    command.arg("--icon").arg(icon).arg(title).arg(body);
}

#[cfg(target_os = "macos")]
fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_reads_as_denied() {
        let notifier = CommandNotifier {
            command: "assist-no-such-notifier".to_string(),
            state: Mutex::new(Permission::Undetermined),
        };

        assert_eq!(notifier.permission(), Permission::Undetermined);
        assert_eq!(notifier.request_permission(), Permission::Denied);
        // The probe result is cached.
        assert_eq!(notifier.permission(), Permission::Denied);
    }
}
