//! Settings persistence and change propagation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{debug, warn};

use assist_core::config::settings::SettingsConfig;
use assist_entity::Settings;

/// Owns the durable settings blob.
///
/// The store is the sole writer; every other component consumes read-only
/// snapshots or a [`watch::Receiver`] of changes. Persistence failures are
/// logged and swallowed — losing a write never interrupts the
/// notification-delivery flow.
#[derive(Debug)]
pub struct SettingsStore {
    /// Path of the persisted JSON blob.
    path: PathBuf,
    /// Current settings value.
    current: Mutex<Settings>,
    /// Change feed for subscribers.
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Load settings from disk, merging the stored blob over defaults.
    ///
    /// A missing file yields the defaults; an unreadable or corrupt blob is
    /// logged and also yields the defaults.
    pub fn load(config: &SettingsConfig) -> Self {
        let path = PathBuf::from(&config.path);
        let settings = Self::read_blob(&path);
        let (tx, _) = watch::channel(settings.clone());

        Self {
            path,
            current: Mutex::new(settings),
            tx,
        }
    }

    fn read_blob(path: &Path) -> Settings {
        match fs::read_to_string(path) {
            // Serde defaults on every field merge the stored keys over the
            // built-in defaults, so blobs from older versions load cleanly.
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Corrupt settings blob at {}: {e}; using defaults", path.display());
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings blob at {}; using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                warn!("Failed to read settings at {}: {e}; using defaults", path.display());
                Settings::default()
            }
        }
    }

    /// Return a clone of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Subscribe to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Apply a mutation and persist the whole blob.
    pub fn update(&self, apply: impl FnOnce(&mut Settings)) -> Settings {
        let updated = {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            apply(&mut current);
            current.clone()
        };

        self.persist(&updated);
        let _ = self.tx.send(updated.clone());
        updated
    }

    /// Restore built-in defaults and remove the persisted blob.
    pub fn reset(&self) -> Settings {
        let defaults = Settings::default();
        {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            *current = defaults.clone();
        }

        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove settings blob at {}: {e}", self.path.display());
            }
        }

        let _ = self.tx.send(defaults.clone());
        defaults
    }

    /// Write the blob atomically: temp file in the same directory, then
    /// rename over the target.
    fn persist(&self, settings: &Settings) {
        let raw = match serde_json::to_string_pretty(settings) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize settings: {e}");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!("Failed to create settings directory {}: {e}", parent.display());
                    return;
                }
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp, raw) {
            warn!("Failed to write settings blob {}: {e}", tmp.display());
            return;
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            warn!("Failed to replace settings blob {}: {e}", self.path.display());
        }
    }
}
