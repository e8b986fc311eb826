//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::Utc;

use assist_core::config::delivery::DeliveryConfig;
use assist_core::config::settings::SettingsConfig;
use assist_core::types::NotificationId;
use assist_delivery::{AlertSound, DeliveryGate, DesktopNotifier, Permission};
use assist_entity::{Notification, NotificationDraft, NotificationKind};
use assist_settings::SettingsStore;

/// Records tone triggers instead of making noise.
#[derive(Debug, Default)]
pub struct RecordingSound {
    pub gains: Mutex<Vec<f32>>,
}

impl RecordingSound {
    pub fn plays(&self) -> usize {
        self.gains.lock().unwrap().len()
    }
}

impl AlertSound for RecordingSound {
    fn play(&self, gain: f32) {
        self.gains.lock().unwrap().push(gain);
    }
}

/// Records desktop alerts with permission always granted.
#[derive(Debug, Default)]
pub struct RecordingDesktop {
    pub alerts: Mutex<Vec<(String, String)>>,
}

impl DesktopNotifier for RecordingDesktop {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn notify(&self, title: &str, body: &str, _icon: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

/// A settings store backed by a temp directory. Keep the `TempDir` alive
/// for the duration of the test.
pub fn settings_store(dir: &tempfile::TempDir) -> Arc<SettingsStore> {
    Arc::new(SettingsStore::load(&SettingsConfig {
        path: dir
            .path()
            .join("settings.json")
            .to_string_lossy()
            .into_owned(),
    }))
}

/// A gate wired to recording sinks.
pub fn recording_gate() -> (Arc<RecordingSound>, Arc<RecordingDesktop>, Arc<DeliveryGate>) {
    let sound = Arc::new(RecordingSound::default());
    let desktop = Arc::new(RecordingDesktop::default());
    let gate = Arc::new(DeliveryGate::new(
        Arc::clone(&sound) as Arc<dyn AlertSound>,
        Arc::clone(&desktop) as Arc<dyn DesktopNotifier>,
        &DeliveryConfig::default(),
    ));
    (sound, desktop, gate)
}

pub fn notification(kind: NotificationKind, title: &str) -> Notification {
    Notification {
        id: NotificationId::new(),
        kind,
        title: title.to_string(),
        message: format!("{title} body"),
        timestamp: Utc::now(),
        read: false,
        data: None,
        scheduled_for: None,
        group_id: None,
    }
}

pub fn draft(kind: NotificationKind, title: &str) -> NotificationDraft {
    NotificationDraft {
        kind,
        title: title.to_string(),
        message: format!("{title} body"),
        data: None,
        group_id: None,
    }
}
