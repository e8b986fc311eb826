//! The delivery decision per newly active notification.

use std::sync::Arc;

use chrono::{Local, NaiveTime};
use tracing::debug;

use assist_core::config::delivery::DeliveryConfig;
use assist_entity::{Notification, Settings};

use crate::desktop::{DesktopNotifier, Permission};
use crate::sound::AlertSound;

/// Decides whether a newly active notification plays a sound and/or raises
/// a desktop alert.
///
/// The gate is invoked exactly once per notification at the moment it
/// becomes active — on ingest for immediate notifications, at promotion for
/// scheduled ones — and never on read/unread toggling. It only reads the
/// settings snapshot and the notification under evaluation; it mutates
/// nothing.
#[derive(Debug)]
pub struct DeliveryGate {
    sound: Arc<dyn AlertSound>,
    desktop: Arc<dyn DesktopNotifier>,
    icon: String,
}

impl DeliveryGate {
    /// Create a gate over the given side-effect sinks.
    pub fn new(
        sound: Arc<dyn AlertSound>,
        desktop: Arc<dyn DesktopNotifier>,
        config: &DeliveryConfig,
    ) -> Self {
        Self {
            sound,
            desktop,
            icon: config.icon.clone(),
        }
    }

    /// Evaluate a notification against the current local wall-clock time.
    pub fn deliver(&self, notification: &Notification, settings: &Settings) {
        self.deliver_at(notification, settings, Local::now().time());
    }

    /// Evaluate against an explicit wall-clock time.
    pub fn deliver_at(&self, notification: &Notification, settings: &Settings, now: NaiveTime) {
        let prefs = &settings.notifications;

        if !prefs.enabled {
            return;
        }
        if prefs.quiet_hours.contains(now) {
            debug!(
                "Suppressing alerts for notification {} during quiet hours",
                notification.id
            );
            return;
        }

        if prefs.sound {
            let gain = f32::from(prefs.volume.min(100)) / 100.0;
            self.sound.play(gain);
        }

        if prefs.browser {
            let mut permission = self.desktop.permission();
            if permission == Permission::Undetermined {
                permission = self.desktop.request_permission();
            }
            if permission == Permission::Granted {
                self.desktop
                    .notify(&notification.title, &notification.message, &self.icon);
            }
            // Denied: silently skipped, no retry, no error.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use chrono::Utc;

    use assist_core::types::NotificationId;
    use assist_entity::NotificationKind;

    #[derive(Debug, Default)]
    struct RecordingSound {
        gains: Mutex<Vec<f32>>,
    }

    impl AlertSound for RecordingSound {
        fn play(&self, gain: f32) {
            self.gains.lock().unwrap().push(gain);
        }
    }

    #[derive(Debug)]
    struct RecordingDesktop {
        permission: Mutex<Permission>,
        grant_on_request: bool,
        requests: Mutex<usize>,
        alerts: Mutex<Vec<(String, String)>>,
    }

    impl RecordingDesktop {
        fn with(permission: Permission, grant_on_request: bool) -> Self {
            Self {
                permission: Mutex::new(permission),
                grant_on_request,
                requests: Mutex::new(0),
                alerts: Mutex::new(Vec::new()),
            }
        }
    }

    impl DesktopNotifier for RecordingDesktop {
        fn permission(&self) -> Permission {
            *self.permission.lock().unwrap()
        }

        fn request_permission(&self) -> Permission {
            *self.requests.lock().unwrap() += 1;
            let resolved = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
            *self.permission.lock().unwrap() = resolved;
            resolved
        }

        fn notify(&self, title: &str, body: &str, _icon: &str) {
            self.alerts
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
        }
    }

    fn notification() -> Notification {
        Notification {
            id: NotificationId::new(),
            kind: NotificationKind::Email,
            title: "A".to_string(),
            message: "You have mail".to_string(),
            timestamp: Utc::now(),
            read: false,
            data: None,
            scheduled_for: None,
            group_id: None,
        }
    }

    fn gate_with(
        desktop: RecordingDesktop,
    ) -> (Arc<RecordingSound>, Arc<RecordingDesktop>, DeliveryGate) {
        let sound = Arc::new(RecordingSound::default());
        let desktop = Arc::new(desktop);
        let gate = DeliveryGate::new(
            Arc::clone(&sound) as Arc<dyn AlertSound>,
            Arc::clone(&desktop) as Arc<dyn DesktopNotifier>,
            &DeliveryConfig::default(),
        );
        (sound, desktop, gate)
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn plays_at_configured_gain() {
        let (sound, desktop, gate) = gate_with(RecordingDesktop::with(Permission::Granted, true));
        let mut settings = Settings::default();
        settings.notifications.volume = 50;

        gate.deliver_at(&notification(), &settings, at(12, 0));

        assert_eq!(*sound.gains.lock().unwrap(), vec![0.5]);
        assert_eq!(desktop.alerts.lock().unwrap().len(), 1);
    }

    #[test]
    fn disabled_notifications_fire_nothing() {
        let (sound, desktop, gate) = gate_with(RecordingDesktop::with(Permission::Granted, true));
        let mut settings = Settings::default();
        settings.notifications.enabled = false;

        gate.deliver_at(&notification(), &settings, at(12, 0));

        assert!(sound.gains.lock().unwrap().is_empty());
        assert!(desktop.alerts.lock().unwrap().is_empty());
    }

    #[test]
    fn quiet_hours_suppress_all_side_effects() {
        let (sound, desktop, gate) = gate_with(RecordingDesktop::with(Permission::Granted, true));
        let mut settings = Settings::default();
        settings.notifications.quiet_hours.enabled = true;
        settings.notifications.quiet_hours.start = "22:00".to_string();
        settings.notifications.quiet_hours.end = "08:00".to_string();

        gate.deliver_at(&notification(), &settings, at(23, 0));
        assert!(sound.gains.lock().unwrap().is_empty());
        assert!(desktop.alerts.lock().unwrap().is_empty());

        // Outside the window delivery proceeds.
        gate.deliver_at(&notification(), &settings, at(9, 0));
        assert_eq!(sound.gains.lock().unwrap().len(), 1);
    }

    #[test]
    fn undetermined_permission_is_requested_once_then_used() {
        let (_, desktop, gate) = gate_with(RecordingDesktop::with(Permission::Undetermined, true));
        let settings = Settings::default();

        gate.deliver_at(&notification(), &settings, at(12, 0));

        assert_eq!(*desktop.requests.lock().unwrap(), 1);
        let alerts = desktop.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].0, "A");
    }

    #[test]
    fn denied_permission_skips_the_alert_silently() {
        let (sound, desktop, gate) = gate_with(RecordingDesktop::with(Permission::Denied, false));
        let settings = Settings::default();

        gate.deliver_at(&notification(), &settings, at(12, 0));

        // Sound still plays; only the desktop alert is skipped.
        assert_eq!(sound.gains.lock().unwrap().len(), 1);
        assert!(desktop.alerts.lock().unwrap().is_empty());
        assert_eq!(*desktop.requests.lock().unwrap(), 0);
    }

    #[test]
    fn sound_can_be_disabled_independently() {
        let (sound, desktop, gate) = gate_with(RecordingDesktop::with(Permission::Granted, true));
        let mut settings = Settings::default();
        settings.notifications.sound = false;

        gate.deliver_at(&notification(), &settings, at(12, 0));

        assert!(sound.gains.lock().unwrap().is_empty());
        assert_eq!(desktop.alerts.lock().unwrap().len(), 1);
    }
}
