//! Routes received notifications through the store and the delivery gate.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use assist_delivery::DeliveryGate;
use assist_entity::Notification;
use assist_settings::SettingsStore;
use assist_store::NotificationStore;

/// The ingest path: store first, then exactly one delivery evaluation.
///
/// The store and the gate never call each other; this dispatcher is the
/// only component that sequences them, which keeps the
/// one-delivery-per-activation guarantee in a single place.
#[derive(Debug)]
pub struct NotificationDispatcher {
    store: Arc<NotificationStore>,
    gate: Arc<DeliveryGate>,
    settings: Arc<SettingsStore>,
}

impl NotificationDispatcher {
    /// Create a dispatcher over the store, gate, and settings.
    pub fn new(
        store: Arc<NotificationStore>,
        gate: Arc<DeliveryGate>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            store,
            gate,
            settings,
        }
    }

    /// Ingest one received notification and evaluate its delivery.
    ///
    /// A notification the store rejects (duplicate id) is not delivered.
    pub fn dispatch(&self, notification: Notification) {
        if !self.store.ingest(notification.clone()) {
            return;
        }
        self.gate.deliver(&notification, &self.settings.snapshot());
    }

    /// Consume the event-source feed until shutdown.
    pub async fn run(
        &self,
        mut notifications: broadcast::Receiver<Notification>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                received = notifications.recv() => {
                    match received {
                        Ok(notification) => self.dispatch(notification),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("Dispatcher lagged; {skipped} notification(s) skipped");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        info!("Notification dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use chrono::Utc;

    use assist_core::config::delivery::DeliveryConfig;
    use assist_core::config::settings::SettingsConfig;
    use assist_core::types::NotificationId;
    use assist_delivery::{AlertSound, DesktopNotifier, Permission};
    use assist_entity::NotificationKind;

    #[derive(Debug, Default)]
    struct CountingSound {
        plays: Mutex<Vec<f32>>,
    }

    impl AlertSound for CountingSound {
        fn play(&self, gain: f32) {
            self.plays.lock().unwrap().push(gain);
        }
    }

    #[derive(Debug)]
    struct DeniedDesktop;

    impl DesktopNotifier for DeniedDesktop {
        fn permission(&self) -> Permission {
            Permission::Denied
        }

        fn request_permission(&self) -> Permission {
            Permission::Denied
        }

        fn notify(&self, _title: &str, _body: &str, _icon: &str) {
            panic!("denied notifier must never be invoked");
        }
    }

    fn dispatcher() -> (Arc<NotificationStore>, Arc<CountingSound>, NotificationDispatcher) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(SettingsStore::load(&SettingsConfig {
            path: dir
                .path()
                .join("settings.json")
                .to_string_lossy()
                .into_owned(),
        }));
        let store = Arc::new(NotificationStore::new());
        let sound = Arc::new(CountingSound::default());
        let gate = Arc::new(DeliveryGate::new(
            Arc::clone(&sound) as Arc<dyn AlertSound>,
            Arc::new(DeniedDesktop) as Arc<dyn DesktopNotifier>,
            &DeliveryConfig::default(),
        ));
        let dispatcher =
            NotificationDispatcher::new(Arc::clone(&store), gate, Arc::clone(&settings));
        (store, sound, dispatcher)
    }

    fn notification() -> Notification {
        Notification {
            id: NotificationId::new(),
            kind: NotificationKind::Social,
            title: "mention".to_string(),
            message: "someone mentioned you".to_string(),
            timestamp: Utc::now(),
            read: false,
            data: None,
            scheduled_for: None,
            group_id: None,
        }
    }

    #[test]
    fn dispatch_stores_then_delivers_once() {
        let (store, sound, dispatcher) = dispatcher();

        dispatcher.dispatch(notification());

        assert_eq!(store.unread_count(), 1);
        assert_eq!(sound.plays.lock().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_ids_are_not_delivered_twice() {
        let (store, sound, dispatcher) = dispatcher();
        let n = notification();

        dispatcher.dispatch(n.clone());
        dispatcher.dispatch(n);

        assert_eq!(store.notifications().len(), 1);
        assert_eq!(sound.plays.lock().unwrap().len(), 1);
    }
}
