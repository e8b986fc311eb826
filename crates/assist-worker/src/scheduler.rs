//! Cron scheduler for the scheduled-notification sweep.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use assist_core::config::worker::WorkerConfig;
use assist_core::error::AppError;
use assist_delivery::DeliveryGate;
use assist_settings::SettingsStore;
use assist_store::NotificationStore;

/// Cron-based scheduler driving the sweep tick.
pub struct SweepScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler").finish()
    }
}

impl SweepScheduler {
    /// Create a new sweep scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Register the sweep on the configured interval.
    pub async fn register_sweep(
        &self,
        config: &WorkerConfig,
        store: Arc<NotificationStore>,
        gate: Arc<DeliveryGate>,
        settings: Arc<SettingsStore>,
    ) -> Result<(), AppError> {
        let schedule = sweep_schedule(config.sweep_interval_seconds);

        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let store = Arc::clone(&store);
            let gate = Arc::clone(&gate);
            let settings = Arc::clone(&settings);
            Box::pin(async move {
                run_sweep(&store, &gate, &settings);
            })
        })
        .map_err(|e| AppError::scheduler(format!("Failed to create sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to add sweep schedule: {e}")))?;

        tracing::info!(
            "Registered: scheduled-notification sweep (every {}s)",
            config.sweep_interval_seconds
        );
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Sweep scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Sweep scheduler shut down");
        Ok(())
    }
}

/// One sweep tick: promote due items, then evaluate delivery for each
/// newly-active unread notification, in collection order.
pub fn run_sweep(store: &NotificationStore, gate: &DeliveryGate, settings: &SettingsStore) {
    let promoted = store.sweep(Utc::now());
    if promoted.is_empty() {
        return;
    }

    tracing::debug!("Sweep tick delivering {} notification(s)", promoted.len());
    let snapshot = settings.snapshot();
    for notification in &promoted {
        gate.deliver(notification, &snapshot);
    }
}

/// Map a sweep interval to a six-field cron expression.
fn sweep_schedule(interval_seconds: u64) -> String {
    if interval_seconds >= 60 {
        let minutes = interval_seconds / 60;
        if minutes == 1 {
            "0 * * * * *".to_string()
        } else {
            format!("0 */{minutes} * * * *")
        }
    } else {
        format!("*/{} * * * * *", interval_seconds.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use chrono::Duration;

    use assist_core::config::delivery::DeliveryConfig;
    use assist_core::config::settings::SettingsConfig;
    use assist_delivery::{AlertSound, DesktopNotifier, Permission};
    use assist_entity::{NotificationDraft, NotificationKind};

    #[test]
    fn interval_maps_to_cron_expression() {
        assert_eq!(sweep_schedule(60), "0 * * * * *");
        assert_eq!(sweep_schedule(120), "0 */2 * * * *");
        assert_eq!(sweep_schedule(15), "*/15 * * * * *");
        assert_eq!(sweep_schedule(0), "*/1 * * * * *");
    }

    #[derive(Debug, Default)]
    struct CountingSound {
        plays: Mutex<usize>,
    }

    impl AlertSound for CountingSound {
        fn play(&self, _gain: f32) {
            *self.plays.lock().unwrap() += 1;
        }
    }

    #[derive(Debug)]
    struct NoDesktop;

    impl DesktopNotifier for NoDesktop {
        fn permission(&self) -> Permission {
            Permission::Denied
        }

        fn request_permission(&self) -> Permission {
            Permission::Denied
        }

        fn notify(&self, _title: &str, _body: &str, _icon: &str) {}
    }

    #[test]
    fn sweep_tick_delivers_each_promoted_item_once() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::load(&SettingsConfig {
            path: dir
                .path()
                .join("settings.json")
                .to_string_lossy()
                .into_owned(),
        });
        let store = NotificationStore::new();
        let sound = Arc::new(CountingSound::default());
        let gate = DeliveryGate::new(
            Arc::clone(&sound) as Arc<dyn AlertSound>,
            Arc::new(NoDesktop) as Arc<dyn DesktopNotifier>,
            &DeliveryConfig::default(),
        );

        let draft = NotificationDraft {
            kind: NotificationKind::File,
            title: "Reminder".to_string(),
            message: "later".to_string(),
            data: None,
            group_id: None,
        };
        store.schedule(draft.clone(), Utc::now() - Duration::seconds(1));
        store.schedule(draft, Utc::now() + Duration::hours(1));

        run_sweep(&store, &gate, &settings);
        assert_eq!(*sound.plays.lock().unwrap(), 1);
        assert_eq!(store.unread_count(), 1);

        // The promoted item is not delivered again on the next tick.
        run_sweep(&store, &gate, &settings);
        assert_eq!(*sound.plays.lock().unwrap(), 1);
    }
}
