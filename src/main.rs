//! Assist notification daemon.
//!
//! Main entry point that wires all crates together: settings store,
//! notification store, delivery gate, event-stream client, and the
//! scheduled-notification sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use assist_core::config::AppConfig;
use assist_core::error::AppError;
use assist_delivery::{AlertSound, CommandNotifier, DeliveryGate, DesktopNotifier, TonePlayer};
use assist_realtime::{EventSource, NotificationDispatcher};
use assist_settings::SettingsStore;
use assist_store::NotificationStore;
use assist_worker::SweepScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("ASSIST_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Engine error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main engine run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        "Starting Assist notification engine v{}",
        env!("CARGO_PKG_VERSION")
    );

    let settings = Arc::new(SettingsStore::load(&config.settings));
    let store = Arc::new(NotificationStore::new());

    let sound: Arc<dyn AlertSound> = Arc::new(TonePlayer::new(&config.delivery));
    let desktop: Arc<dyn DesktopNotifier> = Arc::new(CommandNotifier::new(&config.delivery));
    let gate = Arc::new(DeliveryGate::new(sound, desktop, &config.delivery));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Surface unread-badge changes in the log for the dashboard to pick up.
    let mut updates = store.subscribe();
    let mut badge_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = badge_shutdown.changed() => {
                    if changed.is_err() || *badge_shutdown.borrow() {
                        break;
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let update = *updates.borrow();
                    tracing::debug!("Store v{}: {} unread", update.version, update.unread);
                }
            }
        }
    });

    let event_source = Arc::new(EventSource::new(config.realtime.clone()));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&gate),
        Arc::clone(&settings),
    ));

    let notifications = event_source.subscribe();
    let dispatcher_task = {
        let dispatcher = Arc::clone(&dispatcher);
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            dispatcher.run(notifications, shutdown).await;
        })
    };
    let source_task = {
        let source = Arc::clone(&event_source);
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            source.run(shutdown).await;
        })
    };

    let scheduler = if config.worker.enabled {
        let scheduler = SweepScheduler::new().await?;
        scheduler
            .register_sweep(
                &config.worker,
                Arc::clone(&store),
                Arc::clone(&gate),
                Arc::clone(&settings),
            )
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduled-notification sweep disabled by configuration");
        None
    };

    tracing::info!("Engine running; press ctrl-c to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    tracing::info!("Shutting down");
    let _ = shutdown_tx.send(true);
    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_task).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), source_task).await;

    tracing::info!("Engine stopped");
    Ok(())
}
