//! The notification collection and its mutation operations.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use assist_core::types::NotificationId;
use assist_entity::{Notification, NotificationDraft};

/// Published on every effective mutation so presentation layers can update
/// badges and memoized views without polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUpdate {
    /// Monotonically increasing mutation counter.
    pub version: u64,
    /// Current unread count.
    pub unread: usize,
}

/// Collection state guarded by the store lock.
#[derive(Debug)]
struct Inner {
    /// Notifications, newest first.
    notifications: VecDeque<Notification>,
    /// Count of active (non-pending) unread notifications.
    ///
    /// Pending notifications are counted at activation time, when the sweep
    /// promotes them — "unread" means "delivered and unread".
    unread: usize,
    /// Bumped once per effective mutation.
    version: u64,
}

/// Exclusive owner of the notification collection and the unread counter.
///
/// Mutations run to completion under one lock, so readers observe either
/// the pre- or post-mutation collection, never a partial one. The public
/// contract is error-free: operating on an unknown id is a no-op.
#[derive(Debug)]
pub struct NotificationStore {
    inner: Mutex<Inner>,
    tx: watch::Sender<StoreUpdate>,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(StoreUpdate {
            version: 0,
            unread: 0,
        });
        Self {
            inner: Mutex::new(Inner {
                notifications: VecDeque::new(),
                unread: 0,
                version: 0,
            }),
            tx,
        }
    }

    /// Prepend a newly arrived notification and count it if unread.
    ///
    /// Returns `false` (dropping the notification) when its id is already
    /// live in the collection; id uniqueness is an invariant.
    pub fn ingest(&self, notification: Notification) -> bool {
        self.mutate(|inner| {
            if inner
                .notifications
                .iter()
                .any(|n| n.id == notification.id)
            {
                warn!("Dropping duplicate notification id {}", notification.id);
                return false;
            }
            if notification.is_unread() && !notification.is_pending() {
                inner.unread += 1;
            }
            inner.notifications.push_front(notification);
            true
        })
    }

    /// Mark one notification as read. No-op if the id is absent or the
    /// notification is already read.
    pub fn mark_read(&self, id: NotificationId) {
        self.mutate(|inner| {
            let Some(n) = inner.notifications.iter_mut().find(|n| n.id == id) else {
                return false;
            };
            if n.read {
                return false;
            }
            n.read = true;
            // A still-pending notification was never counted.
            if !n.is_pending() {
                inner.unread = inner.unread.saturating_sub(1);
            }
            true
        });
    }

    /// Mark every notification as read and zero the counter.
    pub fn mark_all_read(&self) {
        self.mutate(|inner| {
            for n in inner.notifications.iter_mut() {
                n.read = true;
            }
            inner.unread = 0;
            true
        });
    }

    /// Remove one notification. No-op if the id is absent.
    pub fn clear(&self, id: NotificationId) {
        self.mutate(|inner| {
            let Some(pos) = inner.notifications.iter().position(|n| n.id == id) else {
                return false;
            };
            if let Some(removed) = inner.notifications.remove(pos) {
                if removed.is_unread() && !removed.is_pending() {
                    inner.unread = inner.unread.saturating_sub(1);
                }
            }
            true
        });
    }

    /// Empty the collection and zero the counter.
    pub fn clear_all(&self) {
        self.mutate(|inner| {
            inner.notifications.clear();
            inner.unread = 0;
            true
        });
    }

    /// Create a pending notification due at `scheduled_for`.
    ///
    /// The unread counter is untouched until the sweep promotes the
    /// notification. Returns the created notification so the caller holds
    /// its id for cancellation.
    pub fn schedule(
        &self,
        draft: NotificationDraft,
        scheduled_for: DateTime<Utc>,
    ) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            timestamp: Utc::now(),
            read: false,
            data: draft.data,
            scheduled_for: Some(scheduled_for),
            group_id: draft.group_id,
        };

        let created = notification.clone();
        self.mutate(|inner| {
            inner.notifications.push_front(notification);
            true
        });
        created
    }

    /// Create a pending notification due `delay` from now.
    pub fn schedule_in(&self, draft: NotificationDraft, delay: Duration) -> Notification {
        self.schedule(draft, Utc::now() + delay)
    }

    /// Remove a still-pending notification. No-op if the id is absent or
    /// the notification already became active.
    pub fn cancel_scheduled(&self, id: NotificationId) {
        self.mutate(|inner| {
            let Some(pos) = inner
                .notifications
                .iter()
                .position(|n| n.id == id && n.is_pending())
            else {
                return false;
            };
            inner.notifications.remove(pos);
            debug!("Cancelled scheduled notification {id}");
            true
        });
    }

    /// Promote every pending notification due at or before `now`.
    ///
    /// Clears `scheduled_for`, counts newly-active unread notifications,
    /// and returns the promoted ones in collection order so the caller can
    /// route each through the delivery gate exactly once. All same-tick
    /// promotions complete before any reader observes the collection again.
    pub fn sweep(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let (_, promoted) = self.mutate(|inner| {
            let mut promoted = Vec::new();
            let mut changed = false;
            for n in inner.notifications.iter_mut() {
                if n.is_due(now) {
                    n.scheduled_for = None;
                    changed = true;
                    if n.is_unread() {
                        inner.unread += 1;
                        promoted.push(n.clone());
                    }
                }
            }
            if changed {
                debug!("Sweep promoted {} notification(s)", promoted.len());
            }
            (changed, promoted)
        });
        promoted
    }

    /// All notifications, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        let inner = self.lock();
        inner.notifications.iter().cloned().collect()
    }

    /// The collection together with the version it was observed at.
    pub fn versioned_snapshot(&self) -> (u64, Vec<Notification>) {
        let inner = self.lock();
        (inner.version, inner.notifications.iter().cloned().collect())
    }

    /// Current unread count.
    pub fn unread_count(&self) -> usize {
        self.lock().unread
    }

    /// Current version token. Bumped once per effective mutation; no-ops
    /// leave it unchanged.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Subscribe to `(version, unread)` updates.
    pub fn subscribe(&self) -> watch::Receiver<StoreUpdate> {
        self.tx.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a mutation under the lock; bump the version and publish an
    /// update only when the mutation reports a change.
    fn mutate<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T
    where
        T: MutationOutcome,
    {
        let mut inner = self.lock();
        let outcome = f(&mut inner);
        if outcome.changed() {
            inner.version += 1;
            let update = StoreUpdate {
                version: inner.version,
                unread: inner.unread,
            };
            drop(inner);
            let _ = self.tx.send(update);
        }
        outcome
    }
}

/// Lets [`NotificationStore::mutate`] accept both plain `bool` outcomes and
/// outcomes carrying a payload.
trait MutationOutcome {
    fn changed(&self) -> bool;
}

impl MutationOutcome for bool {
    fn changed(&self) -> bool {
        *self
    }
}

impl<T> MutationOutcome for (bool, T) {
    fn changed(&self) -> bool {
        self.0
    }
}
