//! Derived views over the notification collection.
//!
//! Two independent groupings coexist: type-and-day groups for the
//! notification drawer, and calendar-relative recency buckets for the list
//! page's time filter. Neither is derived from the other and neither is
//! stored back on the notifications.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, Utc};

use assist_entity::notification::bucket::TimeBucket;
use assist_entity::notification::group::NotificationGroup;
use assist_entity::Notification;

use crate::store::NotificationStore;

/// Memoized result of the last group computation.
#[derive(Debug)]
struct GroupCache {
    version: u64,
    groups: Vec<NotificationGroup>,
}

/// Read-only derivation of grouped views from the notification store.
///
/// Groups are memoized against the store's version token and recomputed
/// only when the token changes, so repeated reads of an unchanged
/// collection are free and deterministic.
#[derive(Debug)]
pub struct GroupingEngine {
    store: Arc<NotificationStore>,
    cache: Mutex<Option<GroupCache>>,
}

impl GroupingEngine {
    /// Create a grouping engine over a store.
    pub fn new(store: Arc<NotificationStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(None),
        }
    }

    /// Notifications grouped by `(kind, calendar day)`, most recently
    /// active group first.
    pub fn grouped(&self) -> Vec<NotificationGroup> {
        let (version, notifications) = self.store.versioned_snapshot();

        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.as_ref() {
            if cached.version == version {
                return cached.groups.clone();
            }
        }

        let groups = compute_groups(&notifications);
        *cache = Some(GroupCache {
            version,
            groups: groups.clone(),
        });
        groups
    }

    /// The flat collection partitioned into recency buckets against the
    /// current local date.
    pub fn time_buckets(&self) -> TimeBucketView {
        self.time_buckets_at(Local::now().date_naive())
    }

    /// Bucket partition against an explicit "today", for deterministic
    /// classification.
    pub fn time_buckets_at(&self, today: NaiveDate) -> TimeBucketView {
        let mut view = TimeBucketView::default();
        for n in self.store.notifications() {
            match TimeBucket::classify(local_day(n.timestamp), today) {
                TimeBucket::Today => view.today.push(n),
                TimeBucket::Yesterday => view.yesterday.push(n),
                TimeBucket::ThisWeek => view.this_week.push(n),
                TimeBucket::Older => view.older.push(n),
            }
        }
        view
    }
}

/// The flat notification list split by recency. Each bucket preserves
/// collection order (newest first).
#[derive(Debug, Clone, Default)]
pub struct TimeBucketView {
    /// Same calendar date as today.
    pub today: Vec<Notification>,
    /// The previous calendar date.
    pub yesterday: Vec<Notification>,
    /// Current ISO week, excluding today and yesterday.
    pub this_week: Vec<Notification>,
    /// Everything else.
    pub older: Vec<Notification>,
}

/// Partition and accumulate groups, then order by latest activity.
fn compute_groups(notifications: &[Notification]) -> Vec<NotificationGroup> {
    // BTreeMap keeps the partition deterministic; the final sort is stable,
    // so equal latest-timestamps tie-break by group key.
    let mut groups: BTreeMap<String, NotificationGroup> = BTreeMap::new();

    for n in notifications {
        let day = local_day(n.timestamp);
        let key = format!("{}-{}", n.kind, day.format("%Y-%m-%d"));

        let group = groups.entry(key.clone()).or_insert_with(|| NotificationGroup {
            id: key,
            kind: n.kind,
            notifications: Vec::new(),
            unread_count: 0,
            latest_timestamp: n.timestamp,
        });

        if n.is_unread() {
            group.unread_count += 1;
        }
        if n.timestamp > group.latest_timestamp {
            group.latest_timestamp = n.timestamp;
        }
        group.notifications.push(n.clone());
    }

    let mut ordered: Vec<NotificationGroup> = groups.into_values().collect();
    ordered.sort_by(|a, b| b.latest_timestamp.cmp(&a.latest_timestamp));
    ordered
}

fn local_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}
