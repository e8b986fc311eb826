//! Calendar-relative recency buckets.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Recency classification of a notification relative to "now" at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeBucket {
    /// Same calendar date as today.
    Today,
    /// The previous calendar date.
    Yesterday,
    /// Within the current ISO week, but not today or yesterday.
    ThisWeek,
    /// Everything else.
    Older,
}

impl TimeBucket {
    /// Classify a calendar date against today's date.
    pub fn classify(date: NaiveDate, today: NaiveDate) -> Self {
        if date == today {
            return Self::Today;
        }
        if date == today - Duration::days(1) {
            return Self::Yesterday;
        }
        let week = date.iso_week();
        let this_week = today.iso_week();
        if week.year() == this_week.year() && week.week() == this_week.week() {
            return Self::ThisWeek;
        }
        Self::Older
    }
}
