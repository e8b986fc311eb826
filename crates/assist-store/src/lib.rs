//! # assist-store
//!
//! The notification store — the ordered in-memory collection, the unread
//! counter, and every mutation (ingest, read toggles, clearing, scheduling,
//! and the due-item sweep) — plus the grouping engine that derives
//! read-only views from it.
//!
//! All mutations are synchronous, run to completion under a single lock,
//! and never return an error: unknown ids are no-ops by contract.

pub mod grouping;
pub mod store;

pub use grouping::{GroupingEngine, TimeBucketView};
pub use store::{NotificationStore, StoreUpdate};
