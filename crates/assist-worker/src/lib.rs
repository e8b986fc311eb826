//! # assist-worker
//!
//! The periodic sweep: a cron-scheduled task that promotes due scheduled
//! notifications to active and routes each newly-active unread one through
//! the delivery gate exactly once.

pub mod scheduler;

pub use scheduler::SweepScheduler;
