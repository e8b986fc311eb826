//! # assist-entity
//!
//! Domain entity models for the Assist notification engine: notifications,
//! derived groupings, and the durable user settings blob.

pub mod notification;
pub mod settings;

pub use notification::kind::NotificationKind;
pub use notification::model::{Notification, NotificationDraft};
pub use settings::model::Settings;
