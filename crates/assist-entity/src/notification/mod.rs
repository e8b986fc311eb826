//! Notification entity, source kinds, and derived views.

pub mod bucket;
pub mod group;
pub mod kind;
pub mod model;
