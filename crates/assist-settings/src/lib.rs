//! # assist-settings
//!
//! Durable user-settings store: loads the JSON blob over built-in defaults
//! at startup, persists on every change, and propagates changes to
//! subscribers through a watch channel so no component reads ambient
//! global state.

pub mod store;

pub use store::SettingsStore;
