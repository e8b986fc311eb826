//! # assist-delivery
//!
//! The delivery gate decides, per newly active notification, whether to
//! play the alert tone and/or raise a desktop alert, consulting the
//! current settings snapshot. The side effects themselves live behind
//! traits so tests can record invocations instead of making noise.

pub mod desktop;
pub mod gate;
pub mod sound;

pub use desktop::{CommandNotifier, DesktopNotifier, Permission};
pub use gate::DeliveryGate;
pub use sound::{AlertSound, TonePlayer};
