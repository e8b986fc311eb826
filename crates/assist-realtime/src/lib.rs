//! # assist-realtime
//!
//! The push event stream: a persistent WebSocket client with a flat
//! reconnect policy, the frame codec, and the dispatcher that routes each
//! received notification through the store and the delivery gate.

pub mod client;
pub mod dispatcher;
pub mod frame;

pub use client::EventSource;
pub use dispatcher::NotificationDispatcher;
pub use frame::{OutboundFrame, PushFrame};
