//! Unified application error types for the Assist notification engine.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Note that notification-store
//! mutations are error-free by contract; `AppError` covers the startup and
//! I/O boundaries only (configuration, settings persistence, scheduler
//! registration, transport setup).

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A configuration error occurred.
    Configuration,
    /// Settings blob could not be read or written.
    Settings,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The event-stream transport failed during setup.
    Transport,
    /// The periodic scheduler could not be created or registered.
    Scheduler,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Settings => write!(f, "SETTINGS"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::Scheduler => write!(f, "SCHEDULER"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout the engine.
///
/// All crate-specific errors are mapped into `AppError` using explicit
/// `.map_err()` calls. This provides a single error type for the entire
/// application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a settings I/O error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Settings, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a scheduler error.
    pub fn scheduler(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Scheduler, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = AppError::configuration("missing endpoint");
        assert_eq!(err.to_string(), "CONFIGURATION: missing endpoint");
    }

    #[test]
    fn with_source_preserves_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::with_source(ErrorKind::Settings, "read failed", io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
