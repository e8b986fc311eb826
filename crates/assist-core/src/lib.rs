//! # assist-core
//!
//! Core crate for the Assist notification engine. Contains configuration
//! schemas, typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Assist crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
