//! # Observability
//!
//! Structured logging for the auth boundary.

pub mod logger;

pub use logger::{Logger, Severity};
