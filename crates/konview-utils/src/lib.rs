//! # konview Utilities
//!
//! Shared logging setup for the konview workspace, built on `tracing`.
//!
//! The engine crate only emits events; installing a subscriber is left to
//! whichever binary embeds it. This crate is that subscriber setup.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};
