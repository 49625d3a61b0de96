//! # Strata Utilities
//!
//! Shared utilities, logging, and helpers for Strata.
//!
//! This crate provides the logging setup used by the `strata` CLI and by
//! hosts embedding the bridge, built on `tracing`.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_for_host, init_logging_with_level, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
