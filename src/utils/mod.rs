//! Utilities module for common functionality
//!
//! Error handling and logging infrastructure shared by the engine and the
//! command-line front end.

/// Error types and handling utilities
///
/// Contains the [`MinerError`] enum which defines all error conditions
/// surfaced by the engine, along with conversion implementations.
pub mod error;

/// Logging configuration for the binary
pub mod logging;

// Re-export for easier access
pub use error::MinerError;
pub use logging::{init_bench_logging, init_logging};
