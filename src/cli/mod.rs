//! Command-line interface definitions

/// Argument parsing structures for every subcommand
pub mod commands;

pub use commands::{Action, BenchmarkOptions, Commands, ConfigOptions, StartOptions};
