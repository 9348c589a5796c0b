//! Configuration management for the miner
//!
//! Handles loading the engine settings from TOML or JSON files and
//! generating a commented template. Settings live in a `pufferfish2bmb`
//! section so they can share a file with other algorithms' settings.

/// Core configuration implementation
///
/// Contains the [`Config`] struct and thread count resolution.
pub mod config;

// Re-export key items for easy access
pub use config::{Config, resolve_thread_count};

use crate::utils::error::MinerError;
use std::path::PathBuf;

/// Loads miner configuration from a TOML or JSON file
pub fn load(path: impl Into<PathBuf>) -> Result<Config, MinerError> {
    Config::load(path)
}

/// Generates a commented TOML configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
