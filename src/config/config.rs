// src/config/config.rs
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration section holding the engine settings
pub const SECTION: &str = "pufferfish2bmb";

/// Search engine configuration
///
/// Every field has a default, so an empty section (or no file at all)
/// yields a working setup that uses every logical core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of worker threads; zero or negative means one per logical core
    pub threads: i64,

    /// Capacity of the solution channel before solutions are dropped
    pub solution_capacity: usize,

    /// Workers with an index below this sleep briefly every attempt batch
    pub courtesy_workers: usize,

    /// Length of that courtesy sleep, in milliseconds
    pub courtesy_sleep_ms: u64,

    /// Interval between hashrate reports, in seconds
    pub report_interval_secs: u64,

    /// Interval between worker liveness checks, in milliseconds
    pub supervise_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            threads: 0,
            solution_capacity: 256,
            courtesy_workers: 2,
            courtesy_sleep_ms: 1,
            report_interval_secs: 60,
            supervise_interval_ms: 1000,
        }
    }
}

/// On-disk layout: engine settings live under their own section
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, rename = "pufferfish2bmb")]
    engine: Config,
}

/// Resolves a configured thread count against the available cores
///
/// A zero or negative count is not an error: it selects every core.
pub fn resolve_thread_count(configured: i64, available: usize) -> usize {
    if configured <= 0 {
        log::debug!(
            "threads = {}, defaulting to {} logical cores",
            configured,
            available
        );
        available.max(1)
    } else {
        usize::try_from(configured).unwrap_or(available.max(1))
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as TOML.
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(MinerError)` - If the file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = if is_json(&path) {
            Self::from_json(&config_str)?
        } else {
            Self::from_toml(&config_str)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text containing a `[pufferfish2bmb]` section
    pub fn from_toml(text: &str) -> Result<Self, MinerError> {
        toml::from_str::<ConfigFile>(text)
            .map(|file| file.engine)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))
    }

    /// Parses JSON text containing a `"pufferfish2bmb"` object
    pub fn from_json(text: &str) -> Result<Self, MinerError> {
        Ok(serde_json::from_str::<ConfigFile>(text)?.engine)
    }

    /// Rejects values the engine cannot run with
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.solution_capacity == 0 {
            return Err(MinerError::ConfigError(
                "solution_capacity must be at least 1".into(),
            ));
        }
        if self.report_interval_secs == 0 {
            return Err(MinerError::ConfigError(
                "report_interval_secs must be at least 1".into(),
            ));
        }
        if self.supervise_interval_ms == 0 {
            return Err(MinerError::ConfigError(
                "supervise_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Number of workers to spawn on this machine
    pub fn worker_count(&self) -> usize {
        resolve_thread_count(self.threads, num_cpus::get())
    }

    /// Courtesy sleep as a duration
    pub fn courtesy_sleep(&self) -> Duration {
        Duration::from_millis(self.courtesy_sleep_ms)
    }

    /// Report interval as a duration
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    /// Supervisor interval as a duration
    pub fn supervise_interval(&self) -> Duration {
        Duration::from_millis(self.supervise_interval_ms)
    }

    /// Generates a commented TOML configuration template
    pub fn generate_template() -> String {
        let defaults = Config::default();
        let mut template = String::new();
        template.push_str("# pufferfish2 miner configuration\n\n");
        template.push_str(&format!("[{}]\n", SECTION));
        template.push_str("# Number of worker threads (0 or negative = one per logical core)\n");
        template.push_str(&format!("threads = {}\n", defaults.threads));
        template.push_str("# Solutions buffered before new ones are dropped\n");
        template.push_str(&format!(
            "solution_capacity = {}\n",
            defaults.solution_capacity
        ));
        template.push_str("# Low-index workers that yield the CPU briefly every batch\n");
        template.push_str(&format!(
            "courtesy_workers = {}\n",
            defaults.courtesy_workers
        ));
        template.push_str(&format!(
            "courtesy_sleep_ms = {}\n",
            defaults.courtesy_sleep_ms
        ));
        template.push_str("# Hashrate report interval\n");
        template.push_str(&format!(
            "report_interval_secs = {}\n",
            defaults.report_interval_secs
        ));
        template.push_str("# Dead worker detection interval\n");
        template.push_str(&format!(
            "supervise_interval_ms = {}\n",
            defaults.supervise_interval_ms
        ));
        template
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
