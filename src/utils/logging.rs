//! Logging configuration and utilities
//!
//! This module handles logging setup for the miner binary:
//! - Standard logging configuration
//! - Benchmark-specific logging
//! - Custom log formatting
//!
//! Uses `env_logger` under the hood with custom formatting and filtering.
//! The library itself only talks to the `log` facade.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes the logging subsystem
///
/// # Configuration
/// - Logs to stdout
/// - Default log level: Info
/// - Respects `RUST_LOG` if set
pub fn init_logging() {
    init_with_default(LevelFilter::Info);
}

/// Configures benchmark-specific logging
///
/// Same format as [`init_logging`] but defaults to Debug so per-worker
/// hashrates show up without setting `RUST_LOG`.
pub fn init_bench_logging() {
    init_with_default(LevelFilter::Debug);
}

fn init_with_default(level: LevelFilter) {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(level);
    } else {
        builder.parse_env("RUST_LOG");
    }

    // A logger may already be installed when embedded in a larger process
    if let Err(e) = builder.try_init() {
        log::debug!("Keeping existing logger: {}", e);
    }
}

/// Creates a base logger builder with the shared line format:
/// `[timestamp level module:line] message`
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_seconds();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        })
        .target(Target::Stdout);

    builder
}
