//! Statistics collection and reporting module
//!
//! - [`HashRateTelemetry`] holds the per-worker attempt counters written by
//!   the search workers and the engine's event counters
//! - [`StatsReporter`] turns those counters into hashrates, adds hardware
//!   readings and logs them periodically
//!

/// Per-worker counters written by the search loop
pub mod telemetry;

/// Periodic hashrate and hardware reporting
pub mod reporter;

// Re-export main components
pub use reporter::{HardwareStats, MiningStats, StatsReporter};
pub use telemetry::HashRateTelemetry;
