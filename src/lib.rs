//! pufferfish2 miner - concurrent proof-of-work search engine
//!
//! This crate searches the nonce space of pufferfish2 jobs on the CPU:
//! - A fixed pool of worker threads, one FIFO job queue each
//! - Job broadcast with cancellation of superseded jobs
//! - Two-stage hashing (memory-hard primitive, then SHA-256)
//! - A process-wide pause gate and per-worker hashrate telemetry
//!
//! Job acquisition and solution submission are left to the caller: jobs go
//! in through [`WorkerPool::dispatch`], solutions come out of
//! [`WorkerPool::solutions`].

#![warn(missing_docs)]
#![cfg_attr(not(feature = "pufferfish2"), forbid(unsafe_code))]
#![cfg_attr(feature = "pufferfish2", deny(unsafe_code))]

/// Search engine core: pool, workers, hashing and difficulty
pub mod miner;

/// Hashrate telemetry and reporting
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

#[cfg(test)]
mod testing;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{
    CancellationToken, Difficulty, HashPrimitive, Job, JobDispatcher, PauseGate, WorkerPool,
};
pub use stats::{HashRateTelemetry, MiningStats, StatsReporter};
pub use types::Solution;
pub use utils::{MinerError, init_logging};
