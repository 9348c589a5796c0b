// src/utils/error.rs
use crate::miner::job::Job;
use serde_json;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Main error type for the search engine
///
/// Cancellation of a superseded job and a full solution sink are not
/// represented here: the first is ordinary control flow, the second is
/// counted in telemetry and never surfaces as an error.
#[derive(Error, Debug)]
pub enum MinerError {
    /// The hash primitive is unavailable or misconfigured in this build
    #[error("Algorithm error: {0}")]
    AlgorithmError(String),

    /// The hash primitive returned a non-zero status for one attempt
    #[error("Hash primitive failed with status {status}")]
    PrimitiveFailure {
        /// Raw status code reported by the primitive
        status: i32,
    },

    /// Difficulty outside of what the single-byte encoding can carry
    #[error("Invalid difficulty {0}: must be below 256 bits")]
    InvalidDifficulty(u32),

    /// Worker threads could not be started
    #[error("Worker pool startup failed: {0}")]
    StartupError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Thread communication channel errors
    #[error("Thread communication error: {0}")]
    ChannelError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),
}

/// Converts crossbeam channel send errors for jobs into MinerError
///
/// Raised when a worker queue has lost its receiving end.
impl From<crossbeam_channel::SendError<Arc<Job>>> for MinerError {
    fn from(e: crossbeam_channel::SendError<Arc<Job>>) -> Self {
        MinerError::ChannelError(format!("Job send failed: {}", e))
    }
}

/// Converts hex decoding errors into MinerError
///
/// Used when a job prefix given on the command line is not valid hex.
impl From<hex::FromHexError> for MinerError {
    fn from(e: hex::FromHexError) -> Self {
        MinerError::InputError(format!("Hex conversion failed: {}", e))
    }
}
