// src/miner/job.rs
//! Search jobs and their cancellation tokens

use crate::miner::difficulty::Difficulty;
use crate::types::{PREFIX_LEN, Prefix};
use crate::utils::error::MinerError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag scoped to one job's lifetime
///
/// Clones observe the same flag. Workers poll it once per hash attempt.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a live (not cancelled) token
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every holder of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been signalled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A unit of search work: a candidate prefix and a difficulty target
///
/// Jobs are immutable once dispatched and shared between workers as
/// `Arc<Job>`. A job is superseded when a newer one is dispatched, at which
/// point its token is cancelled.
#[derive(Debug)]
pub struct Job {
    prefix: Prefix,
    difficulty: Difficulty,
    cancellation: CancellationToken,
}

impl Job {
    /// Creates a job with a fresh cancellation token
    pub fn new(prefix: Prefix, difficulty: Difficulty) -> Self {
        Self::with_token(prefix, difficulty, CancellationToken::new())
    }

    /// Creates a job bound to a token the job source already holds
    pub fn with_token(prefix: Prefix, difficulty: Difficulty, cancellation: CancellationToken) -> Self {
        Job {
            prefix,
            difficulty,
            cancellation,
        }
    }

    /// Builds a job from a hex-encoded prefix and a raw difficulty
    ///
    /// # Errors
    /// - `MinerError::InputError` if the prefix is not 32 bytes of hex
    /// - `MinerError::InvalidDifficulty` if `difficulty >= 256`
    pub fn from_hex(prefix_hex: &str, difficulty: u32) -> Result<Self, MinerError> {
        let bytes = hex::decode(prefix_hex.trim())?;
        let prefix: Prefix = bytes.as_slice().try_into().map_err(|_| {
            MinerError::InputError(format!(
                "Job prefix must be {} bytes, got {}",
                PREFIX_LEN,
                bytes.len()
            ))
        })?;

        Ok(Job::new(prefix, Difficulty::new(difficulty)?))
    }

    /// The 32-byte prefix copied into every candidate
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Required leading zero bits
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// A handle to this job's cancellation flag
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Cancels this job
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Whether this job has been superseded or aborted
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_shared_between_clones() {
        let job = Job::new([7u8; 32], Difficulty::new(12).unwrap());
        let token = job.cancellation();
        assert!(!job.is_cancelled());

        token.cancel();
        assert!(job.is_cancelled());
    }

    #[test]
    fn external_token_controls_job() {
        let token = CancellationToken::new();
        let job = Job::with_token([0u8; 32], Difficulty::default(), token.clone());
        token.cancel();
        assert!(job.is_cancelled());
    }

    #[test]
    fn from_hex_parses_prefix() {
        let hex_prefix = "ab".repeat(32);
        let job = Job::from_hex(&hex_prefix, 20).unwrap();
        assert_eq!(job.prefix(), &[0xab; 32]);
        assert_eq!(job.difficulty().bits(), 20);
    }

    #[test]
    fn from_hex_rejects_wrong_length_and_bad_difficulty() {
        assert!(matches!(
            Job::from_hex("abcd", 8),
            Err(MinerError::InputError(_))
        ));
        assert!(matches!(
            Job::from_hex("zz", 8),
            Err(MinerError::InputError(_))
        ));
        assert!(matches!(
            Job::from_hex(&"00".repeat(32), 256),
            Err(MinerError::InvalidDifficulty(256))
        ));
    }
}
