// src/miner/mod.rs
//! Core search engine
//!
//! This module contains every component of the proof-of-work search:
//! - Hash primitive boundary and digest finalization
//! - Candidate construction and difficulty evaluation
//! - The worker pool, job dispatch and the per-worker search loop
//! - The process-wide pause gate

/// Hash primitive trait, SHA-256 finalizer and the native binding
pub mod algorithm;

/// 64-byte candidate buffer and tail filling
pub mod candidate;

/// Leading-zero-bits difficulty evaluation
pub mod difficulty;

/// Jobs and cancellation tokens
pub mod job;

/// Cooperative pause/resume signal
pub mod pause;

/// Worker pool, job dispatcher and dead worker supervision
///
/// Broadcasts each job to every worker and collects solutions on one
/// bounded channel.
pub mod scheduler;

/// Search worker thread and its attempt loop
pub mod worker;

// Re-export main components for cleaner imports
pub use self::algorithm::{DigestFinalizer, HashPrimitive, Sha256Finalizer};
pub use self::candidate::{CandidateBuffer, RandomTail, TailFiller};
pub use self::difficulty::{Difficulty, satisfies};
pub use self::job::{CancellationToken, Job};
pub use self::pause::PauseGate;
pub use self::scheduler::{JobDispatcher, PoolOptions, WorkerPool, WorkerPoolBuilder};
pub use self::worker::BATCH_SIZE;
