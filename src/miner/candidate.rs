// src/miner/candidate.rs
//! Per-attempt candidate buffer
//!
//! Layout of the 64 bytes fed to the hash primitive:
//!
//! ```text
//! [0..32)   job prefix
//! [32]      difficulty byte
//! [33..41)  attempt counter, little-endian u64
//! [41..64)  random tail decoration
//! ```
//!
//! The counter bytes are part of the random fill, so every session starts
//! counting from a different point.

use crate::miner::job::Job;
use crate::types::{PREFIX_LEN, SOLUTION_LEN, Solution};
use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};
use std::ops::Range;

/// Size of the candidate buffer handed to the hash primitive
pub const CANDIDATE_LEN: usize = 64;

const DIFFICULTY_INDEX: usize = PREFIX_LEN;
const TAIL_START: usize = DIFFICULTY_INDEX + 1;
const COUNTER: Range<usize> = TAIL_START..TAIL_START + 8;

/// Fills the mutable tail of a fresh candidate
///
/// The fill only decorates the search space so workers and sessions do not
/// walk the same counters. It carries no security weight.
pub trait TailFiller: Send + Sync {
    /// Overwrites `tail` (candidate bytes 33..64)
    fn fill(&self, tail: &mut [u8]);
}

/// Default tail filler: a 4-byte OS seed expanded by a fast PRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTail;

impl TailFiller for RandomTail {
    fn fill(&self, tail: &mut [u8]) {
        let seed = OsRng.next_u32();
        let mut rng = SmallRng::seed_from_u64(u64::from(seed));
        rng.fill_bytes(tail);
    }
}

/// 64-byte working buffer owned by one worker for one job
#[derive(Clone)]
pub struct CandidateBuffer {
    bytes: [u8; CANDIDATE_LEN],
}

impl CandidateBuffer {
    /// Builds the buffer for `job`, filling the tail through `tail`
    pub fn new(job: &Job, tail: &dyn TailFiller) -> Self {
        let mut bytes = [0u8; CANDIDATE_LEN];
        bytes[..PREFIX_LEN].copy_from_slice(job.prefix());
        bytes[DIFFICULTY_INDEX] = job.difficulty().as_byte();
        tail.fill(&mut bytes[TAIL_START..]);

        CandidateBuffer { bytes }
    }

    /// Current value of the embedded attempt counter
    pub fn counter(&self) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[COUNTER]);
        u64::from_le_bytes(raw)
    }

    /// Moves to the next attempt
    #[inline]
    pub fn advance(&mut self) {
        let next = self.counter().wrapping_add(1);
        self.bytes[COUNTER].copy_from_slice(&next.to_le_bytes());
    }

    /// Full buffer as passed to the hash primitive
    pub fn as_bytes(&self) -> &[u8; CANDIDATE_LEN] {
        &self.bytes
    }

    /// Bytes 32..64 captured as a solution
    pub fn solution(&self) -> Solution {
        let mut out = [0u8; SOLUTION_LEN];
        out.copy_from_slice(&self.bytes[DIFFICULTY_INDEX..]);
        Solution::new(out)
    }
}

/// Reads the counter out of raw candidate bytes
///
/// Useful to hash primitives and test doubles that only see the buffer.
pub fn counter_of(candidate: &[u8]) -> Option<u64> {
    let raw: [u8; 8] = candidate.get(COUNTER)?.try_into().ok()?;
    Some(u64::from_le_bytes(raw))
}
