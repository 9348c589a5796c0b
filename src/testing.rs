// src/testing.rs
//! Deterministic doubles for the hash primitive, finalizer and tail filler

use crate::miner::algorithm::{DigestFinalizer, HashPrimitive, PRIMITIVE_OUTPUT_LEN};
use crate::miner::candidate::{CANDIDATE_LEN, TailFiller, counter_of};
use crate::types::Digest;
use crate::utils::error::MinerError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};

/// Zero tail: counters start at 0 so attempt `n` hashes counter `n`
pub struct ZeroTail;

impl TailFiller for ZeroTail {
    fn fill(&self, tail: &mut [u8]) {
        tail.fill(0);
    }
}

/// Copies the candidate into the front of the output
pub struct CopyPrimitive;

impl HashPrimitive for CopyPrimitive {
    fn hash(
        &self,
        input: &[u8; CANDIDATE_LEN],
        _cost_t: u32,
        _cost_m: u32,
        output: &mut [u8; PRIMITIVE_OUTPUT_LEN],
    ) -> Result<(), MinerError> {
        output.fill(0);
        output[..CANDIDATE_LEN].copy_from_slice(input);
        Ok(())
    }

    fn name(&self) -> &str {
        "copy"
    }
}

/// Like [`CopyPrimitive`] but fails with status 1 on odd counters
pub struct FailingPrimitive;

impl FailingPrimitive {
    pub fn odd_counters() -> Self {
        FailingPrimitive
    }
}

impl HashPrimitive for FailingPrimitive {
    fn hash(
        &self,
        input: &[u8; CANDIDATE_LEN],
        cost_t: u32,
        cost_m: u32,
        output: &mut [u8; PRIMITIVE_OUTPUT_LEN],
    ) -> Result<(), MinerError> {
        if counter_of(input).is_some_and(|c| c % 2 == 1) {
            return Err(MinerError::PrimitiveFailure { status: 1 });
        }
        CopyPrimitive.hash(input, cost_t, cost_m, output)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Records which thread hashed which prefix, in order
#[derive(Default)]
pub struct RecordingPrimitive {
    pub seen: Mutex<Vec<(ThreadId, u8)>>,
}

impl HashPrimitive for RecordingPrimitive {
    fn hash(
        &self,
        input: &[u8; CANDIDATE_LEN],
        cost_t: u32,
        cost_m: u32,
        output: &mut [u8; PRIMITIVE_OUTPUT_LEN],
    ) -> Result<(), MinerError> {
        self.seen.lock().push((thread::current().id(), input[0]));
        CopyPrimitive.hash(input, cost_t, cost_m, output)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Panics on its first call, then behaves like [`CopyPrimitive`]
#[derive(Default)]
pub struct PanicOncePrimitive {
    fired: AtomicBool,
}

impl HashPrimitive for PanicOncePrimitive {
    fn hash(
        &self,
        input: &[u8; CANDIDATE_LEN],
        cost_t: u32,
        cost_m: u32,
        output: &mut [u8; PRIMITIVE_OUTPUT_LEN],
    ) -> Result<(), MinerError> {
        if !self.fired.swap(true, Ordering::SeqCst) {
            panic!("primitive blew up");
        }
        CopyPrimitive.hash(input, cost_t, cost_m, output)
    }

    fn name(&self) -> &str {
        "panic-once"
    }
}

/// Returns the same digest for every output
pub struct FixedDigest(pub Digest);

impl DigestFinalizer for FixedDigest {
    fn finalize(&self, _output: &[u8; PRIMITIVE_OUTPUT_LEN]) -> Digest {
        self.0
    }
}

/// Zero first byte exactly when the copied counter equals `target`
///
/// Meant to sit behind [`CopyPrimitive`].
pub struct CounterDigest {
    pub target: u64,
}

impl DigestFinalizer for CounterDigest {
    fn finalize(&self, output: &[u8; PRIMITIVE_OUTPUT_LEN]) -> Digest {
        let mut digest = [0xffu8; 32];
        if counter_of(&output[..CANDIDATE_LEN]) == Some(self.target) {
            digest[0] = 0x00;
        }
        digest
    }
}
