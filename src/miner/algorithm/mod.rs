// src/miner/algorithm/mod.rs
//! Hash primitive boundary and digest finalization
//!
//! Every attempt is hashed in two stages: the memory-hard primitive turns
//! the 64-byte candidate into a 119-byte output, then a standard digest
//! reduces that output to the 32 bytes compared against the difficulty.

/// Native pufferfish2 binding
///
/// Links against `libpufferfish2` and is only compiled with the
/// `pufferfish2` cargo feature.
#[cfg(feature = "pufferfish2")]
pub mod pufferfish2;

use crate::miner::candidate::CANDIDATE_LEN;
use crate::types::Digest;
use crate::utils::error::MinerError;
use sha2::{Digest as _, Sha256};
use std::sync::Arc;

/// Size of the buffer the primitive writes on every call
pub const PRIMITIVE_OUTPUT_LEN: usize = 119;

/// Time cost passed to the primitive, fixed for this build
pub const COST_T: u32 = 0;

/// Memory cost passed to the primitive, fixed for this build
pub const COST_M: u32 = 8;

/// Memory-hard hash primitive consumed as an opaque function
///
/// Implementations must be deterministic, keep no state between calls and
/// always fill the whole output on success.
pub trait HashPrimitive: Send + Sync {
    /// Hashes one candidate
    ///
    /// # Errors
    /// `MinerError::PrimitiveFailure` carrying the primitive's non-zero
    /// status. The search loop treats it as a skipped attempt.
    fn hash(
        &self,
        input: &[u8; CANDIDATE_LEN],
        cost_t: u32,
        cost_m: u32,
        output: &mut [u8; PRIMITIVE_OUTPUT_LEN],
    ) -> Result<(), MinerError>;

    /// Human readable name for logs
    fn name(&self) -> &str;
}

/// Second hashing stage applied to the primitive output
pub trait DigestFinalizer: Send + Sync {
    /// Reduces the primitive output to the value checked against difficulty
    fn finalize(&self, output: &[u8; PRIMITIVE_OUTPUT_LEN]) -> Digest;
}

/// SHA-256 finalizer
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Finalizer;

impl DigestFinalizer for Sha256Finalizer {
    #[inline]
    fn finalize(&self, output: &[u8; PRIMITIVE_OUTPUT_LEN]) -> Digest {
        Sha256::digest(output).into()
    }
}

/// Creates the primitive compiled into this build
///
/// # Errors
/// `MinerError::AlgorithmError` when the crate was built without the
/// `pufferfish2` feature.
pub fn create_primitive() -> Result<Arc<dyn HashPrimitive>, MinerError> {
    #[cfg(feature = "pufferfish2")]
    {
        Ok(Arc::new(pufferfish2::Pufferfish2))
    }

    #[cfg(not(feature = "pufferfish2"))]
    {
        Err(MinerError::AlgorithmError(
            "pufferfish2 support not compiled in (rebuild with --features pufferfish2)".into(),
        ))
    }
}
