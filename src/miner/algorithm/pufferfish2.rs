// src/miner/algorithm/pufferfish2.rs
//! pufferfish2 hash primitive
//!
//! Thin safe wrapper over `pf_newhash` from the reference C library.
//! Link with `PUFFERFISH2_LIB_DIR` pointing at the directory holding
//! `libpufferfish2`.

#![allow(unsafe_code)]

use crate::miner::algorithm::{HashPrimitive, PRIMITIVE_OUTPUT_LEN};
use crate::miner::candidate::CANDIDATE_LEN;
use crate::utils::error::MinerError;
use libc::{c_int, c_uchar};

#[link(name = "pufferfish2")]
unsafe extern "C" {
    fn pf_newhash(
        pass: *const c_uchar,
        pass_sz: c_int,
        cost_t: c_int,
        cost_m: c_int,
        hash: *mut c_uchar,
    ) -> c_int;
}

/// Native pufferfish2 primitive
///
/// Stateless: the C side allocates its working memory per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pufferfish2;

impl HashPrimitive for Pufferfish2 {
    fn hash(
        &self,
        input: &[u8; CANDIDATE_LEN],
        cost_t: u32,
        cost_m: u32,
        output: &mut [u8; PRIMITIVE_OUTPUT_LEN],
    ) -> Result<(), MinerError> {
        let cost_t = c_int::try_from(cost_t)
            .map_err(|_| MinerError::AlgorithmError(format!("cost_t {} out of range", cost_t)))?;
        let cost_m = c_int::try_from(cost_m)
            .map_err(|_| MinerError::AlgorithmError(format!("cost_m {} out of range", cost_m)))?;

        // SAFETY: `input` is valid for CANDIDATE_LEN reads and `output` for
        // PRIMITIVE_OUTPUT_LEN writes, which is the full hash space the
        // library writes for this input size. Neither pointer is retained.
        let status = unsafe {
            pf_newhash(
                input.as_ptr(),
                CANDIDATE_LEN as c_int,
                cost_t,
                cost_m,
                output.as_mut_ptr(),
            )
        };

        if status == 0 {
            Ok(())
        } else {
            Err(MinerError::PrimitiveFailure { status })
        }
    }

    fn name(&self) -> &str {
        "pufferfish2"
    }
}
