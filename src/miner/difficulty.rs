// src/miner/difficulty.rs
//! Leading-zero-bits difficulty evaluation
//!
//! A digest satisfies difficulty `d` when its first `d` bits, read
//! most-significant-bit first, are all zero.

use crate::utils::error::MinerError;
use std::fmt;

/// Returns `true` when the leading `difficulty` bits of `digest` are zero
///
/// Difficulty 0 accepts every digest. Targets longer than the digest can
/// never be met and return `false`.
#[inline]
pub fn satisfies(digest: &[u8], difficulty: u32) -> bool {
    let full_zero_bytes = (difficulty / 8) as usize;
    let remainder_bits = difficulty % 8;

    if full_zero_bytes > digest.len() || (remainder_bits > 0 && full_zero_bytes >= digest.len()) {
        return false;
    }

    if digest[..full_zero_bytes].iter().any(|&b| b != 0) {
        return false;
    }

    remainder_bits == 0 || digest[full_zero_bytes] >> (8 - remainder_bits) == 0
}

/// Validated difficulty target in leading zero bits
///
/// The candidate buffer carries the difficulty in a single byte, so the
/// representable range is `0..=255`. Anything larger is rejected up front
/// instead of being searched forever.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    /// Largest difficulty the single-byte encoding can carry
    pub const MAX: Difficulty = Difficulty(u8::MAX);

    /// Validates a bit-length target
    ///
    /// # Errors
    /// `MinerError::InvalidDifficulty` when `bits >= 256`
    pub fn new(bits: u32) -> Result<Self, MinerError> {
        u8::try_from(bits)
            .map(Difficulty)
            .map_err(|_| MinerError::InvalidDifficulty(bits))
    }

    /// Number of leading zero bits required
    pub fn bits(self) -> u32 {
        u32::from(self.0)
    }

    /// Byte written at position 32 of the candidate buffer
    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// Checks a digest against this target
    #[inline]
    pub fn is_satisfied_by(self, digest: &[u8]) -> bool {
        satisfies(digest, self.bits())
    }
}

impl TryFrom<u32> for Difficulty {
    type Error = MinerError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Difficulty::new(bits)
    }
}

impl From<Difficulty> for u32 {
    fn from(d: Difficulty) -> u32 {
        d.bits()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    /// Reference check: count leading zero bits the slow way
    fn leading_zero_bits(digest: &[u8]) -> u32 {
        let mut bits = 0;
        for byte in digest {
            if *byte == 0 {
                bits += 8;
            } else {
                bits += byte.leading_zeros();
                break;
            }
        }
        bits
    }

    #[test]
    fn zero_difficulty_accepts_everything() {
        assert!(satisfies(&[0xff; 32], 0));
        assert!(satisfies(&[0x00; 32], 0));
        assert!(satisfies(&[], 0));
    }

    #[test]
    fn one_bit_checks_top_bit_only() {
        assert!(satisfies(&hex!("7f"), 1));
        assert!(!satisfies(&hex!("80"), 1));
    }

    #[test]
    fn seven_bits_leave_lowest_bit_free() {
        assert!(satisfies(&hex!("01ff"), 7));
        assert!(!satisfies(&hex!("02ff"), 7));
    }

    #[test]
    fn eight_bits_require_a_whole_zero_byte() {
        assert!(satisfies(&hex!("00ff"), 8));
        assert!(!satisfies(&hex!("01ff"), 8));
    }

    #[test]
    fn nine_bits_spill_into_second_byte() {
        assert!(satisfies(&hex!("007f"), 9));
        assert!(!satisfies(&hex!("0080"), 9));
        assert!(!satisfies(&hex!("017f"), 9));
    }

    #[test]
    fn two_hundred_fifty_five_bits() {
        let mut digest = [0u8; 32];
        digest[31] = 0x01;
        assert!(satisfies(&digest, 255));
        digest[31] = 0x02;
        assert!(!satisfies(&digest, 255));
    }

    #[test]
    fn agrees_with_leading_zero_count() {
        let samples: [[u8; 4]; 6] = [
            hex!("00000000"),
            hex!("00000001"),
            hex!("000fffff"),
            hex!("10000000"),
            hex!("00800000"),
            hex!("ffffffff"),
        ];

        for digest in samples {
            let zeros = leading_zero_bits(&digest);
            for difficulty in 0..32 {
                assert_eq!(
                    satisfies(&digest, difficulty),
                    difficulty <= zeros,
                    "digest {:02x?} difficulty {}",
                    digest,
                    difficulty
                );
            }
        }
    }

    #[test]
    fn target_longer_than_digest_never_succeeds() {
        assert!(!satisfies(&[0u8; 4], 33));
        assert!(!satisfies(&[0u8; 32], 257));
    }

    #[test]
    fn difficulty_rejects_256_and_above() {
        assert!(matches!(
            Difficulty::new(256),
            Err(MinerError::InvalidDifficulty(256))
        ));
        assert!(Difficulty::new(1_000).is_err());
        assert_eq!(Difficulty::new(255).unwrap(), Difficulty::MAX);
        assert_eq!(Difficulty::new(24).unwrap().as_byte(), 24);
    }
}
