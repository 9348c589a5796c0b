// src/types.rs
use std::fmt;

/// Length of the job prefix copied into every candidate
pub const PREFIX_LEN: usize = 32;

/// Length of a finalized digest
pub const DIGEST_LEN: usize = 32;

/// Length of a solution (candidate bytes 32..64)
pub const SOLUTION_LEN: usize = 32;

/// Opaque 32-byte job prefix
pub type Prefix = [u8; PREFIX_LEN];

/// Finalized digest evaluated against the difficulty target
pub type Digest = [u8; DIGEST_LEN];

/// A candidate tail that produced a digest meeting the job's difficulty
///
/// Holds the difficulty byte followed by the 31-byte search tail, exactly as
/// they sat in the candidate buffer when the winning attempt was hashed.
/// Several workers can find the same value; deduplication is left to the
/// submitter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution([u8; SOLUTION_LEN]);

impl Solution {
    /// Wraps raw solution bytes
    pub fn new(bytes: [u8; SOLUTION_LEN]) -> Self {
        Solution(bytes)
    }

    /// Raw solution bytes
    pub fn as_bytes(&self) -> &[u8; SOLUTION_LEN] {
        &self.0
    }

    /// Difficulty byte the solution was searched under
    pub fn difficulty(&self) -> u8 {
        self.0[0]
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_displays_as_lowercase_hex() {
        let mut bytes = [0u8; SOLUTION_LEN];
        bytes[0] = 0x18;
        bytes[31] = 0xab;
        let solution = Solution::new(bytes);

        let text = solution.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.starts_with("18"));
        assert!(text.ends_with("ab"));
        assert_eq!(solution.difficulty(), 0x18);
    }
}
