use crate::token::Token;
use sha2::{Digest, Sha256};

/// Pluggable mapping from a token into the bucket space `[0, space_size)`.
/// Both strategies are pure and deterministic for a given token; the caller
/// guarantees `space_size >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashStrategy {
    /// Sum of the token's character codes, reduced modulo the space size.
    /// Deliberately not collision-resistant: anagrams always collide, which
    /// is the pedagogical point.
    Summation,
    /// SHA-256 of the token bytes; the first 4 digest bytes interpreted as a
    /// big-endian u32, reduced modulo the space size. Collision probability
    /// approximates uniform-random assignment.
    Digest,
}

impl HashStrategy {
    #[inline]
    pub fn bucket_for(self, token: &Token, space_size: usize) -> usize {
        debug_assert!(space_size >= 1);
        match self {
            HashStrategy::Summation => {
                let sum: u64 = token.as_str().chars().map(|c| c as u64).sum();
                (sum % space_size as u64) as usize
            }
            HashStrategy::Digest => {
                let digest = Sha256::digest(token.as_bytes());
                let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
                (prefix as u64 % space_size as u64) as usize
            }
        }
    }
}
