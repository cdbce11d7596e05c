use crate::error::SimError;
use crate::token::Token;
use std::collections::VecDeque;

/// Fixed-size table of chained buckets. Bucket `i` holds the tokens that
/// hashed to `i`, in insertion order (chain order). Chains grow only during
/// the insertion phase and shrink only during the resolution phase; the sum
/// of all chain lengths always equals the number of tokens inserted so far.
#[derive(Debug, Clone)]
pub struct BucketTable {
    buckets: Vec<VecDeque<Token>>,
}

impl BucketTable {
    /// Create a table of `size` empty buckets. `size` must be at least 1.
    pub fn new(size: usize) -> Result<Self, SimError> {
        if size < 1 {
            return Err(SimError::InvalidArgument(format!(
                "hash space size must be >= 1, got {size}"
            )));
        }
        Ok(BucketTable {
            buckets: vec![VecDeque::new(); size],
        })
    }

    /// Number of buckets (the hash space size M).
    #[inline]
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    fn check(&self, index: usize) -> Result<(), SimError> {
        if index >= self.buckets.len() {
            return Err(SimError::IndexOutOfRange {
                index,
                size: self.buckets.len(),
            });
        }
        Ok(())
    }

    /// Append `token` to bucket `index`'s chain. Returns the chain length
    /// after the insertion and whether the bucket was already occupied
    /// (the collision signal).
    pub fn insert(&mut self, index: usize, token: Token) -> Result<(usize, bool), SimError> {
        self.check(index)?;
        let chain = &mut self.buckets[index];
        let was_occupied = !chain.is_empty();
        chain.push_back(token);
        Ok((chain.len(), was_occupied))
    }

    /// Remove and return the oldest token in bucket `index`'s chain.
    pub fn pop_front(&mut self, index: usize) -> Result<Token, SimError> {
        self.check(index)?;
        self.buckets[index]
            .pop_front()
            .ok_or(SimError::EmptyBucket { index })
    }

    pub fn length(&self, index: usize) -> Result<usize, SimError> {
        self.check(index)?;
        Ok(self.buckets[index].len())
    }

    pub fn is_empty(&self, index: usize) -> Result<bool, SimError> {
        self.check(index)?;
        Ok(self.buckets[index].is_empty())
    }

    /// Copy of bucket `index`'s chain in chain order, for rendering.
    pub fn snapshot_contents(&self, index: usize) -> Result<Vec<Token>, SimError> {
        self.check(index)?;
        Ok(self.buckets[index].iter().cloned().collect())
    }

    /// Indices of all non-empty buckets, ascending.
    pub fn occupied_buckets(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Total tokens held across all chains.
    pub fn total_items(&self) -> usize {
        self.buckets.iter().map(VecDeque::len).sum()
    }

    /// Iterate `(index, chain)` over every bucket.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &VecDeque<Token>)> {
        self.buckets.iter().enumerate()
    }
}
