use thiserror::Error;

use crate::anim::AnimState;

/// Contract-violation errors. All are synchronous and signalled at the call
/// that breaks the contract; none are retried, and a failing call leaves
/// state unmodified.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("bucket index {index} out of range for table of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("bucket {index} is empty, nothing to pop")]
    EmptyBucket { index: usize },
    #[error("cannot {requested} while in state {from:?}")]
    InvalidTransition { from: AnimState, requested: &'static str },
}
