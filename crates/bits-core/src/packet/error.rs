use thiserror::Error;

use crate::stream::StreamError;

/// Errors returned by packet decoding.
///
/// In the lenient policy only [`DecodeError::RecursionLimitExceeded`] can
/// surface; the other variants are produced by the strict policy.
///
/// # Examples
/// ```
/// use bits_core::DecodeError;
///
/// let err = DecodeError::RecursionLimitExceeded { limit: 4, offset: 72 };
/// assert!(err.to_string().contains("nesting deeper than 4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("operator at bit {offset} announced {expected} sub-packets, found {found}")]
    TruncatedOperator {
        offset: usize,
        expected: usize,
        found: usize,
    },
    #[error("packet at bit {offset} is nesting deeper than {limit}")]
    RecursionLimitExceeded { limit: usize, offset: usize },
}
