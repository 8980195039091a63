use thiserror::Error;

/// Errors returned by hex expansion and bit reads.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use bits_core::stream::error::StreamError;
///
/// let err = StreamError::Underflow { needed: 15, available: 3, offset: 7 };
/// assert!(err.to_string().contains("stream underflow"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("stream underflow at bit {offset}: need {needed} bits, got {available}")]
    Underflow {
        needed: usize,
        available: usize,
        offset: usize,
    },
    #[error("malformed hex digit {digit:?} at index {index}")]
    MalformedHexDigit { index: usize, digit: char },
}
