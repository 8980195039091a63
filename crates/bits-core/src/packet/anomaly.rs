use serde::{Deserialize, Serialize};

/// A correction applied by the lenient decoder instead of failing.
///
/// # Examples
/// ```
/// use bits_core::Anomaly;
///
/// let anomaly = Anomaly::MalformedHexDigit { index: 3, digit: 'G' };
/// assert_eq!(anomaly.to_string(), "malformed hex digit 'G' at index 3 read as 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    MalformedHexDigit {
        index: usize,
        digit: char,
    },
    TruncatedRead {
        bit_offset: usize,
        requested: usize,
        available: usize,
    },
    TruncatedOperator {
        bit_offset: usize,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::MalformedHexDigit { index, digit } => {
                write!(f, "malformed hex digit {digit:?} at index {index} read as 0")
            }
            Anomaly::TruncatedRead {
                bit_offset,
                requested,
                available,
            } => write!(
                f,
                "read of {requested} bits at bit {bit_offset} truncated to {available}"
            ),
            Anomaly::TruncatedOperator {
                bit_offset,
                expected,
                found,
            } => write!(
                f,
                "operator at bit {bit_offset} announced {expected} sub-packets, found {found}"
            ),
        }
    }
}
