mod hex_lines;

pub use hex_lines::{HexFileSource, HexLineSource};

use thiserror::Error;

/// One hex transmission and the input line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    /// 1-based line number in the input.
    pub line: usize,
    /// Trimmed hex text.
    pub hex: String,
}

pub trait TransmissionSource {
    fn next_transmission(&mut self) -> Result<Option<Transmission>, SourceError>;

    /// Bytes consumed from the underlying input so far.
    fn bytes_read(&self) -> u64;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
