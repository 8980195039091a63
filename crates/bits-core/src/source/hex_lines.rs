use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{SourceError, Transmission, TransmissionSource};

/// Reads one transmission per line. Blank lines and lines starting with `#`
/// are skipped; surrounding whitespace is trimmed.
pub struct HexLineSource<R> {
    reader: R,
    line: usize,
    bytes_read: u64,
    buf: String,
}

pub type HexFileSource = HexLineSource<BufReader<File>>;

impl HexFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> HexLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            bytes_read: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> TransmissionSource for HexLineSource<R> {
    fn next_transmission(&mut self) -> Result<Option<Transmission>, SourceError> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf)?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;
            self.bytes_read += read as u64;

            let hex = self.buf.trim();
            if hex.is_empty() || hex.starts_with('#') {
                continue;
            }
            return Ok(Some(Transmission {
                line: self.line,
                hex: hex.to_string(),
            }));
        }
    }

    fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::HexLineSource;
    use crate::source::TransmissionSource;

    #[test]
    fn skips_blank_and_comment_lines() {
        let input = "# sample\n\nD2FE28\n  38006f45291200  \r\n";
        let mut source = HexLineSource::new(Cursor::new(input));

        let first = source.next_transmission().unwrap().unwrap();
        assert_eq!(first.line, 3);
        assert_eq!(first.hex, "D2FE28");

        let second = source.next_transmission().unwrap().unwrap();
        assert_eq!(second.line, 4);
        assert_eq!(second.hex, "38006f45291200");

        assert!(source.next_transmission().unwrap().is_none());
        assert_eq!(source.bytes_read(), input.len() as u64);
    }

    #[test]
    fn last_line_without_newline() {
        let mut source = HexLineSource::new(Cursor::new("D2FE28"));
        let only = source.next_transmission().unwrap().unwrap();
        assert_eq!(only.hex, "D2FE28");
        assert!(source.next_transmission().unwrap().is_none());
    }
}
