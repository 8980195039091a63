use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bits_core::{HexFileSource, SourceError, TransmissionSource};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

#[test]
fn hex_source_reads_transmissions_from_fixture() {
    let path = repo_root()
        .join("tests")
        .join("golden")
        .join("batch")
        .join("input.hex");
    let mut source = HexFileSource::open(&path).unwrap();

    let mut lines = Vec::new();
    while let Some(transmission) = source.next_transmission().unwrap() {
        lines.push(transmission.line);
    }

    assert_eq!(lines, vec![2, 3, 5]);
    assert_eq!(source.bytes_read(), fs::metadata(&path).unwrap().len());
}

#[test]
fn hex_source_rejects_missing_file() {
    let mut path = std::env::temp_dir();
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!("bits_missing_{unique}.hex"));

    let err = match HexFileSource::open(&path) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };

    assert!(matches!(err, SourceError::Io(_)));
}
