//! BITS core library: decoding of hex-encoded Binary Transmission Streams.
//!
//! A transmission is a hex string expanded into bits; the bits encode a tree
//! of packets, each either a literal value or an operator wrapping nested
//! packets. This crate implements the pipeline used by the CLI: `source`
//! reads transmissions, `stream` exposes them as a forward-only bit cursor,
//! `packet` decodes the tree, and `analysis` folds the result into a
//! deterministic report.
//!
//! Invariants:
//! - Bits are consumed front to back and never re-read.
//! - An operator bounded by total width consumes exactly that width, whatever
//!   it finds inside.
//! - Lenient decoding never fails on malformed input; it records anomalies.
//!   Only the nesting ceiling is fatal in every policy.
//!
//! Version française (résumé):
//! Cette crate décode les transmissions BITS : texte hexadécimal -> bits ->
//! arbre de paquets (littéraux et opérateurs) -> rapport déterministe. Le
//! mode tolérant consigne les anomalies, le mode strict échoue.
//!
//! # Examples
//! ```
//! use bits_core::{decode_transmission, sum_versions};
//!
//! let packets = decode_transmission("A0016C880162017C3686B18A3D4780")?;
//! assert_eq!(sum_versions(&packets), 31);
//! # Ok::<(), bits_core::DecodeError>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod packet;
mod source;
pub mod stream;

pub use analysis::{AnalysisError, analyze_hex_file, analyze_source, summarize_transmission};
pub use packet::{
    Anomaly, DEFAULT_MAX_DEPTH, DecodeError, DecodeOptions, DecodePolicy, Decoded, Decoder,
    LengthMode, Literal, MAX_DEPTH_CEILING, Operator, Packet, count_literals, count_operators,
    count_packets, decode_transmission, decode_transmission_with, max_depth, sum_versions,
};
pub use source::{HexFileSource, HexLineSource, SourceError, Transmission, TransmissionSource};
pub use stream::StreamError;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used until the caller stamps the report.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoding report over every transmission of one input.
///
/// # Examples
/// ```
/// use bits_core::make_stub_report;
///
/// let report = make_stub_report("input.hex", 42);
/// assert_eq!(report.report_version, bits_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input metadata.
    pub input: InputInfo,
    /// Decoder configuration used for every transmission.
    pub options: DecodeOptions,

    /// Per-transmission results in input order.
    pub transmissions: Vec<TransmissionSummary>,
    /// Sum of the version sums of all transmissions.
    pub version_sum_total: u64,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Bytes read from the input.
    pub bytes: u64,
}

/// Decoding result for one transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionSummary {
    /// 1-based input line.
    pub line: usize,
    pub hex_digits: usize,
    pub bits_total: usize,
    /// Trailing bits discarded after the last top-level packet.
    pub padding_bits: usize,
    /// Packets in the tree, nested ones included.
    pub packets_total: u64,
    pub literal_count: u64,
    pub operator_count: u64,
    /// Deepest nesting level (a lone literal is 1).
    pub max_depth: usize,
    pub version_sum: u64,
    /// Lenient corrections, omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<Anomaly>,
    /// Decoded top-level packets.
    pub packets: Vec<Packet>,
}

impl TransmissionSummary {
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// Build a stub report with base fields filled and no transmissions.
///
/// # Examples
/// ```
/// use bits_core::make_stub_report;
///
/// let report = make_stub_report("input.hex", 42);
/// assert!(report.transmissions.is_empty());
/// assert_eq!(report.version_sum_total, 0);
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "bits".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        options: DecodeOptions::default(),
        transmissions: vec![],
        version_sum_total: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_anomalies_when_empty() {
        let mut report = make_stub_report("input.hex", 7);
        report.transmissions.push(TransmissionSummary {
            line: 1,
            hex_digits: 6,
            bits_total: 24,
            padding_bits: 3,
            packets_total: 1,
            literal_count: 1,
            operator_count: 0,
            max_depth: 1,
            version_sum: 6,
            anomalies: vec![],
            packets: vec![Packet::Literal(Literal {
                version: 6,
                value: 2021u32.into(),
            })],
        });

        let value = serde_json::to_value(&report).expect("report json");
        let transmission = &value["transmissions"][0];
        assert!(transmission.get("anomalies").is_none());
        assert_eq!(transmission["packets"][0]["value"], "2021");
        assert_eq!(value["options"]["policy"], "lenient");
        assert_eq!(value["options"]["max_depth"], 64);
    }
}
