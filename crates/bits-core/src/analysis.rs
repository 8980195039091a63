use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::packet::{
    DecodeError, DecodeOptions, count_literals, count_operators, count_packets,
    decode_transmission_with, max_depth, sum_versions,
};
use crate::source::{HexFileSource, SourceError, Transmission, TransmissionSource};
use crate::{Report, TransmissionSummary, make_stub_report};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read transmissions")]
    Source(#[from] SourceError),
    #[error("line {line}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },
}

pub fn analyze_hex_file(path: &Path, options: &DecodeOptions) -> Result<Report, AnalysisError> {
    let source = HexFileSource::open(path)?;
    analyze_source(path, source, options)
}

pub fn analyze_source<S: TransmissionSource>(
    path: &Path,
    mut source: S,
    options: &DecodeOptions,
) -> Result<Report, AnalysisError> {
    let mut transmissions = Vec::new();
    while let Some(transmission) = source.next_transmission()? {
        transmissions.push(summarize_transmission(&transmission, options)?);
    }

    let mut report = make_stub_report(&path.display().to_string(), source.bytes_read());
    report.options = options.clamped();
    report.version_sum_total = transmissions.iter().map(|t| t.version_sum).sum();
    report.transmissions = transmissions;
    debug!(
        "analyzed {} transmissions from {}, version sum {}",
        report.transmissions.len(),
        report.input.path,
        report.version_sum_total
    );
    Ok(report)
}

/// Decode one transmission and fold it into a report entry.
pub fn summarize_transmission(
    transmission: &Transmission,
    options: &DecodeOptions,
) -> Result<TransmissionSummary, AnalysisError> {
    let decoded = decode_transmission_with(&transmission.hex, options).map_err(|source| {
        AnalysisError::Decode {
            line: transmission.line,
            source,
        }
    })?;

    Ok(TransmissionSummary {
        line: transmission.line,
        hex_digits: transmission.hex.chars().count(),
        bits_total: decoded.bits_total,
        padding_bits: decoded.padding_bits,
        packets_total: count_packets(&decoded.packets),
        literal_count: count_literals(&decoded.packets),
        operator_count: count_operators(&decoded.packets),
        max_depth: max_depth(&decoded.packets),
        version_sum: sum_versions(&decoded.packets),
        anomalies: decoded.anomalies,
        packets: decoded.packets,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use super::{AnalysisError, analyze_source};
    use crate::packet::{Anomaly, DecodeError, DecodeOptions, DecodePolicy};
    use crate::source::HexLineSource;

    #[test]
    fn totals_across_lines() {
        let input = "8A004A801A8002F478\n620080001611562C8802118E34\n";
        let source = HexLineSource::new(Cursor::new(input));
        let report =
            analyze_source(Path::new("inline.hex"), source, &DecodeOptions::default()).unwrap();

        assert_eq!(report.transmissions.len(), 2);
        assert_eq!(report.version_sum_total, 28);
        assert_eq!(report.input.bytes, input.len() as u64);
        assert_eq!(report.transmissions[1].line, 2);
        assert_eq!(report.transmissions[0].packets_total, 4);
        assert_eq!(report.transmissions[0].max_depth, 4);
    }

    #[test]
    fn lenient_anomalies_are_reported() {
        let source = HexLineSource::new(Cursor::new("D2FG28\n"));
        let report =
            analyze_source(Path::new("inline.hex"), source, &DecodeOptions::default()).unwrap();
        assert_eq!(
            report.transmissions[0].anomalies,
            vec![Anomaly::MalformedHexDigit {
                index: 3,
                digit: 'G'
            }]
        );
    }

    #[test]
    fn strict_failure_names_the_line() {
        let source = HexLineSource::new(Cursor::new("D2FE28\nEE00D40C82\n"));
        let err = analyze_source(Path::new("inline.hex"), source, &DecodeOptions::strict())
            .unwrap_err();
        match err {
            AnalysisError::Decode { line, source } => {
                assert_eq!(line, 2);
                assert!(matches!(source, DecodeError::TruncatedOperator { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_error_display_names_line_once() {
        let source = HexLineSource::new(Cursor::new("EE00D40C82\n"));
        let err = analyze_source(Path::new("inline.hex"), source, &DecodeOptions::strict())
            .unwrap_err();
        assert_eq!(err.to_string(), "line 1");
        let cause = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            cause.as_deref(),
            Some("operator at bit 0 announced 3 sub-packets, found 2")
        );
    }

    #[test]
    fn report_echoes_options() {
        let source = HexLineSource::new(Cursor::new(""));
        let options = DecodeOptions::strict().with_max_depth(8);
        let report = analyze_source(Path::new("empty.hex"), source, &options).unwrap();
        assert!(report.transmissions.is_empty());
        assert_eq!(report.options.policy, DecodePolicy::Strict);
        assert_eq!(report.options.max_depth, 8);

        let source = HexLineSource::new(Cursor::new(""));
        let unbounded = DecodeOptions {
            max_depth: usize::MAX,
            ..DecodeOptions::default()
        };
        let report = analyze_source(Path::new("empty.hex"), source, &unbounded).unwrap();
        assert_eq!(report.options.max_depth, crate::packet::MAX_DEPTH_CEILING);
    }
}
