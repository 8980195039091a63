use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bits_core::{DEFAULT_MAX_DEPTH, DecodeOptions, DecodePolicy, MAX_DEPTH_CEILING, Report};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use log::debug;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BITS_BUILD_COMMIT"),
    " ",
    env!("BITS_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "bits")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for hex-encoded BITS transmissions (packet trees and version sums).",
    long_about = None,
    after_help = "Examples:\n  bits transmission sum 8A004A801A8002F478\n  bits tx decode input.hex -o report.json\n  bits transmission inspect input.hex --stdout --pretty"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on hex transmissions.
    #[command(alias = "tx")]
    Transmission {
        #[command(subcommand)]
        command: TransmissionCommands,
    },
}

#[derive(Subcommand, Debug)]
enum TransmissionCommands {
    /// Decode one hex transmission and print its version sum.
    Sum {
        /// Hex transmission (case-insensitive)
        hex: String,

        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Decode every line of a hex file and generate a versioned JSON report.
    #[command(alias = "inspect")]
    #[command(
        after_help = "Examples:\n  bits transmission decode input.hex -o report.json\n  bits tx inspect input.hex --stdout --pretty\n  bits tx decode 'inputs/*.hex' --report report.json --list-anomalies"
    )]
    Decode {
        /// Path to a .hex or .txt file (one transmission per line)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// List lenient-mode anomalies after decoding
        #[arg(long)]
        list_anomalies: bool,

        /// Exit with a non-zero code if anomalies were recorded
        #[arg(long)]
        fail_on_anomalies: bool,

        #[command(flatten)]
        decode: DecodeArgs,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Fail on malformed digits and truncated packets instead of recovering
    #[arg(long)]
    strict: bool,

    /// Maximum operator nesting depth
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DEPTH as u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_DEPTH_CEILING as u64)
    )]
    max_depth: u64,
}

impl DecodeArgs {
    fn options(&self) -> DecodeOptions {
        let policy = if self.strict {
            DecodePolicy::Strict
        } else {
            DecodePolicy::Lenient
        };
        DecodeOptions {
            policy,
            ..DecodeOptions::default()
        }
        .with_max_depth(self.max_depth as usize)
    }
}

struct DecodeFlags {
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    list_anomalies: bool,
    fail_on_anomalies: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Transmission { command } => match command {
            TransmissionCommands::Sum { hex, decode } => cmd_transmission_sum(&hex, &decode),
            TransmissionCommands::Decode {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                list_anomalies,
                fail_on_anomalies,
                decode,
            } => cmd_transmission_decode(
                input,
                report,
                DecodeFlags {
                    stdout,
                    pretty,
                    compact,
                    quiet,
                    list_anomalies,
                    fail_on_anomalies,
                },
                &decode,
            ),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_transmission_sum(hex: &str, decode: &DecodeArgs) -> Result<(), CliError> {
    let hex = hex.trim();
    if hex.is_empty() {
        return Err(CliError::new(
            "empty transmission",
            Some("pass a hex string such as D2FE28".to_string()),
        ));
    }

    let options = decode.options();
    let decoded = bits_core::decode_transmission_with(hex, &options)
        .context("transmission decoding failed")?;
    debug!("{} anomalies recorded", decoded.anomalies.len());
    println!("{}", bits_core::sum_versions(&decoded.packets));
    Ok(())
}

fn cmd_transmission_decode(
    input: PathBuf,
    report: Option<PathBuf>,
    flags: DecodeFlags,
    decode: &DecodeArgs,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report = if flags.stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        // A directory that does not exist yet cannot hold the input.
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                }
            })
            .filter(|parent| parent.is_dir())
            .map(fs::canonicalize)
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let options = decode.options();
    let mut rep = bits_core::analyze_hex_file(&resolved_input, &options)
        .context("transmission decoding failed")?;
    rep.generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("timestamp formatting failed")?;
    debug!(
        "decoded {} transmissions with {:?}",
        rep.transmissions.len(),
        options
    );
    let json = serialize_report(&rep, flags.pretty, flags.compact)?;

    if flags.stdout {
        print!("{}", json);
    } else if let Some(report) = report.as_ref() {
        if let Some(parent) = report.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }

        fs::write(report, json)
            .with_context(|| format!("Failed to write report: {}", report.display()))?;
    }

    if flags.list_anomalies && !flags.quiet {
        print_anomalies(&rep);
    }
    if !flags.quiet {
        if let Some(report) = report.as_ref() {
            eprintln!(
                "OK: version sum {} -> {}",
                rep.version_sum_total,
                report.display()
            );
        }
    }
    if flags.fail_on_anomalies && has_anomalies(&rep) {
        return Err(CliError::new(
            "anomalies detected while decoding",
            Some("use --list-anomalies to inspect, or --strict to stop at the first".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn has_anomalies(rep: &Report) -> bool {
    rep.transmissions.iter().any(|t| t.has_anomalies())
}

fn print_anomalies(rep: &Report) {
    eprintln!("Anomalies:");
    for transmission in &rep.transmissions {
        for anomaly in &transmission.anomalies {
            eprintln!("  line {}: {}", transmission.line, anomaly);
        }
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .hex or .txt file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .hex or .txt file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "hex" && ext != "txt" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .hex or .txt file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .hex or .txt".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single input file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
