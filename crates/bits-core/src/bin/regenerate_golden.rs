use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bits_core::{DecodeOptions, analyze_hex_file};

const INPUT_FILE: &str = "input.hex";
const OPTIONS_FILE: &str = "options.json";
const EXPECTED_FILE: &str = "expected_report.json";

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    let mut cases = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if path.is_dir() {
            cases.push(path);
        }
    }
    cases.sort();

    for case in cases {
        let input = case.join(INPUT_FILE);
        let output = case.join(EXPECTED_FILE);
        if !input.exists() {
            // A report without its input can no longer be checked.
            if output.exists() {
                fs::remove_file(&output)
                    .map_err(|err| format!("failed to remove {}: {}", output.display(), err))?;
                println!("pruned {}", output.display());
            }
            continue;
        }
        let options = load_options(&case.join(OPTIONS_FILE))?;
        regenerate_one(&input, &output, &options)?;
        println!(
            "regenerated {} ({:?}, max depth {})",
            output.display(),
            options.policy,
            options.max_depth
        );
    }

    Ok(())
}

fn load_options(path: &Path) -> Result<DecodeOptions, String> {
    if !path.exists() {
        return Ok(DecodeOptions::default());
    }
    let json = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    let options: DecodeOptions = serde_json::from_str(&json)
        .map_err(|err| format!("invalid options in {}: {}", path.display(), err))?;
    Ok(options.clamped())
}

fn regenerate_one(input: &Path, output: &Path, options: &DecodeOptions) -> Result<(), String> {
    let report = analyze_hex_file(input, options).map_err(|err| {
        let mut message = format!("analysis failed for {}: {}", input.display(), err);
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        message
    })?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
