//! Dump the full acoustic feature vector of each recording as one JSON line.

use std::path::{Path, PathBuf};

use parkvoice::analysis::audio::load_canonical_waveform;
use parkvoice::{extract_features, logging};
use serde::Serialize;

fn main() {
    if let Err(err) = logging::init("warn") {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct FeatureRow<'a> {
    file: &'a str,
    duration_seconds: f32,
    features: parkvoice::FeatureVector,
}

fn run() -> Result<(), String> {
    let Some(files) = parse_args(std::env::args().skip(1).collect())? else {
        println!("{}", help_text());
        return Ok(());
    };
    let mut failures = 0usize;
    for path in &files {
        match describe(path) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err}", path.display());
            }
        }
    }
    if failures > 0 {
        return Err(format!("{failures} of {} files failed", files.len()));
    }
    Ok(())
}

fn describe(path: &Path) -> Result<String, String> {
    let waveform = load_canonical_waveform(path)?;
    let features = extract_features(&waveform).map_err(|err| err.to_string())?;
    let file = path.to_string_lossy();
    let row = FeatureRow {
        file: &file,
        duration_seconds: waveform.duration_seconds(),
        features,
    };
    serde_json::to_string(&row).map_err(|err| err.to_string())
}

/// `Ok(None)` when help was requested.
fn parse_args(args: Vec<String>) -> Result<Option<Vec<PathBuf>>, String> {
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        return Ok(None);
    }
    if args.is_empty() {
        return Err(help_text());
    }
    if let Some(flag) = args.iter().find(|arg| arg.starts_with("--")) {
        return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
    }
    Ok(Some(args.into_iter().map(PathBuf::from).collect()))
}

fn help_text() -> String {
    [
        "parkvoice-features",
        "",
        "Print every acoustic descriptor of each recording as a JSON line.",
        "",
        "Usage:",
        "  parkvoice-features FILE...",
        "  parkvoice-features --help",
    ]
    .join("\n")
}
