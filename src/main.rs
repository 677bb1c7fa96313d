//! `parkvoice`: classify a recording or report model health from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use parkvoice::config::{self, AppConfig};
use parkvoice::{ClassifyError, VoiceClassifier, logging};

const EXIT_FAILURE: u8 = 1;
const EXIT_INPUT_ERROR: u8 = 2;

fn main() -> ExitCode {
    if let Err(err) = logging::init("info") {
        eprintln!("Logging disabled: {err}");
    }
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("{}", failure.message);
            ExitCode::from(failure.code)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    config_path: Option<PathBuf>,
    artifact_path: Option<PathBuf>,
    command: Command,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Classify(PathBuf),
    Health,
}

#[derive(Debug)]
struct Failure {
    message: String,
    code: u8,
}

impl Failure {
    fn other(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            code: EXIT_FAILURE,
        }
    }
}

impl From<ClassifyError> for Failure {
    fn from(err: ClassifyError) -> Self {
        let code = if err.is_user_error() {
            EXIT_INPUT_ERROR
        } else {
            EXIT_FAILURE
        };
        Self {
            message: err.to_string(),
            code,
        }
    }
}

fn run() -> Result<(), Failure> {
    let Some(options) = parse_args(std::env::args().skip(1).collect()).map_err(Failure::other)?
    else {
        println!("{}", help_text());
        return Ok(());
    };
    let mut config = load_config(options.config_path.as_deref())?;
    if let Some(path) = options.artifact_path {
        config.artifact_path = Some(path);
    }
    let classifier = VoiceClassifier::from_config(&config).map_err(Failure::other)?;
    let json = match options.command {
        Command::Health => serde_json::to_string_pretty(&classifier.health()),
        Command::Classify(path) => {
            let bytes = std::fs::read(&path)
                .map_err(|err| Failure::other(format!("Read {}: {err}", path.display())))?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            let result = classifier.classify(&bytes, filename)?;
            serde_json::to_string_pretty(&result.to_response())
        }
    }
    .map_err(Failure::other)?;
    println!("{json}");
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig, Failure> {
    match path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(Failure::other)
}

/// `Ok(None)` when help was requested.
fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut config_path: Option<PathBuf> = None;
    let mut artifact_path: Option<PathBuf> = None;
    let mut command: Option<Command> = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            "--artifact" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--artifact requires a value".to_string())?;
                artifact_path = Some(PathBuf::from(value));
            }
            "classify" if command.is_none() => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "classify requires a FILE".to_string())?;
                command = Some(Command::Classify(PathBuf::from(value)));
            }
            "health" if command.is_none() => command = Some(Command::Health),
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let command = command.ok_or_else(help_text)?;
    Ok(Some(CliOptions {
        config_path,
        artifact_path,
        command,
    }))
}

fn help_text() -> String {
    [
        "parkvoice",
        "",
        "Classify a voice recording for signs of Parkinsonian dysphonia.",
        "",
        "Usage:",
        "  parkvoice [--config PATH] [--artifact PATH] classify FILE",
        "  parkvoice [--config PATH] [--artifact PATH] health",
        "",
        "Options:",
        "  --config PATH     Settings file (default: <app root>/config.toml).",
        "  --artifact PATH   Classifier artifact JSON (overrides artifact_path).",
        "  -h, --help        Print this help.",
        "",
        "Exit codes: 0 success, 2 unusable recording, 1 any other failure.",
    ]
    .join("\n")
}
