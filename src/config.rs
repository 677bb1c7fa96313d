//! TOML configuration for the classifier pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::{self, AppDirError};

/// File name of the settings file inside the app root.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// File name of the classifier artifact when `artifact_path` is unset.
pub const DEFAULT_ARTIFACT_FILE_NAME: &str = "pd_model.json";

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable app directory.
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A value parsed but is out of range.
    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Top-level settings persisted in `config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Classifier artifact; defaults to `<app root>/pd_model.json`.
    pub artifact_path: Option<PathBuf>,
    /// Directory for request-scoped WAV staging files; defaults to the OS temp dir.
    pub staging_dir: Option<PathBuf>,
    pub validation: ValidationSettings,
    pub decision: DecisionSettings,
}

/// Minimums enforced before feature extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub min_payload_bytes: usize,
    pub min_duration_seconds: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_payload_bytes: 1024,
            min_duration_seconds: 3.0,
        }
    }
}

/// Probability cut-offs for the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionSettings {
    /// Predict Parkinson when P(Parkinson) is at least this value.
    pub parkinson_threshold: f64,
    /// Attach a warning when the verdict's confidence is below this value.
    pub low_confidence_threshold: f64,
}

impl Default for DecisionSettings {
    fn default() -> Self {
        Self {
            parkinson_threshold: 0.7,
            low_confidence_threshold: 0.7,
        }
    }
}

impl AppConfig {
    /// Check value ranges after parsing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.min_payload_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "validation.min_payload_bytes",
                reason: "must be positive".to_string(),
            });
        }
        let min_duration = self.validation.min_duration_seconds;
        if !min_duration.is_finite() || min_duration <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "validation.min_duration_seconds",
                reason: format!("must be positive, got {min_duration}"),
            });
        }
        check_probability("decision.parkinson_threshold", self.decision.parkinson_threshold)?;
        check_probability(
            "decision.low_confidence_threshold",
            self.decision.low_confidence_threshold,
        )
    }

    /// Artifact path from config, or the default inside the app root.
    pub fn resolved_artifact_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.artifact_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::app_root_dir()?.join(DEFAULT_ARTIFACT_FILE_NAME)),
        }
    }
}

fn check_probability(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must lie in [0, 1], got {value}"),
        });
    }
    Ok(())
}

/// Resolve the configuration file path inside the app root.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load `config.toml` from the app root, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load settings from `path`, returning defaults if the file does not exist.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}
