//! Error taxonomy surfaced by [`crate::pipeline::VoiceClassifier`].

use thiserror::Error;

use crate::ml::ModelError;

/// Problems with the caller's recording; never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Unsupported audio format.")]
    UnsupportedFormat,
    #[error("File too short or empty.")]
    PayloadTooSmall { len: usize, min: usize },
    #[error("Recording too short (min {min_seconds} seconds).")]
    RecordingTooShort { seconds: f64, min_seconds: f64 },
    #[error("Conversion failed: {0}")]
    Conversion(String),
    #[error("Could not decode audio: {0}")]
    Undecodable(String),
}

/// Mismatch between the loaded artifact and what the pipeline produces.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Missing features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),
    #[error("Model configuration error: {0}")]
    Model(ModelError),
}

/// Any failure of a single classification request.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Prediction error: {0}")]
    Prediction(String),
}

impl ClassifyError {
    /// HTTP-style status for the error class.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Input(_) => 400,
            Self::Configuration(_) | Self::Prediction(_) => 500,
        }
    }

    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}
