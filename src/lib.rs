//! Voice-recording classifier for Parkinsonian dysphonia.
//!
//! A recording flows through [`validation`], [`analysis`] (decode plus
//! descriptor extraction), [`assemble`] and [`decision`];
//! [`pipeline::VoiceClassifier`] wires the stages together.

/// Acoustic analysis: decoding and descriptor extraction.
pub mod analysis;
/// Application directory resolution.
pub mod app_dirs;
/// Ordered selection of descriptors for the classifier.
pub mod assemble;
/// TOML configuration.
pub mod config;
/// Thresholded verdict and response payloads.
pub mod decision;
/// Error taxonomy of the classification pipeline.
pub mod error;
/// Upload container detection.
pub mod format;
/// Tracing setup with rotating log files.
pub mod logging;
/// Scalers, models and the classifier artifact.
pub mod ml;
/// Classification facade.
pub mod pipeline;
/// Non-WAV container conversion.
pub mod transcode;
/// Size and duration guards.
pub mod validation;

pub use analysis::features::{FEATURE_NAMES, FeatureVector, extract_features};
pub use decision::{ClassificationResult, Diagnosis, HealthReport};
pub use error::{ClassifyError, ConfigurationError, InputError};
pub use pipeline::VoiceClassifier;
