//! Classification facade: ingest, validate, extract, assemble, decide.

use std::borrow::Cow;
use std::io::Write;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::analysis::audio::{Waveform, load_canonical_waveform};
use crate::analysis::features::{FeatureVector, extract_features};
use crate::assemble::assemble;
use crate::config::{AppConfig, ConfigError};
use crate::decision::{ClassificationResult, DecisionEngine, HealthReport};
use crate::error::{ClassifyError, InputError};
use crate::format::AudioFormat;
use crate::ml::{ArtifactError, ClassifierArtifact};
use crate::transcode::{SymphoniaTranscoder, Transcoder};
use crate::validation::WaveformValidator;

const STAGING_PREFIX: &str = "parkvoice-";

/// Failures while building a [`VoiceClassifier`] from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Thread-safe entry point; one instance serves every request.
pub struct VoiceClassifier {
    transcoder: Arc<dyn Transcoder>,
    validator: WaveformValidator,
    engine: DecisionEngine,
    staging_dir: Option<PathBuf>,
}

impl VoiceClassifier {
    /// Build around an already loaded artifact.
    pub fn new(artifact: Arc<ClassifierArtifact>, config: &AppConfig) -> Self {
        Self {
            transcoder: Arc::new(SymphoniaTranscoder),
            validator: WaveformValidator::new(config.validation),
            engine: DecisionEngine::new(artifact, config.decision),
            staging_dir: config.staging_dir.clone(),
        }
    }

    /// Load the artifact named by `config` and build the classifier.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        let path = config.resolved_artifact_path()?;
        let artifact = ClassifierArtifact::load_json(&path)?;
        Ok(Self::new(Arc::new(artifact), config))
    }

    /// Replace the container transcoder.
    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    pub fn artifact(&self) -> &ClassifierArtifact {
        self.engine.artifact()
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            model_features: self.artifact().selected_features().to_vec(),
        }
    }

    /// Classify one uploaded recording.
    pub fn classify(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ClassificationResult, ClassifyError> {
        let outcome = self.classify_inner(bytes, filename);
        match &outcome {
            Ok(result) => tracing::info!(
                "Classified {filename}: {} (confidence {:.3}, warning: {})",
                result.diagnosis.as_str(),
                result.confidence,
                result.warning.is_some()
            ),
            Err(ClassifyError::Input(err)) => {
                tracing::warn!("Rejected {filename}: {err}");
            }
            Err(ClassifyError::Configuration(err)) => {
                tracing::error!("Artifact does not fit extracted features: {err}");
            }
            Err(err @ ClassifyError::Prediction(_)) => {
                tracing::error!("Classification of {filename} failed: {err}");
            }
        }
        outcome
    }

    fn classify_inner(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ClassificationResult, ClassifyError> {
        let format = AudioFormat::from_filename(filename).ok_or(InputError::UnsupportedFormat)?;
        self.validator.check_payload(bytes.len())?;
        tracing::info!(
            "Accepted {filename} ({} bytes, {})",
            bytes.len(),
            format.extension()
        );
        let wav = self.to_wav(bytes, format)?;
        let waveform = self.stage_and_decode(&wav)?;
        self.validator.check_waveform(&waveform)?;
        let features = guarded_extract(&waveform)?;
        let selected = assemble(&features, self.artifact().selected_features())?;
        self.engine.decide(&selected)
    }

    fn to_wav<'a>(&self, bytes: &'a [u8], format: AudioFormat) -> Result<Cow<'a, [u8]>, InputError> {
        if format.is_wav() {
            return Ok(Cow::Borrowed(bytes));
        }
        self.transcoder
            .transcode_to_wav(bytes, format)
            .map(Cow::Owned)
            .map_err(|err| InputError::Conversion(err.to_string()))
    }

    /// Write WAV bytes to a request-scoped file and decode it; the file is
    /// removed when this returns, on every path.
    fn stage_and_decode(&self, wav: &[u8]) -> Result<Waveform, ClassifyError> {
        let mut staged = self
            .staging_file()
            .map_err(|err| ClassifyError::Prediction(format!("staging failed: {err}")))?;
        staged
            .write_all(wav)
            .and_then(|()| staged.flush())
            .map_err(|err| ClassifyError::Prediction(format!("staging failed: {err}")))?;
        load_canonical_waveform(staged.path()).map_err(|err| {
            tracing::debug!("Decoding staged {} failed: {err}", staged.path().display());
            InputError::Undecodable(err).into()
        })
    }

    fn staging_file(&self) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX).suffix(".wav");
        match &self.staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

fn guarded_extract(waveform: &Waveform) -> Result<FeatureVector, ClassifyError> {
    let result = catch_unwind(AssertUnwindSafe(|| extract_features(waveform)));
    match result {
        Ok(Ok(features)) => Ok(features),
        Ok(Err(err)) => Err(ClassifyError::Prediction(err.to_string())),
        Err(payload) => Err(ClassifyError::Prediction(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("feature extraction panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("feature extraction panicked: {msg}")
    } else {
        "feature extraction panicked".to_string()
    }
}
