//! Scaling, probability prediction and the thresholded verdict.

use std::sync::Arc;

use serde::Serialize;

use crate::config::DecisionSettings;
use crate::error::{ClassifyError, ConfigurationError};
use crate::ml::{ClassProbabilities, ClassifierArtifact, ModelError};

pub const PARKINSON_MESSAGE: &str = "Potential Parkinson's detected";
pub const HEALTHY_MESSAGE: &str = "No signs of Parkinson's detected";
pub const LOW_CONFIDENCE_WARNING: &str =
    "Low confidence result - please test again with a longer or clearer recording.";

/// Predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnosis {
    Healthy,
    Parkinson,
}

impl Diagnosis {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Parkinson => "Parkinson",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Healthy => HEALTHY_MESSAGE,
            Self::Parkinson => PARKINSON_MESSAGE,
        }
    }
}

/// Verdict for one recording, before presentation rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub diagnosis: Diagnosis,
    /// Probability of the predicted class.
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
    pub warning: Option<String>,
    pub features_used: Vec<String>,
}

/// Response payload shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResponse {
    pub disease: &'static str,
    pub confidence: f64,
    pub message: &'static str,
    pub details: ResponseDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDetails {
    pub parkinson_prob: f64,
    pub healthy_prob: f64,
    pub features_used: Vec<String>,
}

impl ClassificationResult {
    /// Presentation form with probabilities rounded to three decimals.
    pub fn to_response(&self) -> ClassificationResponse {
        ClassificationResponse {
            disease: self.diagnosis.as_str(),
            confidence: round3(self.confidence),
            message: self.diagnosis.message(),
            details: ResponseDetails {
                parkinson_prob: round3(self.probabilities.parkinson),
                healthy_prob: round3(self.probabilities.healthy),
                features_used: self.features_used.clone(),
            },
            warning: self.warning.clone(),
        }
    }
}

/// Liveness payload listing the artifact's features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_features: Vec<String>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Applies the artifact's scaler and model, then the configured thresholds.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    artifact: Arc<ClassifierArtifact>,
    settings: DecisionSettings,
}

impl DecisionEngine {
    pub fn new(artifact: Arc<ClassifierArtifact>, settings: DecisionSettings) -> Self {
        Self { artifact, settings }
    }

    pub fn artifact(&self) -> &ClassifierArtifact {
        &self.artifact
    }

    /// Classify an assembled, positional feature vector.
    pub fn decide(&self, features: &[f64]) -> Result<ClassificationResult, ClassifyError> {
        let scaled = self
            .artifact
            .scaler()
            .transform(features)
            .map_err(model_error)?;
        let probabilities = self
            .artifact
            .model()
            .predict_proba(&scaled)
            .map_err(model_error)?;
        if !probabilities.is_valid() {
            return Err(ClassifyError::Prediction(format!(
                "classifier returned invalid probability {}",
                probabilities.parkinson
            )));
        }
        Ok(self.verdict(probabilities))
    }

    fn verdict(&self, probabilities: ClassProbabilities) -> ClassificationResult {
        let diagnosis = if probabilities.parkinson >= self.settings.parkinson_threshold {
            Diagnosis::Parkinson
        } else {
            Diagnosis::Healthy
        };
        let confidence = match diagnosis {
            Diagnosis::Parkinson => probabilities.parkinson,
            Diagnosis::Healthy => probabilities.healthy,
        };
        let warning = (confidence < self.settings.low_confidence_threshold)
            .then(|| LOW_CONFIDENCE_WARNING.to_string());
        ClassificationResult {
            diagnosis,
            confidence,
            probabilities,
            warning,
            features_used: self.artifact.selected_features().to_vec(),
        }
    }
}

fn model_error(err: ModelError) -> ClassifyError {
    match err {
        ModelError::DimensionMismatch { .. } => ConfigurationError::Model(err).into(),
        ModelError::NonFinite => ClassifyError::Prediction(err.to_string()),
    }
}
