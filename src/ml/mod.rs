//! Inference-side building blocks: feature scaling and binary probability models.
//!
//! Training happens offline; this module only loads fitted parameters and
//! evaluates them.

pub mod artifact;
pub mod gbdt_stump;
pub mod logreg;
pub mod scaler;

pub use artifact::{ArtifactError, ClassifierArtifact, ClassifierSpec};
pub use gbdt_stump::{GbdtStumpModel, Stump};
pub use logreg::LogRegModel;
pub use scaler::StandardScaler;

/// Failure evaluating a scaler or model on one vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Model produced a non-finite value")]
    NonFinite,
}

/// Normalizes a positional feature vector before it reaches the model.
pub trait FeatureScaler: Send + Sync {
    /// Number of features the scaler was fitted on.
    fn dim(&self) -> usize;
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Binary classifier yielding P(Healthy) and P(Parkinson).
pub trait ProbabilityModel: Send + Sync {
    fn dim(&self) -> usize;
    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, ModelError>;
}

/// Class probabilities for the two labels; they sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub healthy: f64,
    pub parkinson: f64,
}

impl ClassProbabilities {
    /// Build from P(Parkinson), deriving the complement.
    pub fn from_parkinson(parkinson: f64) -> Self {
        Self {
            healthy: 1.0 - parkinson,
            parkinson,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.parkinson.is_finite() && (0.0..=1.0).contains(&self.parkinson)
    }
}

pub(crate) fn check_dim(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

/// Numerically stable logistic link.
pub(crate) fn sigmoid(raw: f64) -> f64 {
    if raw >= 0.0 {
        1.0 / (1.0 + (-raw).exp())
    } else {
        let e = raw.exp();
        e / (1.0 + e)
    }
}
