//! Binary logistic regression over scaled acoustic descriptors.

use serde::{Deserialize, Serialize};

use super::{ClassProbabilities, ModelError, ProbabilityModel, check_dim, sigmoid};

/// Fitted weights; `coef[i]` multiplies the i-th selected feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRegModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogRegModel {
    /// Validate the model against the number of selected features.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.coef.len() != feature_count {
            return Err(format!(
                "coef length {} does not match {feature_count} selected features",
                self.coef.len()
            ));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|w| !w.is_finite()) {
            return Err("logistic regression weights must be finite".to_string());
        }
        Ok(())
    }

    /// Raw logit for a scaled feature vector.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coef
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

impl ProbabilityModel for LogRegModel {
    fn dim(&self) -> usize {
        self.coef.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, ModelError> {
        check_dim(self.dim(), features)?;
        let raw = self.decision_function(features);
        if raw.is_nan() {
            return Err(ModelError::NonFinite);
        }
        Ok(ClassProbabilities::from_parkinson(sigmoid(raw)))
    }
}
