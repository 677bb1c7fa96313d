use serde::{Deserialize, Serialize};

use crate::ml::{ClassProbabilities, ModelError, ProbabilityModel, sigmoid};

/// Single-node decision tree used as a weak learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stump {
    /// Feature index used for the split.
    pub feature_index: u16,
    /// Threshold in scaled feature units.
    pub threshold: f64,
    /// Prediction for `feature <= threshold`.
    pub left_value: f64,
    /// Prediction for `feature > threshold`.
    pub right_value: f64,
}

impl Stump {
    /// Predict the stump value for a feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let idx = self.feature_index as usize;
        let value = features.get(idx).copied().unwrap_or(0.0);
        if value <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Boosted stumps over a single logit (binary classification).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtStumpModel {
    /// Learning rate applied to each stump prediction.
    pub learning_rate: f64,
    /// Raw score before boosting rounds.
    pub init_raw: f64,
    /// One stump per round.
    pub stumps: Vec<Stump>,
}

impl GbdtStumpModel {
    /// Validate structural invariants against the number of selected features.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err("learning_rate must be > 0".to_string());
        }
        if !self.init_raw.is_finite() {
            return Err("init_raw must be finite".to_string());
        }
        for (round_idx, stump) in self.stumps.iter().enumerate() {
            if stump.feature_index as usize >= feature_count {
                return Err(format!(
                    "Round {round_idx} splits on feature {} but only {feature_count} are selected",
                    stump.feature_index
                ));
            }
            if !(stump.threshold.is_finite()
                && stump.left_value.is_finite()
                && stump.right_value.is_finite())
            {
                return Err(format!("Round {round_idx} has non-finite parameters"));
            }
        }
        Ok(())
    }

    /// Predict the raw logit for a feature vector.
    pub fn predict_raw(&self, features: &[f64]) -> f64 {
        self.stumps
            .iter()
            .fold(self.init_raw, |raw, stump| {
                raw + self.learning_rate * stump.predict(features)
            })
    }
}

impl ProbabilityModel for GbdtStumpModel {
    /// Smallest vector width that covers every split feature.
    fn dim(&self) -> usize {
        self.stumps
            .iter()
            .map(|stump| stump.feature_index as usize + 1)
            .max()
            .unwrap_or(0)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, ModelError> {
        let required = self.dim();
        if features.len() < required {
            return Err(ModelError::DimensionMismatch {
                expected: required,
                actual: features.len(),
            });
        }
        let raw = self.predict_raw(features);
        if raw.is_nan() {
            return Err(ModelError::NonFinite);
        }
        Ok(ClassProbabilities::from_parkinson(sigmoid(raw)))
    }
}
