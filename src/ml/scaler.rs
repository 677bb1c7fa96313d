//! Standard (z-score) scaler fitted offline.

use serde::{Deserialize, Serialize};

use super::{FeatureScaler, ModelError, check_dim};

/// Per-feature `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(idx) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("scaler mean[{idx}] is not finite"));
        }
        if let Some(idx) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(format!("scaler scale[{idx}] must be finite and non-zero"));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn dim(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dim(self.dim(), features)?;
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
