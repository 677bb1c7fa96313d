//! Pretrained classifier bundle: ordered feature names, scaler and model.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{FeatureScaler, GbdtStumpModel, LogRegModel, ProbabilityModel, StandardScaler};

/// Errors raised while loading or assembling an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read model artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid model artifact JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// Classifier section of the artifact file, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression(LogRegModel),
    GbdtStump(GbdtStumpModel),
}

impl ClassifierSpec {
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        match self {
            Self::LogisticRegression(model) => model.validate(feature_count),
            Self::GbdtStump(model) => model.validate(feature_count),
        }
    }

    fn into_model(self) -> Box<dyn ProbabilityModel> {
        match self {
            Self::LogisticRegression(model) => Box::new(model),
            Self::GbdtStump(model) => Box::new(model),
        }
    }
}

/// On-disk JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    #[serde(default = "default_model_version")]
    pub model_version: i64,
    pub selected_features: Vec<String>,
    pub scaler: StandardScaler,
    pub classifier: ClassifierSpec,
}

fn default_model_version() -> i64 {
    1
}

/// Loaded, validated artifact shared read-only by every classification.
pub struct ClassifierArtifact {
    model_version: i64,
    selected_features: Vec<String>,
    scaler: Box<dyn FeatureScaler>,
    model: Box<dyn ProbabilityModel>,
}

impl fmt::Debug for ClassifierArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierArtifact")
            .field("model_version", &self.model_version)
            .field("selected_features", &self.selected_features)
            .finish_non_exhaustive()
    }
}

impl ClassifierArtifact {
    /// Assemble an artifact from any scaler/model pair.
    ///
    /// The scaler must consume exactly one value per selected feature; the
    /// model must not read past the end of the vector.
    pub fn new(
        selected_features: Vec<String>,
        scaler: Box<dyn FeatureScaler>,
        model: Box<dyn ProbabilityModel>,
    ) -> Result<Self, ArtifactError> {
        validate_feature_names(&selected_features)?;
        let count = selected_features.len();
        if scaler.dim() != count {
            return Err(ArtifactError::Invalid(format!(
                "scaler expects {} features but {count} are selected",
                scaler.dim()
            )));
        }
        if model.dim() > count {
            return Err(ArtifactError::Invalid(format!(
                "classifier expects {} features but {count} are selected",
                model.dim()
            )));
        }
        Ok(Self {
            model_version: 1,
            selected_features,
            scaler,
            model,
        })
    }

    /// Validate a parsed artifact file and build the runtime artifact.
    pub fn from_file(file: ArtifactFile) -> Result<Self, ArtifactError> {
        validate_feature_names(&file.selected_features)?;
        let count = file.selected_features.len();
        file.scaler.validate().map_err(ArtifactError::Invalid)?;
        file.classifier
            .validate(count)
            .map_err(ArtifactError::Invalid)?;
        let mut artifact = Self::new(
            file.selected_features,
            Box::new(file.scaler),
            file.classifier.into_model(),
        )?;
        artifact.model_version = file.model_version;
        Ok(artifact)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let file: ArtifactFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Load an artifact from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ArtifactError> {
        let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_json_str(&json)?;
        tracing::info!(
            "Loaded model artifact v{} from {} ({} features)",
            artifact.model_version,
            path.display(),
            artifact.selected_features.len()
        );
        Ok(artifact)
    }

    pub fn model_version(&self) -> i64 {
        self.model_version
    }

    /// Feature names in the positional order the model expects.
    pub fn selected_features(&self) -> &[String] {
        &self.selected_features
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn model(&self) -> &dyn ProbabilityModel {
        self.model.as_ref()
    }
}

fn validate_feature_names(names: &[String]) -> Result<(), ArtifactError> {
    if names.is_empty() {
        return Err(ArtifactError::Invalid(
            "selected_features must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ArtifactError::Invalid(
                "selected_features contains an empty name".to_string(),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(ArtifactError::Invalid(format!(
                "selected_features lists {name} more than once"
            )));
        }
    }
    Ok(())
}
