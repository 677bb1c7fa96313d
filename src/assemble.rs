//! Selection and ordering of descriptors for the classifier.

use crate::analysis::features::FeatureVector;
use crate::error::ConfigurationError;

/// Pick `selected` descriptors from `features` in that exact order.
///
/// Every absent name is reported, not just the first.
pub fn assemble(
    features: &FeatureVector,
    selected: &[String],
) -> Result<Vec<f64>, ConfigurationError> {
    let mut values = Vec::with_capacity(selected.len());
    let mut missing = Vec::new();
    for name in selected {
        match features.get(name) {
            Some(value) => values.push(value),
            None => missing.push(name.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(ConfigurationError::MissingFeatures(missing));
    }
    Ok(values)
}
