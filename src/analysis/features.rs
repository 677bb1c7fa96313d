//! Full descriptor set for one waveform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::audio::Waveform;
use super::{frequency_domain, pitch, time_domain};

/// Mean fundamental frequency in Hz.
pub const FO: &str = "Fo";
pub const JITTER: &str = "Jitter";
pub const SHIMMER: &str = "Shimmer";
pub const SHIMMER_DB: &str = "Shimmer(dB)";
pub const SHIMMER_APQ5: &str = "Shimmer:APQ5";
pub const SHIMMER_APQ11: &str = "Shimmer:APQ11";
pub const HNR: &str = "HNR";
pub const NHR: &str = "NHR";
pub const RPDE: &str = "RPDE";
pub const DFA: &str = "DFA";
pub const PPE: &str = "PPE";
pub const SPREAD1: &str = "spread1";
pub const SPREAD2: &str = "spread2";

/// Every descriptor name [`extract_features`] produces.
pub const FEATURE_NAMES: [&str; 13] = [
    FO,
    JITTER,
    SHIMMER,
    SHIMMER_DB,
    SHIMMER_APQ5,
    SHIMMER_APQ11,
    HNR,
    NHR,
    RPDE,
    DFA,
    PPE,
    SPREAD1,
    SPREAD2,
];

/// Named descriptor values; keys are unique and carry no ordering meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Failures inside descriptor computation.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Sample rate must be non-zero")]
    ZeroSampleRate,
    #[error("Spectral analysis failed: {0}")]
    Spectral(String),
}

/// Compute every descriptor in [`FEATURE_NAMES`] for `waveform`.
///
/// Pure and deterministic; degenerate inputs (silence, very short clips)
/// produce defined values rather than errors.
pub fn extract_features(waveform: &Waveform) -> Result<FeatureVector, ExtractionError> {
    if waveform.sample_rate() == 0 {
        return Err(ExtractionError::ZeroSampleRate);
    }
    let samples = waveform.samples();
    let pitch = pitch::pitch_features(samples, waveform.sample_rate());
    let shimmer = time_domain::shimmer_features(samples);
    let spectral =
        frequency_domain::extract_spectral_features(samples).map_err(ExtractionError::Spectral)?;
    let spread = time_domain::spread_features(samples);

    let values = [
        (FO, pitch.fo_hz),
        (JITTER, pitch.jitter),
        (SHIMMER, shimmer.shimmer),
        (SHIMMER_DB, shimmer.shimmer_db),
        (SHIMMER_APQ5, shimmer.apq5),
        (SHIMMER_APQ11, shimmer.apq11),
        (HNR, spectral.hnr),
        (NHR, spectral.nhr),
        (RPDE, spectral.rpde),
        (DFA, time_domain::mean_abs_difference(samples)),
        (PPE, time_domain::amplitude_entropy(samples)),
        (SPREAD1, spread.std_dev),
        (SPREAD2, spread.excess_kurtosis),
    ];
    tracing::debug!(
        voiced_frames = pitch.voiced_frames,
        samples = samples.len(),
        "Extracted acoustic features"
    );
    Ok(values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect())
}
