//! Canonical waveform type and the decode path that produces it.

mod analysis_prep;
mod decode;
mod resample;

use std::path::Path;

pub(crate) use decode::{DecodedAudio, decode_media};

/// Sample rate every waveform is converted to before feature extraction.
pub const CANONICAL_SAMPLE_RATE: u32 = 22_050;

/// Mono amplitude samples at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode an audio file and convert it to a mono waveform at [`CANONICAL_SAMPLE_RATE`].
///
/// WAV files go through `hound`; anything `hound` rejects (and other
/// containers) falls back to `symphonia`.
pub fn load_canonical_waveform(path: &Path) -> Result<Waveform, String> {
    let decoded = decode::decode_file(path)?;
    Ok(analysis_prep::to_canonical(&decoded, CANONICAL_SAMPLE_RATE))
}
