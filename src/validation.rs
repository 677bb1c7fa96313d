//! Cheap guards that run before any expensive analysis.

use crate::analysis::audio::Waveform;
use crate::config::ValidationSettings;
use crate::error::InputError;

/// Rejects uploads too small or recordings too short to yield reliable features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformValidator {
    min_payload_bytes: usize,
    min_duration_seconds: f64,
}

impl Default for WaveformValidator {
    fn default() -> Self {
        Self::new(ValidationSettings::default())
    }
}

impl WaveformValidator {
    pub fn new(settings: ValidationSettings) -> Self {
        Self {
            min_payload_bytes: settings.min_payload_bytes,
            min_duration_seconds: settings.min_duration_seconds,
        }
    }

    /// Check the raw upload size; runs before decoding.
    pub fn check_payload(&self, len: usize) -> Result<(), InputError> {
        if len < self.min_payload_bytes {
            return Err(InputError::PayloadTooSmall {
                len,
                min: self.min_payload_bytes,
            });
        }
        Ok(())
    }

    /// Check the decoded sample count against the minimum duration.
    pub fn check_waveform(&self, waveform: &Waveform) -> Result<(), InputError> {
        if waveform.len() < self.min_samples(waveform.sample_rate()) {
            return Err(InputError::RecordingTooShort {
                seconds: f64::from(waveform.duration_seconds()),
                min_seconds: self.min_duration_seconds,
            });
        }
        Ok(())
    }

    fn min_samples(&self, sample_rate: u32) -> usize {
        (self.min_duration_seconds * f64::from(sample_rate)).ceil() as usize
    }
}
