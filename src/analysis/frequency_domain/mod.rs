//! Spectral descriptors: harmonic-to-noise ratio (via HPSS) and RPDE.

mod hpss;
mod stft;

use rustfft::num_complex::Complex32;

use super::fft::{FftPlan, hann_window};
use super::stats::{EPSILON, shannon_entropy};

pub(crate) const STFT_FRAME_SIZE: usize = 2048;
pub(crate) const STFT_HOP_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct SpectralFeatures {
    pub(crate) hnr: f64,
    pub(crate) nhr: f64,
    pub(crate) rpde: f64,
}

/// Compute HNR, NHR and RPDE from one shared STFT of the waveform.
pub(crate) fn extract_spectral_features(samples: &[f32]) -> Result<SpectralFeatures, String> {
    let plan = FftPlan::new(STFT_FRAME_SIZE)?;
    let window = hann_window(STFT_FRAME_SIZE);
    let spectrogram = stft::stft(samples, &plan, &window, STFT_HOP_SIZE)?;

    let masks = hpss::separation_masks(&spectrogram);
    let harmonic = stft::istft(
        &spectrogram.masked(&masks.harmonic),
        &plan,
        &window,
        STFT_HOP_SIZE,
        samples.len(),
    )?;
    let percussive = stft::istft(
        &spectrogram.masked(&masks.percussive),
        &plan,
        &window,
        STFT_HOP_SIZE,
        samples.len(),
    )?;

    let hnr = signed_mean(&harmonic) / (signed_mean(&percussive) + EPSILON);
    Ok(SpectralFeatures {
        hnr,
        nhr: 1.0 / (hnr + EPSILON),
        rpde: frame_mean_entropy(&spectrogram),
    })
}

/// Entropy over frames of the magnitude of each frame's bin-averaged complex spectrum.
fn frame_mean_entropy(spectrogram: &stft::Spectrogram) -> f64 {
    let bins = spectrogram.bins() as f32;
    let weights: Vec<f64> = (0..spectrogram.frames())
        .map(|frame| {
            let sum: Complex32 = spectrogram.frame(frame).iter().sum();
            (sum / bins).norm() as f64 + EPSILON
        })
        .collect();
    shannon_entropy(weights.iter().copied())
}

fn signed_mean(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64
}
