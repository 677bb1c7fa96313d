//! Amplitude-domain descriptors: shimmer family, DFA, PPE and spread measures.

use super::stats::{EPSILON, mean, mean_abs_step, sanitize_sample, shannon_entropy};

pub(crate) const RMS_FRAME_LENGTH: usize = 2048;
pub(crate) const RMS_HOP_LENGTH: usize = 512;

const APQ5_SCALE: f64 = 0.8;
const APQ11_SCALE: f64 = 0.6;

/// Frame-to-frame amplitude perturbation measures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ShimmerFeatures {
    pub(crate) shimmer: f64,
    pub(crate) shimmer_db: f64,
    /// Linear stand-in for the 5-point amplitude perturbation quotient.
    pub(crate) apq5: f64,
    /// Linear stand-in for the 11-point amplitude perturbation quotient.
    pub(crate) apq11: f64,
}

/// Standard deviation and excess kurtosis of the raw waveform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct SpreadFeatures {
    pub(crate) std_dev: f64,
    pub(crate) excess_kurtosis: f64,
}

pub(crate) fn shimmer_features(samples: &[f32]) -> ShimmerFeatures {
    let envelope = rms_frames(samples, RMS_FRAME_LENGTH, RMS_HOP_LENGTH);
    // No frames to compare, or no amplitude at all: the whole family is zero.
    if envelope.len() < 2 || envelope.iter().all(|&rms| rms == 0.0) {
        return ShimmerFeatures::default();
    }
    let shimmer = mean_abs_step(&envelope) / (mean(&envelope) + EPSILON);
    ShimmerFeatures {
        shimmer,
        shimmer_db: 20.0 * (shimmer + EPSILON).log10(),
        apq5: shimmer * APQ5_SCALE,
        apq11: shimmer * APQ11_SCALE,
    }
}

/// Short-time RMS over centered, zero-padded frames (`1 + len / hop` frames).
pub(crate) fn rms_frames(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    let frame_length = frame_length.max(1);
    let hop_length = hop_length.max(1);
    let mut prefix = Vec::with_capacity(samples.len() + 1);
    prefix.push(0.0_f64);
    let mut acc = 0.0_f64;
    for &sample in samples {
        let sample = sanitize_sample(sample) as f64;
        acc += sample * sample;
        prefix.push(acc);
    }

    let pad = frame_length / 2;
    let frame_count = 1 + samples.len() / hop_length;
    (0..frame_count)
        .map(|frame| {
            // Frame covers padded[frame * hop, frame * hop + frame_length).
            let start = (frame * hop_length).saturating_sub(pad).min(samples.len());
            let end = (frame * hop_length + frame_length)
                .saturating_sub(pad)
                .min(samples.len());
            let energy = (prefix[end] - prefix[start]).max(0.0);
            (energy / frame_length as f64).sqrt()
        })
        .collect()
}

/// Mean absolute first difference of the waveform, used as the DFA descriptor.
pub(crate) fn mean_abs_difference(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let total: f64 = samples
        .windows(2)
        .map(|pair| (sanitize_sample(pair[1]) as f64 - sanitize_sample(pair[0]) as f64).abs())
        .sum();
    total / (samples.len() - 1) as f64
}

/// Entropy of absolute sample amplitudes, used as the PPE descriptor.
pub(crate) fn amplitude_entropy(samples: &[f32]) -> f64 {
    shannon_entropy(
        samples
            .iter()
            .map(|&sample| (sanitize_sample(sample) as f64).abs() + EPSILON),
    )
}

pub(crate) fn spread_features(samples: &[f32]) -> SpreadFeatures {
    if samples.is_empty() {
        return SpreadFeatures::default();
    }
    let n = samples.len() as f64;
    let mean = samples
        .iter()
        .map(|&s| sanitize_sample(s) as f64)
        .sum::<f64>()
        / n;
    let mut m2 = 0.0_f64;
    let mut m4 = 0.0_f64;
    for &sample in samples {
        let d = sanitize_sample(sample) as f64 - mean;
        let d2 = d * d;
        m2 += d2;
        m4 += d2 * d2;
    }
    m2 /= n;
    m4 /= n;
    let excess_kurtosis = if m2 > 0.0 { m4 / (m2 * m2) - 3.0 } else { 0.0 };
    SpreadFeatures {
        std_dev: m2.sqrt(),
        excess_kurtosis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::audio::CANONICAL_SAMPLE_RATE;

    #[test]
    fn rms_frame_count_follows_centered_framing() {
        assert_eq!(rms_frames(&[], 2048, 512).len(), 1);
        assert_eq!(rms_frames(&vec![0.0; 511], 2048, 512).len(), 1);
        assert_eq!(rms_frames(&vec![0.0; 512], 2048, 512).len(), 2);
        assert_eq!(rms_frames(&vec![0.0; 5000], 2048, 512).len(), 10);
    }

    #[test]
    fn constant_signal_interior_rms_matches_level() {
        let samples = vec![0.5_f32; 8192];
        let frames = rms_frames(&samples, 2048, 512);
        // Interior frames are fully covered by signal.
        assert!((frames[4] - 0.5).abs() < 1e-9);
        // The first frame is half padding.
        assert!((frames[0] - (0.125_f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn short_input_yields_zero_shimmer_family() {
        let feats = shimmer_features(&vec![0.3_f32; 100]);
        assert_eq!(feats, ShimmerFeatures::default());
    }

    #[test]
    fn steady_tone_has_small_shimmer_and_scaled_quotients() {
        let sr = CANONICAL_SAMPLE_RATE as f32;
        let samples: Vec<f32> = (0..sr as usize * 2)
            .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sr).sin() * 0.5)
            .collect();
        let feats = shimmer_features(&samples);
        assert!(feats.shimmer > 0.0 && feats.shimmer < 0.1, "{}", feats.shimmer);
        assert!((feats.apq5 - feats.shimmer * 0.8).abs() < 1e-12);
        assert!((feats.apq11 - feats.shimmer * 0.6).abs() < 1e-12);
        assert!((feats.shimmer_db - 20.0 * (feats.shimmer + 1e-6).log10()).abs() < 1e-12);
    }

    #[test]
    fn spread_of_symmetric_two_level_signal() {
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let spread = spread_features(&samples);
        assert!((spread.std_dev - 1.0).abs() < 1e-12);
        // Two-point distribution: kurtosis 1, excess -2.
        assert!((spread.excess_kurtosis + 2.0).abs() < 1e-12);
    }

    #[test]
    fn silence_has_defined_amplitude_descriptors() {
        let samples = vec![0.0_f32; 4096];
        assert_eq!(shimmer_features(&samples), ShimmerFeatures::default());
        assert_eq!(mean_abs_difference(&samples), 0.0);
        assert_eq!(spread_features(&samples), SpreadFeatures::default());
        let ppe = amplitude_entropy(&samples);
        assert!((ppe - (4096.0_f64).ln()).abs() < 1e-9);
    }

    #[test]
    fn mean_abs_difference_of_alternating_signal() {
        let samples = [1.0_f32, -1.0, 1.0, -1.0];
        assert!((mean_abs_difference(&samples) - 2.0).abs() < 1e-12);
        assert_eq!(mean_abs_difference(&[0.7]), 0.0);
    }
}
