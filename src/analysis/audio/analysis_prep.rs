use super::Waveform;
use super::decode::DecodedAudio;
use super::resample::resample_linear;
use crate::analysis::stats::sanitize_sample;

/// Average interleaved channels to mono and resample to `sample_rate`.
pub(super) fn to_canonical(decoded: &DecodedAudio, sample_rate: u32) -> Waveform {
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    let samples = resample_linear(&mono, decoded.sample_rate, sample_rate);
    Waveform::new(samples, sample_rate)
}

fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return samples.iter().copied().map(sanitize_sample).collect();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().copied().map(sanitize_sample).sum::<f32>() / channels as f32)
        .collect()
}
