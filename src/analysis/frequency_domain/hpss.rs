//! Median-filtering harmonic/percussive separation.
//!
//! Harmonic energy is smooth along time, percussive energy is smooth along
//! frequency. Each magnitude cell is median-filtered in both directions and
//! the two estimates become soft (power-2 Wiener) masks over the complex
//! spectrogram. Borders use half-sample symmetric reflection.

use super::stft::Spectrogram;

pub(super) const KERNEL_SIZE: usize = 31;
const MASK_POWER: i32 = 2;

/// Soft masks for the harmonic and percussive components, frame-major like the spectrogram.
pub(super) struct SeparationMasks {
    pub(super) harmonic: Vec<f32>,
    pub(super) percussive: Vec<f32>,
}

pub(super) fn separation_masks(spectrogram: &Spectrogram) -> SeparationMasks {
    let bins = spectrogram.bins();
    let frames = spectrogram.frames();
    let magnitude: Vec<f32> = spectrogram.cells().iter().map(|c| c.norm()).collect();

    let harmonic_estimate = median_filter_along_time(&magnitude, bins, frames, KERNEL_SIZE);
    let percussive_estimate = median_filter_along_frequency(&magnitude, bins, frames, KERNEL_SIZE);

    let mut harmonic = Vec::with_capacity(magnitude.len());
    let mut percussive = Vec::with_capacity(magnitude.len());
    for (&h, &p) in harmonic_estimate.iter().zip(&percussive_estimate) {
        let (mh, mp) = soft_masks(h, p);
        harmonic.push(mh);
        percussive.push(mp);
    }
    SeparationMasks {
        harmonic,
        percussive,
    }
}

/// Both masks are zero where both estimates vanish.
fn soft_masks(harmonic: f32, percussive: f32) -> (f32, f32) {
    let reference = harmonic.max(percussive);
    if reference < f32::MIN_POSITIVE {
        return (0.0, 0.0);
    }
    let h = (harmonic / reference).powi(MASK_POWER);
    let p = (percussive / reference).powi(MASK_POWER);
    let total = h + p;
    (h / total, p / total)
}

fn median_filter_along_time(values: &[f32], bins: usize, frames: usize, kernel: usize) -> Vec<f32> {
    let mut out = vec![0.0_f32; values.len()];
    let mut scratch = Vec::with_capacity(kernel);
    let half = (kernel / 2) as isize;
    for bin in 0..bins {
        for frame in 0..frames {
            scratch.clear();
            for offset in -half..=half {
                let t = reflect_index(frame as isize + offset, frames);
                scratch.push(values[t * bins + bin]);
            }
            out[frame * bins + bin] = median(&mut scratch);
        }
    }
    out
}

fn median_filter_along_frequency(
    values: &[f32],
    bins: usize,
    frames: usize,
    kernel: usize,
) -> Vec<f32> {
    let mut out = vec![0.0_f32; values.len()];
    let mut scratch = Vec::with_capacity(kernel);
    let half = (kernel / 2) as isize;
    for frame in 0..frames {
        let row = &values[frame * bins..(frame + 1) * bins];
        for bin in 0..bins {
            scratch.clear();
            for offset in -half..=half {
                scratch.push(row[reflect_index(bin as isize + offset, bins)]);
            }
            out[frame * bins + bin] = median(&mut scratch);
        }
    }
    out
}

/// Half-sample symmetric reflection (`d c b a | a b c d | d c b a`), repeated as needed.
fn reflect_index(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let folded = index.rem_euclid(period);
    if folded < len {
        folded as usize
    } else {
        (period - 1 - folded) as usize
    }
}

fn median(values: &mut [f32]) -> f32 {
    let mid = values.len() / 2;
    let (_, value, _) = values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    *value
}
