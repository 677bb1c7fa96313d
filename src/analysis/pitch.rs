//! Fundamental frequency tracking and jitter.
//!
//! Uses a YIN-style lag-domain estimator: for each centered frame the
//! squared-difference function is normalized by its cumulative mean, and the
//! first local minimum under [`TROUGH_THRESHOLD`] inside the voice lag range
//! is refined with a parabola. Frames without such a trough are treated as
//! unvoiced and dropped rather than forced to the global minimum.

use super::stats::{EPSILON, mean, mean_abs_step, sanitize_sample};

/// Lowest fundamental considered part of the voice range.
pub(crate) const PITCH_MIN_HZ: f64 = 75.0;
/// Highest fundamental considered part of the voice range.
pub(crate) const PITCH_MAX_HZ: f64 = 600.0;

const FRAME_LENGTH: usize = 2048;
const HOP_LENGTH: usize = 512;
const WINDOW_LENGTH: usize = FRAME_LENGTH / 2;
const TROUGH_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct PitchFeatures {
    /// Mean of voiced per-frame estimates in Hz, 0 when nothing was voiced.
    pub(crate) fo_hz: f64,
    pub(crate) jitter: f64,
    pub(crate) voiced_frames: usize,
}

pub(crate) fn pitch_features(samples: &[f32], sample_rate: u32) -> PitchFeatures {
    let track = track_pitch(samples, sample_rate);
    let fo_hz = mean(&track);
    let jitter = if track.len() > 1 {
        mean_abs_step(&track) / (fo_hz + EPSILON)
    } else {
        0.0
    };
    PitchFeatures {
        fo_hz,
        jitter,
        voiced_frames: track.len(),
    }
}

/// Per-frame fundamental estimates for voiced frames only, in frame order.
pub(crate) fn track_pitch(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    let Some(lags) = LagRange::for_rate(sample_rate) else {
        return Vec::new();
    };
    let frame_count = 1 + samples.len() / HOP_LENGTH;
    let mut frame = vec![0.0_f64; FRAME_LENGTH];
    let mut difference = vec![0.0_f64; lags.max + 1];
    let mut normalized = vec![1.0_f64; lags.max + 1];
    let mut track = Vec::new();
    for index in 0..frame_count {
        fill_centered_frame(&mut frame, samples, index * HOP_LENGTH);
        difference_function(&frame, &mut difference);
        cumulative_mean_normalize(&difference, &mut normalized);
        let Some(period) = first_trough(&normalized, &lags) else {
            continue;
        };
        let hz = sample_rate as f64 / period;
        if (PITCH_MIN_HZ..=PITCH_MAX_HZ).contains(&hz) {
            track.push(hz);
        }
    }
    track
}

/// Admissible lag window in samples for the voice range at one sample rate.
struct LagRange {
    min: usize,
    max: usize,
}

impl LagRange {
    fn for_rate(sample_rate: u32) -> Option<Self> {
        if sample_rate == 0 {
            return None;
        }
        let sr = sample_rate as f64;
        let min = (sr / PITCH_MAX_HZ).floor().max(1.0) as usize;
        let max = ((sr / PITCH_MIN_HZ).ceil() as usize).min(FRAME_LENGTH - WINDOW_LENGTH - 1);
        (min + 1 < max).then_some(Self { min, max })
    }
}

/// Copy `FRAME_LENGTH` samples centered on `center`, zero outside the signal.
fn fill_centered_frame(frame: &mut [f64], samples: &[f32], center: usize) {
    let offset = FRAME_LENGTH / 2;
    for (i, cell) in frame.iter_mut().enumerate() {
        *cell = (center + i)
            .checked_sub(offset)
            .and_then(|idx| samples.get(idx))
            .map(|&s| sanitize_sample(s) as f64)
            .unwrap_or(0.0);
    }
}

fn difference_function(frame: &[f64], out: &mut [f64]) {
    let window = &frame[..WINDOW_LENGTH];
    for (lag, cell) in out.iter_mut().enumerate() {
        let shifted = &frame[lag..lag + WINDOW_LENGTH];
        *cell = window
            .iter()
            .zip(shifted)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
    }
}

fn cumulative_mean_normalize(difference: &[f64], out: &mut [f64]) {
    out[0] = 1.0;
    let mut running = 0.0_f64;
    for lag in 1..difference.len() {
        running += difference[lag];
        out[lag] = if running > f64::MIN_POSITIVE {
            difference[lag] * lag as f64 / running
        } else {
            1.0
        };
    }
}

/// Fractional period of the first thresholded local minimum within the lag range.
fn first_trough(normalized: &[f64], lags: &LagRange) -> Option<f64> {
    let range = &normalized[lags.min..=lags.max];
    let last = range.len() - 1;
    let is_local_min = |i: usize| {
        if i == 0 {
            return range[0] < range[1];
        }
        range[i] < range[i - 1] && (i == last || range[i] <= range[i + 1])
    };
    let trough = (0..range.len()).find(|&i| range[i] < TROUGH_THRESHOLD && is_local_min(i))?;
    let shift = if trough == 0 || trough == last {
        0.0
    } else {
        parabolic_shift(range[trough - 1], range[trough], range[trough + 1])
    };
    Some((lags.min + trough) as f64 + shift)
}

fn parabolic_shift(left: f64, center: f64, right: f64) -> f64 {
    let a = (left + right - 2.0 * center) / 2.0;
    let b = (right - left) / 2.0;
    if a == 0.0 || b.abs() >= 2.0 * a.abs() {
        return 0.0;
    }
    -b / (2.0 * a)
}
