use rustfft::num_complex::Complex32;

use crate::analysis::fft::FftPlan;
use crate::analysis::stats::sanitize_sample;

/// One-sided complex spectrogram stored frame-major.
#[derive(Debug, Clone)]
pub(super) struct Spectrogram {
    bins: usize,
    frames: usize,
    data: Vec<Complex32>,
}

impl Spectrogram {
    pub(super) fn bins(&self) -> usize {
        self.bins
    }

    pub(super) fn frames(&self) -> usize {
        self.frames
    }

    pub(super) fn frame(&self, index: usize) -> &[Complex32] {
        &self.data[index * self.bins..(index + 1) * self.bins]
    }

    pub(super) fn cells(&self) -> &[Complex32] {
        &self.data
    }

    /// Same shape, each cell multiplied by the matching real-valued mask entry.
    pub(super) fn masked(&self, mask: &[f32]) -> Self {
        let data = self
            .data
            .iter()
            .zip(mask)
            .map(|(&cell, &m)| cell * m)
            .collect();
        Self {
            bins: self.bins,
            frames: self.frames,
            data,
        }
    }
}

/// Centered STFT with zero padding of `frame_size / 2` on both sides.
pub(super) fn stft(
    samples: &[f32],
    plan: &FftPlan,
    window: &[f32],
    hop_size: usize,
) -> Result<Spectrogram, String> {
    let frame_size = plan.len();
    let hop_size = hop_size.max(1);
    let bins = frame_size / 2 + 1;
    let frames = 1 + samples.len() / hop_size;
    let pad = frame_size / 2;
    let mut buffer = vec![Complex32::default(); frame_size];
    let mut data = Vec::with_capacity(frames * bins);
    for frame in 0..frames {
        let start = frame * hop_size;
        for (i, cell) in buffer.iter_mut().enumerate() {
            let sample = (start + i)
                .checked_sub(pad)
                .and_then(|idx| samples.get(idx))
                .copied()
                .map(sanitize_sample)
                .unwrap_or(0.0);
            *cell = Complex32::new(sample * window[i], 0.0);
        }
        plan.forward(&mut buffer)?;
        data.extend_from_slice(&buffer[..bins]);
    }
    Ok(Spectrogram { bins, frames, data })
}

/// Inverse of [`stft`]: weighted overlap-add trimmed back to `length` samples.
pub(super) fn istft(
    spectrogram: &Spectrogram,
    plan: &FftPlan,
    window: &[f32],
    hop_size: usize,
    length: usize,
) -> Result<Vec<f32>, String> {
    let frame_size = plan.len();
    let hop_size = hop_size.max(1);
    if spectrogram.bins != frame_size / 2 + 1 {
        return Err(format!(
            "Spectrogram has {} bins, expected {}",
            spectrogram.bins,
            frame_size / 2 + 1
        ));
    }
    let total = frame_size + hop_size * spectrogram.frames.saturating_sub(1);
    let mut signal = vec![0.0_f32; total];
    let mut window_sum = vec![0.0_f32; total];
    let mut buffer = vec![Complex32::default(); frame_size];
    let scale = 1.0 / frame_size as f32;
    for frame in 0..spectrogram.frames {
        fill_hermitian(&mut buffer, spectrogram.frame(frame));
        plan.inverse(&mut buffer)?;
        let offset = frame * hop_size;
        for (i, cell) in buffer.iter().enumerate() {
            signal[offset + i] += cell.re * scale * window[i];
            window_sum[offset + i] += window[i] * window[i];
        }
    }
    for (value, &norm) in signal.iter_mut().zip(&window_sum) {
        if norm > f32::MIN_POSITIVE {
            *value /= norm;
        }
    }

    let start = frame_size / 2;
    let mut out: Vec<f32> = signal.into_iter().skip(start).take(length).collect();
    out.resize(length, 0.0);
    Ok(out)
}

/// Expand one-sided bins into a full conjugate-symmetric spectrum.
fn fill_hermitian(buffer: &mut [Complex32], half: &[Complex32]) {
    let n = buffer.len();
    for (k, cell) in buffer.iter_mut().enumerate() {
        *cell = if k < half.len() {
            half[k]
        } else {
            half[n - k].conj()
        };
    }
    // DC and Nyquist must be real for a real-valued inverse.
    buffer[0].im = 0.0;
    if n % 2 == 0 {
        buffer[n / 2].im = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fft::hann_window;

    #[test]
    fn frame_count_follows_centered_framing() {
        let plan = FftPlan::new(64).unwrap();
        let window = hann_window(64);
        let spec = stft(&vec![0.1; 100], &plan, &window, 16).unwrap();
        assert_eq!(spec.frames(), 1 + 100 / 16);
        assert_eq!(spec.bins(), 33);
        assert_eq!(spec.cells().len(), spec.frames() * spec.bins());
    }

    #[test]
    fn round_trip_reconstructs_signal() {
        let plan = FftPlan::new(256).unwrap();
        let window = hann_window(256);
        let samples: Vec<f32> = (0..2000)
            .map(|i| (i as f32 * 0.07).sin() * 0.4 + (i as f32 * 0.31).cos() * 0.2)
            .collect();
        let spec = stft(&samples, &plan, &window, 64).unwrap();
        let rebuilt = istft(&spec, &plan, &window, 64, samples.len()).unwrap();
        assert_eq!(rebuilt.len(), samples.len());
        for (a, b) in rebuilt.iter().zip(&samples) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn zero_mask_silences_output() {
        let plan = FftPlan::new(64).unwrap();
        let window = hann_window(64);
        let spec = stft(&vec![0.5; 300], &plan, &window, 16).unwrap();
        let silent = spec.masked(&vec![0.0; spec.cells().len()]);
        let out = istft(&silent, &plan, &window, 16, 300).unwrap();
        assert!(out.iter().all(|v| v.abs() < 1e-9));
    }
}
