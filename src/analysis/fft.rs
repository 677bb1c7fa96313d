use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

/// Periodic Hann window, the DFT-even form used for STFT analysis/resynthesis.
pub(crate) fn hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    let denom = length as f32;
    (0..length)
        .map(|n| 0.5_f32 * (1.0 - (2.0 * PI * n as f32 / denom).cos()))
        .collect()
}

/// Forward and inverse transforms planned once for a fixed length.
pub(crate) struct FftPlan {
    len: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl FftPlan {
    pub(crate) fn new(len: usize) -> Result<Self, String> {
        if len == 0 {
            return Err("FFT length must be non-zero".to_string());
        }
        let mut planner = FftPlanner::new();
        Ok(Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn forward(&self, buffer: &mut [Complex32]) -> Result<(), String> {
        self.check_len(buffer)?;
        self.forward.process(buffer);
        Ok(())
    }

    /// Unnormalized inverse transform; callers divide by `len`.
    pub(crate) fn inverse(&self, buffer: &mut [Complex32]) -> Result<(), String> {
        self.check_len(buffer)?;
        self.inverse.process(buffer);
        Ok(())
    }

    fn check_len(&self, buffer: &[Complex32]) -> Result<(), String> {
        if buffer.len() != self.len {
            return Err(format!(
                "FFT length mismatch: buffer {} plan {}",
                buffer.len(),
                self.len
            ));
        }
        Ok(())
    }
}
