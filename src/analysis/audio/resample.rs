/// Linear-interpolation resampler; output length is `round(duration * output_rate)`.
pub(super) fn resample_linear(samples: &[f32], input_rate: u32, output_rate: u32) -> Vec<f32> {
    let input_rate = input_rate.max(1);
    let output_rate = output_rate.max(1);
    if samples.is_empty() || input_rate == output_rate {
        return samples.to_vec();
    }
    let ratio = input_rate as f64 / output_rate as f64;
    let duration_seconds = samples.len() as f64 / input_rate as f64;
    let out_len = (duration_seconds * output_rate as f64).round().max(1.0) as usize;
    (0..out_len)
        .map(|i| lerp_sample(samples, i as f64 * ratio))
        .collect()
}

fn lerp_sample(samples: &[f32], pos: f64) -> f32 {
    let idx0 = (pos.floor().max(0.0) as usize).min(samples.len() - 1);
    let frac = (pos - idx0 as f64).clamp(0.0, 1.0) as f32;
    let idx1 = (idx0 + 1).min(samples.len() - 1);
    let a = samples[idx0];
    let b = samples[idx1];
    a + (b - a) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsampling_interpolates_ramp() {
        let out = resample_linear(&[0.0_f32, 1.0], 1, 2);
        assert_eq!(out.len(), 4);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn matching_rates_pass_through() {
        let input = vec![0.1_f32, -0.2, 0.3];
        assert_eq!(resample_linear(&input, 22_050, 22_050), input);
        assert!(resample_linear(&[], 8_000, 22_050).is_empty());
    }

    #[test]
    fn downsampling_halves_length() {
        let input: Vec<f32> = (0..1000).map(|i| i as f32).collect();
        let out = resample_linear(&input, 44_100, 22_050);
        assert_eq!(out.len(), 500);
        assert!((out[10] - 20.0).abs() < 1e-4);
    }
}
