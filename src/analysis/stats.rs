//! Small numeric reductions shared by the descriptor passes.

/// Epsilon used by every ratio, log and entropy guard in the descriptor set.
pub(crate) const EPSILON: f64 = 1e-6;

pub(crate) fn sanitize_sample(sample: f32) -> f32 {
    if sample.is_finite() { sample } else { 0.0 }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean absolute difference between consecutive values; 0 for fewer than two values.
pub(crate) fn mean_abs_step(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let total: f64 = values.windows(2).map(|pair| (pair[1] - pair[0]).abs()).sum();
    total / (values.len() - 1) as f64
}

/// Shannon entropy (nats) of non-negative weights normalized to a distribution.
pub(crate) fn shannon_entropy(weights: impl IntoIterator<Item = f64> + Clone) -> f64 {
    let total: f64 = weights.clone().into_iter().map(|w| w.max(0.0)).sum();
    if !(total > 0.0) || !total.is_finite() {
        return 0.0;
    }
    weights
        .into_iter()
        .map(|w| w.max(0.0) / total)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_of_uniform_weights_is_ln_n() {
        let weights = vec![2.0_f64; 8];
        let h = shannon_entropy(weights.iter().copied());
        assert!((h - 8.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn entropy_of_point_mass_is_zero() {
        let h = shannon_entropy([0.0, 5.0, 0.0]);
        assert!(h.abs() < 1e-12);
        assert_eq!(shannon_entropy(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn mean_abs_step_handles_short_input() {
        assert_eq!(mean_abs_step(&[]), 0.0);
        assert_eq!(mean_abs_step(&[3.0]), 0.0);
        assert!((mean_abs_step(&[1.0, 3.0, 2.0]) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn non_finite_samples_become_silence() {
        assert_eq!(sanitize_sample(f32::NAN), 0.0);
        assert_eq!(sanitize_sample(f32::INFINITY), 0.0);
        assert_eq!(sanitize_sample(0.25), 0.25);
    }
}
