//! Forecast accuracy metrics.

/// Mean absolute error. NaN when the slices differ in length or are empty.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mae_basic() {
        let actual = [3.0, -0.5, 2.0, 7.0];
        let predicted = [2.5, 0.0, 2.0, 8.0];
        assert_relative_eq!(mae(&actual, &predicted), 0.5);
    }

    #[test]
    fn length_mismatch_is_nan() {
        assert!(mae(&[1.0, 2.0], &[1.0]).is_nan());
        assert!(mae(&[], &[]).is_nan());
    }
}
