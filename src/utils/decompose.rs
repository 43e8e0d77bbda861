//! Classical additive seasonal decomposition.
//!
//! Used to decide whether a material's price series carries enough annual
//! seasonality to justify a seasonal smoothing model.

/// Additive decomposition of a series into trend, seasonal and remainder.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Centered moving-average trend. NaN at the edges where the window
    /// does not fit.
    pub trend: Vec<f64>,
    /// Periodic seasonal component, normalized to sum to zero over one
    /// period.
    pub seasonal: Vec<f64>,
    /// Seasonal indices, one per position within the period.
    pub indices: Vec<f64>,
}

/// Decompose `values` additively with the given period.
///
/// Requires at least two full periods; returns None otherwise. The trend is
/// a centered moving average with half weights at the window ends for even
/// periods.
pub fn decompose_additive(values: &[f64], period: usize) -> Option<Decomposition> {
    let n = values.len();
    if period < 2 || n < 2 * period {
        return None;
    }

    let mut trend = vec![f64::NAN; n];
    if period % 2 == 0 {
        let half = period / 2;
        for t in half..n - half {
            let mut acc = 0.5 * values[t - half] + 0.5 * values[t + half];
            for k in (t - half + 1)..(t + half) {
                acc += values[k];
            }
            trend[t] = acc / period as f64;
        }
    } else {
        let half = period / 2;
        for t in half..n - half {
            let acc: f64 = values[t - half..=t + half].iter().sum();
            trend[t] = acc / period as f64;
        }
    }

    // Average the detrended values per position within the period, then
    // center the indices so they sum to zero.
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (t, (&v, &tr)) in values.iter().zip(trend.iter()).enumerate() {
        if tr.is_finite() {
            sums[t % period] += v - tr;
            counts[t % period] += 1;
        }
    }
    let mut indices: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let offset = indices.iter().sum::<f64>() / period as f64;
    for idx in &mut indices {
        *idx -= offset;
    }

    let seasonal: Vec<f64> = (0..n).map(|t| indices[t % period]).collect();

    Some(Decomposition {
        trend,
        seasonal,
        indices,
    })
}

/// Whether the seasonal component is large relative to the series level.
///
/// True when the mean absolute seasonal index exceeds 10% of the series
/// mean. Series shorter than two periods never qualify.
pub fn has_material_seasonality(values: &[f64], period: usize) -> bool {
    let Some(decomposition) = decompose_additive(values, period) else {
        return false;
    };
    let level = super::stats::mean(values);
    if !level.is_finite() || level <= 0.0 {
        return false;
    }
    let seasonal_magnitude = decomposition
        .indices
        .iter()
        .map(|s| s.abs())
        .sum::<f64>()
        / period as f64;
    seasonal_magnitude > 0.1 * level
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seasonal_series(cycles: usize, amplitude: f64) -> Vec<f64> {
        let mut values = Vec::new();
        for i in 0..cycles * 12 {
            let phase = (i % 12) as f64 / 12.0 * std::f64::consts::TAU;
            values.push(100.0 + amplitude * phase.sin());
        }
        values
    }

    #[test]
    fn needs_two_full_periods() {
        assert!(decompose_additive(&[1.0; 23], 12).is_none());
        assert!(decompose_additive(&[1.0; 24], 12).is_some());
    }

    #[test]
    fn indices_sum_to_zero() {
        let d = decompose_additive(&seasonal_series(3, 30.0), 12).unwrap();
        let sum: f64 = d.indices.iter().sum();
        assert_relative_eq!(sum, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_series_has_no_seasonality() {
        let values = vec![100.0; 36];
        assert!(!has_material_seasonality(&values, 12));
    }

    #[test]
    fn strong_annual_cycle_is_detected() {
        assert!(has_material_seasonality(&seasonal_series(3, 40.0), 12));
    }

    #[test]
    fn weak_cycle_is_ignored() {
        assert!(!has_material_seasonality(&seasonal_series(3, 2.0), 12));
    }

    #[test]
    fn trend_is_nan_at_edges() {
        let d = decompose_additive(&seasonal_series(2, 10.0), 12).unwrap();
        assert!(d.trend[0].is_nan());
        assert!(d.trend[5].is_nan());
        assert!(d.trend[6].is_finite());
        assert!(d.trend[d.trend.len() - 1].is_nan());
    }
}
