//! Forecast band triples: point forecast, lower bound, upper bound.

use crate::error::{Result, SurchargeError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point forecast with confidence bounds, one value per forecast step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBands {
    pub forecast: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ForecastBands {
    /// Build bands from three equally long series.
    pub fn new(forecast: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != forecast.len() || upper.len() != forecast.len() {
            return Err(SurchargeError::DimensionMismatch {
                expected: forecast.len(),
                got: lower.len().min(upper.len()),
            });
        }
        Ok(Self {
            forecast,
            lower,
            upper,
        })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }

    /// Floor the point forecast and lower bound at zero. A negative price or
    /// surcharge is physically meaningless; the upper bound is left alone.
    pub fn clamp_non_negative(&mut self) {
        for v in self.forecast.iter_mut().chain(self.lower.iter_mut()) {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
    }

    /// Check that every value in all three series is finite.
    pub fn is_finite(&self) -> bool {
        self.forecast
            .iter()
            .chain(self.lower.iter())
            .chain(self.upper.iter())
            .all(|v| v.is_finite())
    }
}

/// Forecast bands keyed by forecast period, as published in a report.
///
/// Each series serializes as a map from ISO date string to value, the shape
/// consumed by the charting/reporting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedBands {
    pub forecast: BTreeMap<NaiveDate, f64>,
    pub lower_bound: BTreeMap<NaiveDate, f64>,
    pub upper_bound: BTreeMap<NaiveDate, f64>,
}

impl DatedBands {
    /// Zip bands with their forecast periods.
    pub fn new(periods: &[NaiveDate], bands: &ForecastBands) -> Result<Self> {
        if periods.len() != bands.horizon() {
            return Err(SurchargeError::DimensionMismatch {
                expected: periods.len(),
                got: bands.horizon(),
            });
        }
        let zip = |values: &[f64]| -> BTreeMap<NaiveDate, f64> {
            periods.iter().copied().zip(values.iter().copied()).collect()
        };
        Ok(Self {
            forecast: zip(&bands.forecast),
            lower_bound: zip(&bands.lower),
            upper_bound: zip(&bands.upper),
        })
    }

    /// The period keys shared by all three series.
    pub fn periods(&self) -> Vec<NaiveDate> {
        self.forecast.keys().copied().collect()
    }

    /// Check that all three series cover exactly the same periods.
    pub fn periods_aligned(&self) -> bool {
        self.forecast.len() == self.lower_bound.len()
            && self.forecast.len() == self.upper_bound.len()
            && self
                .forecast
                .keys()
                .zip(self.lower_bound.keys())
                .zip(self.upper_bound.keys())
                .all(|((f, l), u)| f == l && f == u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn new_rejects_unequal_lengths() {
        let result = ForecastBands::new(vec![1.0, 2.0], vec![0.5], vec![1.5, 2.5]);
        assert!(matches!(
            result,
            Err(SurchargeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn clamp_floors_forecast_and_lower_only() {
        let mut bands =
            ForecastBands::new(vec![-1.0, 2.0], vec![-3.0, 0.5], vec![-0.5, 3.0]).unwrap();
        bands.clamp_non_negative();

        assert_eq!(bands.forecast, vec![0.0, 2.0]);
        assert_eq!(bands.lower, vec![0.0, 0.5]);
        // Upper bound is never clamped.
        assert_eq!(bands.upper, vec![-0.5, 3.0]);
    }

    #[test]
    fn is_finite_detects_nan() {
        let bands = ForecastBands::new(vec![1.0], vec![f64::NAN], vec![2.0]).unwrap();
        assert!(!bands.is_finite());
    }

    #[test]
    fn dated_bands_share_period_keys() {
        let periods = vec![d(2025, 1), d(2025, 2)];
        let bands = ForecastBands::new(vec![1.0, 2.0], vec![0.5, 1.5], vec![1.5, 2.5]).unwrap();
        let dated = DatedBands::new(&periods, &bands).unwrap();

        assert!(dated.periods_aligned());
        assert_eq!(dated.periods(), periods);
        assert_eq!(dated.forecast[&d(2025, 2)], 2.0);
    }

    #[test]
    fn dated_bands_serialize_with_iso_date_keys() {
        let periods = vec![d(2025, 3)];
        let bands = ForecastBands::new(vec![10.0], vec![8.0], vec![12.0]).unwrap();
        let dated = DatedBands::new(&periods, &bands).unwrap();

        let json = serde_json::to_string(&dated).unwrap();
        assert!(json.contains("\"2025-03-01\""));
    }

    #[test]
    fn dated_bands_length_mismatch_is_an_error() {
        let bands = ForecastBands::new(vec![1.0], vec![0.5], vec![1.5]).unwrap();
        assert!(DatedBands::new(&[d(2025, 1), d(2025, 2)], &bands).is_err());
    }
}
