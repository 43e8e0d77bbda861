//! Time-series preparation.
//!
//! Turns raw price history into one clean monthly series per material,
//! gating on the minimum history needed to fit anything useful.

use crate::core::{Material, MonthlySeries, PriceHistory};
use crate::error::{Result, SurchargeError};
use std::collections::BTreeMap;

/// Fewest monthly observations required before any model is attempted.
pub const MIN_OBSERVATIONS: usize = 6;

/// Build a per-material monthly price series from recorded history.
///
/// Observations are sorted by period and each material's prices are aligned
/// on month starts. History shorter than [`MIN_OBSERVATIONS`] is rejected so
/// callers can report the shortfall instead of fitting on noise.
pub fn prepare(history: &PriceHistory) -> Result<BTreeMap<Material, MonthlySeries>> {
    let got = history.len();
    if got < MIN_OBSERVATIONS {
        return Err(SurchargeError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got,
        });
    }

    let sorted = history.sorted_by_period();
    let mut series = BTreeMap::new();

    for material in Material::ALL {
        let pairs: Vec<_> = sorted
            .iter()
            .filter_map(|obs| obs.price(material).map(|p| (obs.period(), p)))
            .collect();
        if pairs.len() < MIN_OBSERVATIONS {
            return Err(SurchargeError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: pairs.len(),
            });
        }
        series.insert(material, MonthlySeries::from_pairs(pairs)?);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Composition, Observation};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn history(months: usize) -> PriceHistory {
        let composition = Composition::default();
        let mut observations = Vec::new();
        for i in 0..months {
            let year = 2024 + (i / 12) as i32;
            let month = (i % 12) as u32 + 1;
            let period = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let mut prices = BTreeMap::new();
            prices.insert(Material::Chromium, 12000.0 + 50.0 * i as f64);
            prices.insert(Material::Molybdenum, 36000.0 + 100.0 * i as f64);
            prices.insert(Material::Titanium, 7000.0 + 10.0 * i as f64);
            observations.push(Observation::from_prices(period, prices, &composition).unwrap());
        }
        PriceHistory::from_observations(observations)
    }

    #[test]
    fn builds_sorted_series_per_material() {
        let series = prepare(&history(8)).unwrap();
        assert_eq!(series.len(), 3);
        for s in series.values() {
            assert_eq!(s.len(), 8);
            let periods = s.periods();
            assert!(periods.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(series[&Material::Chromium].values()[0], 12000.0);
    }

    #[test]
    fn short_history_is_rejected_with_counts() {
        let err = prepare(&history(5)).unwrap_err();
        assert!(matches!(
            err,
            SurchargeError::InsufficientData { needed: 6, got: 5 }
        ));
    }

    #[test]
    fn out_of_order_observations_are_sorted() {
        let composition = Composition::default();
        let mut observations = Vec::new();
        for month in [4u32, 1, 6, 2, 5, 3] {
            let period = NaiveDate::from_ymd_opt(2025, month, 1).unwrap();
            let mut prices = BTreeMap::new();
            prices.insert(Material::Chromium, 12000.0 + month as f64);
            prices.insert(Material::Molybdenum, 36000.0);
            prices.insert(Material::Titanium, 7000.0);
            observations.push(Observation::from_prices(period, prices, &composition).unwrap());
        }
        let series = prepare(&PriceHistory::from_observations(observations)).unwrap();
        let cr = &series[&Material::Chromium];
        assert_eq!(
            cr.values(),
            &[12001.0, 12002.0, 12003.0, 12004.0, 12005.0, 12006.0]
        );
    }
}
