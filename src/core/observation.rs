//! Monthly surcharge observations and the price history they form.

use crate::composite::compute_composite;
use crate::core::material::{Composition, Material};
use crate::core::series::month_start;
use crate::error::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One historical monthly record: raw-material prices, their weighted
/// contributions, and the total composite surcharge.
///
/// Observations are immutable once recorded. The invariant
/// `contribution = weight% * price / 100` (and `total = sum of
/// contributions`) holds by construction via [`Observation::from_prices`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    period: NaiveDate,
    prices: BTreeMap<Material, f64>,
    contributions: BTreeMap<Material, f64>,
    total_surcharge: f64,
}

impl Observation {
    /// Record a month from raw prices, deriving contributions and the total
    /// through the composite calculator.
    pub fn from_prices(
        period: NaiveDate,
        prices: BTreeMap<Material, f64>,
        composition: &Composition,
    ) -> Result<Self> {
        let breakdown = compute_composite(&prices, composition)?;
        Ok(Self {
            period: month_start(period),
            prices,
            contributions: breakdown.contributions,
            total_surcharge: breakdown.total,
        })
    }

    /// Reconstruct an observation from already-derived parts (history store).
    pub fn from_parts(
        period: NaiveDate,
        prices: BTreeMap<Material, f64>,
        contributions: BTreeMap<Material, f64>,
        total_surcharge: f64,
    ) -> Self {
        Self {
            period: month_start(period),
            prices,
            contributions,
            total_surcharge,
        }
    }

    /// The calendar month this observation covers (month-start date).
    pub fn period(&self) -> NaiveDate {
        self.period
    }

    /// Price for one material, if recorded.
    pub fn price(&self, material: Material) -> Option<f64> {
        self.prices.get(&material).copied()
    }

    /// Weighted contribution for one material, if recorded.
    pub fn contribution(&self, material: Material) -> Option<f64> {
        self.contributions.get(&material).copied()
    }

    /// Total composite surcharge for the month.
    pub fn total_surcharge(&self) -> f64 {
        self.total_surcharge
    }
}

/// Ordered collection of monthly observations.
///
/// The history itself does not enforce unique months; appending a month at
/// most once per collection cycle is the caller's responsibility. The
/// preparer surfaces duplicates when building per-material series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    observations: Vec<Observation>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Append one monthly observation.
    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    /// Observations sorted ascending by period (copy; the history order is
    /// left untouched).
    pub fn sorted_by_period(&self) -> Vec<Observation> {
        let mut sorted = self.observations.clone();
        sorted.sort_by_key(Observation::period);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn prices(cr: f64, mo: f64, ti: f64) -> BTreeMap<Material, f64> {
        let mut p = BTreeMap::new();
        p.insert(Material::Chromium, cr);
        p.insert(Material::Molybdenum, mo);
        p.insert(Material::Titanium, ti);
        p
    }

    #[test]
    fn from_prices_derives_contributions_and_total() {
        let obs = Observation::from_prices(
            d(2024, 5),
            prices(12800.0, 36500.0, 7050.0),
            &Composition::default(),
        )
        .unwrap();

        assert_relative_eq!(
            obs.contribution(Material::Chromium).unwrap(),
            2368.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(obs.total_surcharge(), 3162.7, epsilon = 1e-9);
    }

    #[test]
    fn from_prices_normalizes_to_month_start() {
        let obs = Observation::from_prices(
            NaiveDate::from_ymd_opt(2024, 5, 23).unwrap(),
            prices(1.0, 1.0, 1.0),
            &Composition::default(),
        )
        .unwrap();
        assert_eq!(obs.period(), d(2024, 5));
    }

    #[test]
    fn sorted_by_period_orders_ascending() {
        let composition = Composition::default();
        let mut history = PriceHistory::new();
        for month in [3u32, 1, 2] {
            history.push(
                Observation::from_prices(d(2024, month), prices(1.0, 1.0, 1.0), &composition)
                    .unwrap(),
            );
        }

        let sorted = history.sorted_by_period();
        let periods: Vec<NaiveDate> = sorted.iter().map(Observation::period).collect();
        assert_eq!(periods, vec![d(2024, 1), d(2024, 2), d(2024, 3)]);
        // Original insertion order is preserved.
        assert_eq!(history.iter().next().unwrap().period(), d(2024, 3));
    }
}
