//! Forecast run orchestration.
//!
//! One run loads history, fits and selects a model per material, extends
//! each material's bands over the coming months, and derives the composite
//! surcharge bands from them. Runs are all-or-nothing: a material without a
//! viable model aborts the run so the composite is never built from a
//! partial set.

use crate::composite::compute_composite;
use crate::core::{Composition, DatedBands, Material, PriceHistory, months_after};
use crate::error::{Result, SurchargeError};
use crate::prepare::{self, MIN_OBSERVATIONS};
use crate::selection::select_and_forecast;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Knobs for a forecast run. Defaults match the published monthly cycle.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Months to forecast past the last observation.
    pub horizon: usize,
    /// Two-sided confidence level for the bands.
    pub confidence: f64,
    /// Alloy composition used for the composite surcharge.
    pub composition: Composition,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 6,
            confidence: 0.95,
            composition: Composition::default(),
        }
    }
}

/// Why a run produced no forecast. Not an error: new deployments sit in
/// this state until enough history accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    InsufficientHistory { got: usize },
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::InsufficientHistory { got } => write!(
                f,
                "insufficient history: {got} of {MIN_OBSERVATIONS} required observations"
            ),
        }
    }
}

/// Result of a forecast run: a full report, or a stated reason there is
/// none. Callers cannot mistake absence for an empty forecast.
#[derive(Debug, Clone)]
pub enum ForecastOutcome {
    Ready(ForecastReport),
    Unavailable(UnavailableReason),
}

impl ForecastOutcome {
    pub fn report(&self) -> Option<&ForecastReport> {
        match self {
            ForecastOutcome::Ready(report) => Some(report),
            ForecastOutcome::Unavailable(_) => None,
        }
    }
}

/// The published artifact of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub generated_at: DateTime<Utc>,
    pub horizon: usize,
    pub confidence_level: f64,
    pub raw_materials: BTreeMap<Material, DatedBands>,
    pub alloy_surcharge: DatedBands,
}

/// Runs the full pipeline for one forecast cycle.
#[derive(Debug, Clone, Default)]
pub struct SurchargeForecaster {
    config: ForecastConfig,
}

impl SurchargeForecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run preparation, per-material selection, composite propagation and
    /// report assembly against the given history.
    ///
    /// Too little history yields `Unavailable` rather than an error. A
    /// material for which neither model family fits aborts the whole run.
    pub fn generate(&self, history: &PriceHistory) -> Result<ForecastOutcome> {
        let series = match prepare::prepare(history) {
            Ok(series) => series,
            Err(SurchargeError::InsufficientData { got, .. }) => {
                warn!(got, needed = MIN_OBSERVATIONS, "not enough history, skipping forecast");
                return Ok(ForecastOutcome::Unavailable(
                    UnavailableReason::InsufficientHistory { got },
                ));
            }
            Err(err) => return Err(err),
        };

        // Forecast periods start the month after the latest observation,
        // which every material shares after preparation.
        let last_period = series
            .values()
            .filter_map(|s| s.last_period())
            .max()
            .ok_or(SurchargeError::EmptyData)?;
        let periods = months_after(last_period, self.config.horizon)?;

        let mut raw_materials = BTreeMap::new();
        for material in Material::ALL {
            let material_series = series
                .get(&material)
                .ok_or(SurchargeError::NoViableModel(material))?;
            let selected = select_and_forecast(
                material,
                material_series,
                self.config.horizon,
                self.config.confidence,
            )?;
            info!(
                material = %material,
                family = selected.family.name(),
                first = selected.bands.forecast.first().copied().unwrap_or(f64::NAN),
                "material forecast ready"
            );
            raw_materials.insert(material, DatedBands::new(&periods, &selected.bands)?);
        }

        let alloy_surcharge = self.composite_bands(&periods, &raw_materials)?;

        Ok(ForecastOutcome::Ready(ForecastReport {
            generated_at: Utc::now(),
            horizon: self.config.horizon,
            confidence_level: self.config.confidence,
            raw_materials,
            alloy_surcharge,
        }))
    }

    /// Composite surcharge bands, computed per period by feeding each of
    /// the point, lower and upper series through the composite calculator.
    fn composite_bands(
        &self,
        periods: &[chrono::NaiveDate],
        raw_materials: &BTreeMap<Material, DatedBands>,
    ) -> Result<DatedBands> {
        let mut forecast = BTreeMap::new();
        let mut lower_bound = BTreeMap::new();
        let mut upper_bound = BTreeMap::new();

        for &period in periods {
            let mut point_prices = BTreeMap::new();
            let mut lower_prices = BTreeMap::new();
            let mut upper_prices = BTreeMap::new();
            for (&material, bands) in raw_materials {
                if let Some(value) = bands.forecast.get(&period) {
                    point_prices.insert(material, *value);
                }
                if let Some(value) = bands.lower_bound.get(&period) {
                    lower_prices.insert(material, *value);
                }
                if let Some(value) = bands.upper_bound.get(&period) {
                    upper_prices.insert(material, *value);
                }
            }
            forecast.insert(
                period,
                compute_composite(&point_prices, &self.config.composition)?.total,
            );
            lower_bound.insert(
                period,
                compute_composite(&lower_prices, &self.config.composition)?.total,
            );
            upper_bound.insert(
                period,
                compute_composite(&upper_prices, &self.config.composition)?.total,
            );
        }

        Ok(DatedBands {
            forecast,
            lower_bound,
            upper_bound,
        })
    }
}
