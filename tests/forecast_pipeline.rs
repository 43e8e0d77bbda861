//! End-to-end tests of the forecast pipeline, from history through model
//! selection, composite propagation and persistence.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use surcharge_forecast::composite::compute_composite;
use surcharge_forecast::core::{Composition, Material, Observation, PriceHistory};
use surcharge_forecast::runner::{
    ForecastConfig, ForecastOutcome, SurchargeForecaster, UnavailableReason,
};
use surcharge_forecast::store::{append_observation, load_history, ForecastStore};
use surcharge_forecast::SurchargeError;

fn month(i: usize) -> NaiveDate {
    let year = 2024 + (i / 12) as i32;
    let month = (i % 12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn observation(i: usize, cr: f64, mo: f64, ti: f64) -> Observation {
    let mut prices = BTreeMap::new();
    prices.insert(Material::Chromium, cr);
    prices.insert(Material::Molybdenum, mo);
    prices.insert(Material::Titanium, ti);
    Observation::from_prices(month(i), prices, &Composition::default()).unwrap()
}

fn history_from_chromium(chromium: &[f64]) -> PriceHistory {
    let observations = chromium
        .iter()
        .enumerate()
        .map(|(i, &cr)| observation(i, cr, 36500.0 + 40.0 * i as f64, 7050.0 + 5.0 * i as f64))
        .collect();
    PriceHistory::from_observations(observations)
}

#[test]
fn six_months_of_history_yields_a_full_forecast() {
    let history =
        history_from_chromium(&[12000.0, 12100.0, 12300.0, 12250.0, 12400.0, 12500.0]);
    let outcome = SurchargeForecaster::default().generate(&history).unwrap();
    let report = outcome.report().expect("forecast should be available");

    let chromium = &report.raw_materials[&Material::Chromium];
    assert_eq!(chromium.forecast.len(), 6);
    assert!(chromium.forecast.values().all(|v| *v >= 0.0));

    // Composite values equal the calculator applied to the per-material
    // forecasts, period by period.
    assert_eq!(report.alloy_surcharge.forecast.len(), 6);
    let composition = Composition::default();
    for (period, &total) in &report.alloy_surcharge.forecast {
        let mut prices = BTreeMap::new();
        for (&material, bands) in &report.raw_materials {
            prices.insert(material, bands.forecast[period]);
        }
        assert_eq!(
            total,
            compute_composite(&prices, &composition).unwrap().total
        );
    }
}

#[test]
fn forecast_periods_follow_the_last_observation_without_gaps() {
    let history = history_from_chromium(&[
        12000.0, 12100.0, 12300.0, 12250.0, 12400.0, 12500.0, 12650.0, 12700.0,
    ]);
    let report = SurchargeForecaster::default()
        .generate(&history)
        .unwrap()
        .report()
        .cloned()
        .expect("forecast should be available");

    // Last observation is 2024-08, so the forecast runs 2024-09..2025-02.
    let expected: Vec<NaiveDate> = (8..14).map(month).collect();
    for bands in report
        .raw_materials
        .values()
        .chain(std::iter::once(&report.alloy_surcharge))
    {
        assert_eq!(bands.periods(), expected);
        assert!(bands.periods_aligned());
    }
}

#[test]
fn four_months_is_unavailable_not_an_error() {
    let history = history_from_chromium(&[12000.0, 12100.0, 12300.0, 12250.0]);
    let outcome = SurchargeForecaster::default().generate(&history).unwrap();
    assert!(matches!(
        outcome,
        ForecastOutcome::Unavailable(UnavailableReason::InsufficientHistory { got: 4 })
    ));
}

#[test]
fn degenerate_series_aborts_the_whole_run() {
    // A NaN price poisons every candidate fit for chromium; the run must
    // fail rather than publish molybdenum and titanium alone.
    let chromium: Vec<f64> = (0..12)
        .map(|i| if i == 7 { f64::NAN } else { 12000.0 })
        .collect();
    let history = history_from_chromium(&chromium);
    let err = SurchargeForecaster::default().generate(&history).unwrap_err();
    assert!(matches!(
        err,
        SurchargeError::NoViableModel(Material::Chromium)
    ));
}

#[test]
fn reruns_on_unchanged_history_are_identical() {
    let chromium: Vec<f64> = (0..18)
        .map(|i| 12000.0 + 90.0 * i as f64 + (i as f64 * 1.1).sin() * 120.0)
        .collect();
    let history = history_from_chromium(&chromium);
    let forecaster = SurchargeForecaster::default();

    let first = forecaster.generate(&history).unwrap();
    let second = forecaster.generate(&history).unwrap();
    let first = first.report().unwrap();
    let second = second.report().unwrap();

    // Everything but the generation timestamp matches.
    assert_eq!(first.raw_materials, second.raw_materials);
    assert_eq!(first.alloy_surcharge, second.alloy_surcharge);
}

#[test]
fn failed_run_leaves_the_prior_report_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let store = ForecastStore::new(dir.path());
    let forecaster = SurchargeForecaster::default();

    let good = history_from_chromium(&[
        12000.0, 12100.0, 12300.0, 12250.0, 12400.0, 12500.0, 12600.0,
    ]);
    let report = forecaster.generate(&good).unwrap().report().cloned().unwrap();
    let saved_path = store.save(&report).unwrap();

    let bad_chromium: Vec<f64> = (0..12)
        .map(|i| if i == 5 { f64::NAN } else { 12000.0 })
        .collect();
    let bad = history_from_chromium(&bad_chromium);
    assert!(forecaster.generate(&bad).is_err());

    // Nothing was written by the failed run.
    assert!(saved_path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn history_store_feeds_the_forecaster() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("surcharge_history.csv");

    for (i, cr) in [12000.0, 12100.0, 12300.0, 12250.0, 12400.0, 12500.0]
        .iter()
        .enumerate()
    {
        append_observation(&path, &observation(i, *cr, 36500.0, 7050.0)).unwrap();
    }

    let history = load_history(&path).unwrap();
    assert_eq!(history.len(), 6);

    let outcome = SurchargeForecaster::default().generate(&history).unwrap();
    assert!(outcome.report().is_some());
}

#[test]
fn custom_horizon_shapes_every_series() {
    let forecaster = SurchargeForecaster::new(ForecastConfig {
        horizon: 4,
        confidence: 0.9,
        composition: Composition::default(),
    });
    let history = history_from_chromium(&[
        12000.0, 12100.0, 12300.0, 12250.0, 12400.0, 12500.0, 12600.0, 12750.0, 12800.0,
    ]);
    let report = forecaster
        .generate(&history)
        .unwrap()
        .report()
        .cloned()
        .unwrap();

    assert_eq!(report.horizon, 4);
    for bands in report
        .raw_materials
        .values()
        .chain(std::iter::once(&report.alloy_surcharge))
    {
        assert_eq!(bands.forecast.len(), 4);
        assert_eq!(bands.lower_bound.len(), 4);
        assert_eq!(bands.upper_bound.len(), 4);
    }
}
