//! CSV-backed price history.
//!
//! One row per month with prices, derived contributions and the total
//! surcharge. The forecaster only reads this table; collection appends to
//! it once per cycle.

use crate::core::{Material, Observation, PriceHistory};
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Flat row shape of the history table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub chromium_price: f64,
    pub molybdenum_price: f64,
    pub titanium_price: f64,
    pub chromium_contribution: f64,
    pub molybdenum_contribution: f64,
    pub titanium_contribution: f64,
    pub total_surcharge: f64,
}

impl HistoryRow {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            date: obs.period(),
            chromium_price: obs.price(Material::Chromium).unwrap_or(f64::NAN),
            molybdenum_price: obs.price(Material::Molybdenum).unwrap_or(f64::NAN),
            titanium_price: obs.price(Material::Titanium).unwrap_or(f64::NAN),
            chromium_contribution: obs.contribution(Material::Chromium).unwrap_or(f64::NAN),
            molybdenum_contribution: obs.contribution(Material::Molybdenum).unwrap_or(f64::NAN),
            titanium_contribution: obs.contribution(Material::Titanium).unwrap_or(f64::NAN),
            total_surcharge: obs.total_surcharge(),
        }
    }

    pub fn into_observation(self) -> Observation {
        let mut prices = BTreeMap::new();
        prices.insert(Material::Chromium, self.chromium_price);
        prices.insert(Material::Molybdenum, self.molybdenum_price);
        prices.insert(Material::Titanium, self.titanium_price);

        let mut contributions = BTreeMap::new();
        contributions.insert(Material::Chromium, self.chromium_contribution);
        contributions.insert(Material::Molybdenum, self.molybdenum_contribution);
        contributions.insert(Material::Titanium, self.titanium_contribution);

        Observation::from_parts(self.date, prices, contributions, self.total_surcharge)
    }
}

/// Load the full history table. A missing file is an empty history, not an
/// error: nothing has been collected yet.
pub fn load_history(path: &Path) -> Result<PriceHistory> {
    if !path.exists() {
        return Ok(PriceHistory::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut history = PriceHistory::new();
    for row in reader.deserialize::<HistoryRow>() {
        history.push(row?.into_observation());
    }
    info!(rows = history.len(), path = %path.display(), "history loaded");
    Ok(history)
}

/// Append one observation, writing the header only when creating the file.
pub fn append_observation(path: &Path, observation: &Observation) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let write_header = !path.exists();

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    writer.serialize(HistoryRow::from_observation(observation))?;
    writer.flush()?;
    Ok(())
}
