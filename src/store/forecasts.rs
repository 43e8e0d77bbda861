//! JSON persistence for forecast reports.
//!
//! One file per calendar month of generation, named `forecast_YYYY-MM.json`.
//! Re-running within the same month overwrites that month's file; earlier
//! months are left untouched.

use crate::error::Result;
use crate::runner::ForecastReport;
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory of monthly forecast report files.
#[derive(Debug, Clone)]
pub struct ForecastStore {
    dir: PathBuf,
}

impl ForecastStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self, year: i32, month: u32) -> PathBuf {
        self.dir.join(format!("forecast_{year:04}-{month:02}.json"))
    }

    /// Write the report into its generation month's file, creating the
    /// directory if needed.
    pub fn save(&self, report: &ForecastReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let generated = report.generated_at.date_naive();
        let path = self.file_path(generated.year(), generated.month());
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), "forecast report saved");
        Ok(path)
    }

    /// Load the report generated in the given month, if one was saved.
    pub fn load(&self, year: i32, month: u32) -> Result<Option<ForecastReport>> {
        let path = self.file_path(year, month);
        if !path.exists() {
            return Ok(None);
        }
        let report = serde_json::from_str(&fs::read_to_string(&path)?)?;
        Ok(Some(report))
    }

    /// Load the most recently generated report, if any exist. The YYYY-MM
    /// file names sort chronologically, so the lexicographic maximum is the
    /// latest month.
    pub fn load_latest(&self) -> Result<Option<ForecastReport>> {
        if !self.dir.exists() {
            return Ok(None);
        }
        let mut latest: Option<PathBuf> = None;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if !name.starts_with("forecast_") || !name.ends_with(".json") {
                continue;
            }
            if latest.as_deref().map_or(true, |best| path.as_path() > best) {
                latest = Some(path);
            }
        }
        match latest {
            Some(path) => Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?)),
            None => Ok(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
