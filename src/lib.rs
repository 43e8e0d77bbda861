//! # surcharge-forecast
//!
//! Alloy surcharge forecasting for stainless raw materials.
//!
//! Tracks monthly chromium, molybdenum and titanium prices, fits ARIMA and
//! exponential smoothing models per material, picks the better family by a
//! holdout backtest, and publishes a six-month composite surcharge forecast
//! with confidence bands.

#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod composite;
pub mod core;
pub mod error;
pub mod models;
pub mod prepare;
pub mod runner;
pub mod selection;
pub mod store;
pub mod utils;

pub use error::{Result, SurchargeError};

pub mod prelude {
    pub use crate::composite::{compute_composite, CompositeBreakdown};
    pub use crate::core::{Composition, Material, Observation, PriceHistory};
    pub use crate::error::{Result, SurchargeError};
    pub use crate::runner::{ForecastConfig, ForecastOutcome, ForecastReport, SurchargeForecaster};
    pub use crate::store::ForecastStore;
}
