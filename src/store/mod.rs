//! Durable storage: the monthly history table and saved forecast reports.

pub mod forecasts;
pub mod history;

pub use forecasts::ForecastStore;
pub use history::{append_observation, load_history, HistoryRow};
