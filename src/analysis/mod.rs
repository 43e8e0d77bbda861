//! Descriptive analysis of recorded surcharge history.

pub mod trend;

pub use trend::{monthly_trend, LatestSnapshot, SurchargeTrend, TrendPoint};
