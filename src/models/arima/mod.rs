//! ARIMA model fit by conditional least squares, with AIC-based order
//! selection over a small grid.

mod diff;
mod grid;
mod model;

pub use grid::{candidate_orders, fit_best};
pub use model::{Arima, ArimaOrder};
