//! Core data structures for surcharge tracking and forecasting.

mod bands;
mod material;
mod observation;
mod series;

pub use bands::{DatedBands, ForecastBands};
pub use material::{Composition, Material};
pub use observation::{Observation, PriceHistory};
pub use series::{month_start, months_after, next_month, MonthlySeries};
