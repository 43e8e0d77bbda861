//! Error types for the surcharge-forecast library.

use crate::core::Material;
use thiserror::Error;

/// Result type alias for surcharge operations.
pub type Result<T> = std::result::Result<T, SurchargeError>;

/// Errors that can occur while tracking or forecasting the surcharge.
#[derive(Error, Debug)]
pub enum SurchargeError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A weighted material has no price in the input map.
    #[error("price for {0} not provided")]
    MissingPrice(Material),

    /// A single model candidate failed to converge. Recovered locally by
    /// skipping the candidate; never fatal on its own.
    #[error("model failed to converge: {0}")]
    FitFailed(String),

    /// Both model families failed for one material. Aborts the whole run.
    #[error("no viable forecasting model for {0}")]
    NoViableModel(Material),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Period-related error (unsorted or duplicate months).
    #[error("period error: {0}")]
    PeriodError(String),

    /// I/O error from persistence.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error from the history store.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error from the forecast store.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
