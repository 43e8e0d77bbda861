//! Numeric helpers shared across the fitters and the selector.

pub mod decompose;
pub mod metrics;
pub mod optimization;
pub mod stats;
