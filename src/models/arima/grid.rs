//! Order selection over a small ARIMA grid.

use crate::error::{Result, SurchargeError};
use crate::models::arima::{Arima, ArimaOrder};
use tracing::debug;

/// Orders tried when searching for the best fit: p in 0..=2, d in 0..=1,
/// q in 0..=2.
pub fn candidate_orders() -> impl Iterator<Item = ArimaOrder> {
    (0..=2usize).flat_map(|p| {
        (0..=1usize).flat_map(move |d| (0..=2usize).map(move |q| ArimaOrder::new(p, d, q)))
    })
}

/// Fit every candidate order and keep the one with the lowest AIC.
///
/// Candidates that cannot be fit on a series this short, or whose fit
/// degenerates to a NaN AIC, are skipped. A perfect fit scores negative
/// infinity and wins outright; an exactly constant series is still
/// forecastable. When nothing survives the search fails.
pub fn fit_best(values: &[f64]) -> Result<Arima> {
    let mut best: Option<Arima> = None;

    for order in candidate_orders() {
        if values.len() < order.min_len() {
            continue;
        }
        let model = match Arima::fit(order, values) {
            Ok(model) => model,
            Err(_) => continue,
        };
        if model.aic().is_nan() {
            continue;
        }
        debug!(
            p = order.p,
            d = order.d,
            q = order.q,
            aic = model.aic(),
            "arima candidate"
        );
        match &best {
            Some(current) if current.aic() <= model.aic() => {}
            _ => best = Some(model),
        }
    }

    best.ok_or_else(|| {
        SurchargeError::FitFailed("no ARIMA order produced a usable fit".to_string())
    })
}
