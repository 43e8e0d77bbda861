//! Forecast model families and their shared fitting surface.
//!
//! The selector works in terms of [`ModelFamily`]: each family knows how to
//! produce a banded forecast for publication and a cheap fixed-order point
//! forecast for backtesting.

pub mod arima;
pub mod smoothing;

use crate::core::ForecastBands;
use crate::error::{Result, SurchargeError};
use crate::models::arima::{Arima, ArimaOrder};
use crate::models::smoothing::HoltTrend;
use crate::utils::stats::quantile_normal;

/// The two candidate model families for a material's price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Arima,
    Smoothing,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 2] = [ModelFamily::Arima, ModelFamily::Smoothing];

    pub fn name(&self) -> &'static str {
        match self {
            ModelFamily::Arima => "arima",
            ModelFamily::Smoothing => "exponential_smoothing",
        }
    }

    /// Fit this family on the full series and forecast `horizon` steps with
    /// symmetric normal bands at `confidence`.
    ///
    /// ARIMA bands come from the fitted model's own forecast variance (the
    /// psi-weight standard errors); smoothing has no analytic interval, so
    /// its bands use the residual std widened by the square root of the
    /// step. Point forecasts and lower bounds are floored at zero; prices
    /// cannot go negative but upside uncertainty is left intact. A fit
    /// whose output is not finite is reported as failed rather than
    /// published.
    pub fn fit_and_forecast(
        &self,
        values: &[f64],
        horizon: usize,
        confidence: f64,
    ) -> Result<ForecastBands> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(SurchargeError::InvalidParameter(format!(
                "confidence must be in (0, 1), got {confidence}"
            )));
        }
        let z = quantile_normal((1.0 + confidence) / 2.0);

        let (point, se) = match self {
            ModelFamily::Arima => {
                let model = arima::fit_best(values)?;
                (model.forecast(horizon), model.forecast_se(horizon))
            }
            ModelFamily::Smoothing => {
                let model = smoothing::fit_auto(values)?;
                let std = model.residual_std();
                let se = (1..=horizon).map(|h| std * (h as f64).sqrt()).collect();
                (model.forecast(horizon), se)
            }
        };

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (&p, &se) in point.iter().zip(se.iter()) {
            lower.push(p - z * se);
            upper.push(p + z * se);
        }

        let mut bands = ForecastBands::new(point, lower, upper)?;
        if !bands.is_finite() {
            return Err(SurchargeError::FitFailed(format!(
                "{} produced a non-finite forecast",
                self.name()
            )));
        }
        bands.clamp_non_negative();
        Ok(bands)
    }

    /// Point forecast from a fixed simple model structure, used only to
    /// score families against a holdout. The structure is pinned for
    /// comparability (ARIMA(1,1,1), additive-trend smoothing) but the
    /// coefficients and smoothing weights are still estimated from `train`.
    pub fn backtest_forecast(&self, train: &[f64], horizon: usize) -> Result<Vec<f64>> {
        match self {
            ModelFamily::Arima => {
                let model = Arima::fit(ArimaOrder::new(1, 1, 1), train)?;
                Ok(model.forecast(horizon))
            }
            ModelFamily::Smoothing => {
                let model = HoltTrend::fit(train)?;
                Ok(model.forecast(horizon))
            }
        }
    }
}
