//! Exponential smoothing fitters.
//!
//! Two variants cover the price series seen in practice: Holt's linear
//! trend method, and additive Holt-Winters when the series carries a
//! material annual cycle. [`fit_auto`] picks between them by decomposing
//! the series first.

use crate::error::{Result, SurchargeError};
use crate::utils::decompose::has_material_seasonality;
use crate::utils::optimization::{minimize_bounded, SearchOptions};
use crate::utils::stats::std_dev;
use tracing::debug;

/// Months per seasonal cycle.
pub const SEASONAL_PERIOD: usize = 12;

const PARAM_BOUNDS: (f64, f64) = (0.0001, 0.9999);

/// A fitted smoothing model, either trend-only or trend plus additive
/// seasonality.
#[derive(Debug, Clone)]
pub enum Smoothing {
    Trend(HoltTrend),
    Seasonal(HoltWintersAdditive),
}

impl Smoothing {
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        match self {
            Smoothing::Trend(model) => model.forecast(horizon),
            Smoothing::Seasonal(model) => model.forecast(horizon),
        }
    }

    /// Standard deviation of the one-step fit errors.
    pub fn residual_std(&self) -> f64 {
        match self {
            Smoothing::Trend(model) => model.residual_std,
            Smoothing::Seasonal(model) => model.residual_std,
        }
    }
}

/// Fit a smoothing model, choosing the seasonal variant when the series is
/// long enough and its annual cycle is material.
pub fn fit_auto(values: &[f64]) -> Result<Smoothing> {
    if values.len() >= 2 * SEASONAL_PERIOD && has_material_seasonality(values, SEASONAL_PERIOD) {
        debug!(len = values.len(), "seasonal cycle detected, fitting holt-winters");
        Ok(Smoothing::Seasonal(HoltWintersAdditive::fit(
            values,
            SEASONAL_PERIOD,
        )?))
    } else {
        Ok(Smoothing::Trend(HoltTrend::fit(values)?))
    }
}

/// Holt's linear trend method.
#[derive(Debug, Clone)]
pub struct HoltTrend {
    pub alpha: f64,
    pub beta: f64,
    level: f64,
    trend: f64,
    residual_std: f64,
}

impl HoltTrend {
    /// Fit on `values`, choosing the smoothing weights by minimizing the
    /// one-step squared error.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(SurchargeError::InsufficientData {
                needed: 2,
                got: values.len(),
            });
        }

        let result = minimize_bounded(
            |p| run_holt(values, p[0], p[1]).1,
            &[0.3, 0.1],
            &[PARAM_BOUNDS, PARAM_BOUNDS],
            SearchOptions::default(),
        );
        let (alpha, beta) = (result.point[0], result.point[1]);

        let (state, _, errors) = run_holt_full(values, alpha, beta);
        let (level, trend) = state;
        if !level.is_finite() || !trend.is_finite() {
            return Err(SurchargeError::FitFailed(
                "holt smoothing state is not finite".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            beta,
            level,
            trend,
            residual_std: std_dev(&errors),
        })
    }

    /// Point forecast, a straight line from the final level and trend.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|h| self.level + h as f64 * self.trend)
            .collect()
    }
}

fn run_holt(values: &[f64], alpha: f64, beta: f64) -> ((f64, f64), f64) {
    let (state, sse, _) = run_holt_full(values, alpha, beta);
    (state, sse)
}

fn run_holt_full(values: &[f64], alpha: f64, beta: f64) -> ((f64, f64), f64, Vec<f64>) {
    let mut level = values[0];
    let mut trend = values[1] - values[0];
    let mut sse = 0.0;
    let mut errors = Vec::with_capacity(values.len().saturating_sub(1));

    for &y in &values[1..] {
        let predicted = level + trend;
        let err = y - predicted;
        sse += err * err;
        errors.push(err);

        let new_level = alpha * y + (1.0 - alpha) * (level + trend);
        trend = beta * (new_level - level) + (1.0 - beta) * trend;
        level = new_level;
    }

    ((level, trend), sse, errors)
}

/// Holt-Winters with additive trend and additive seasonality.
#[derive(Debug, Clone)]
pub struct HoltWintersAdditive {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    period: usize,
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    residual_std: f64,
}

impl HoltWintersAdditive {
    /// Fit on `values`, which must cover at least two full periods.
    pub fn fit(values: &[f64], period: usize) -> Result<Self> {
        if period < 2 {
            return Err(SurchargeError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {period}"
            )));
        }
        if values.len() < 2 * period {
            return Err(SurchargeError::InsufficientData {
                needed: 2 * period,
                got: values.len(),
            });
        }

        let result = minimize_bounded(
            |p| run_holt_winters(values, period, p[0], p[1], p[2]).1,
            &[0.3, 0.1, 0.1],
            &[PARAM_BOUNDS, PARAM_BOUNDS, PARAM_BOUNDS],
            SearchOptions::default(),
        );
        let (alpha, beta, gamma) = (result.point[0], result.point[1], result.point[2]);

        let (state, _, errors) = run_holt_winters_full(values, period, alpha, beta, gamma);
        let (level, trend, seasonals) = state;
        if !level.is_finite() || !trend.is_finite() || seasonals.iter().any(|s| !s.is_finite()) {
            return Err(SurchargeError::FitFailed(
                "holt-winters smoothing state is not finite".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            beta,
            gamma,
            period,
            level,
            trend,
            seasonals,
            residual_std: std_dev(&errors),
        })
    }

    /// Point forecast extending the trend line with the seasonal pattern.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|h| {
                let seasonal = self.seasonals[(h - 1) % self.period];
                self.level + h as f64 * self.trend + seasonal
            })
            .collect()
    }
}

type HwState = (f64, f64, Vec<f64>);

fn run_holt_winters(
    values: &[f64],
    period: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> (HwState, f64) {
    let (state, sse, _) = run_holt_winters_full(values, period, alpha, beta, gamma);
    (state, sse)
}

fn run_holt_winters_full(
    values: &[f64],
    period: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> (HwState, f64, Vec<f64>) {
    // Level starts at the first-season mean, trend at the average
    // season-over-season change, seasonals at first-season deviations
    // centered to sum to zero.
    let first_season = &values[..period];
    let mut level = first_season.iter().sum::<f64>() / period as f64;
    let mut trend = (0..period)
        .map(|i| (values[period + i] - values[i]) / period as f64)
        .sum::<f64>()
        / period as f64;
    let mut seasonals: Vec<f64> = first_season.iter().map(|y| y - level).collect();
    let offset = seasonals.iter().sum::<f64>() / period as f64;
    for s in &mut seasonals {
        *s -= offset;
    }

    let mut sse = 0.0;
    let mut errors = Vec::with_capacity(values.len().saturating_sub(period));

    for (t, &y) in values.iter().enumerate().skip(period) {
        let idx = t % period;
        let predicted = level + trend + seasonals[idx];
        let err = y - predicted;
        sse += err * err;
        errors.push(err);

        let new_level = alpha * (y - seasonals[idx]) + (1.0 - alpha) * (level + trend);
        trend = beta * (new_level - level) + (1.0 - beta) * trend;
        seasonals[idx] = gamma * (y - new_level) + (1.0 - gamma) * seasonals[idx];
        level = new_level;
    }

    // Forecasts index seasonals from the step after the last observation.
    let shift = values.len() % period;
    let rotated: Vec<f64> = (0..period).map(|h| seasonals[(shift + h) % period]).collect();

    ((level, trend, rotated), sse, errors)
}
