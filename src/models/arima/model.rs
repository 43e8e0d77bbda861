//! ARIMA fitted by conditional least squares.

use crate::error::{Result, SurchargeError};
use crate::models::arima::diff::{difference, integrate};
use crate::utils::optimization::{minimize_bounded, SearchOptions};

/// ARIMA order (p, d, q).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// AR and MA coefficients plus the intercept.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }

    /// Shortest series this order can be fit on.
    pub fn min_len(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }
}

/// An ARIMA model fit on a single series.
///
/// Fitting differenced the series `d` times, estimated AR/MA coefficients
/// and an intercept by minimizing the conditional sum of squares, then kept
/// the state needed to extend the series forward.
#[derive(Debug, Clone)]
pub struct Arima {
    order: ArimaOrder,
    ar: Vec<f64>,
    ma: Vec<f64>,
    intercept: f64,
    original: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    residual_variance: f64,
    aic: f64,
}

impl Arima {
    /// Fit an ARIMA of the given order on `values`.
    pub fn fit(order: ArimaOrder, values: &[f64]) -> Result<Self> {
        if values.len() < order.min_len() {
            return Err(SurchargeError::InsufficientData {
                needed: order.min_len(),
                got: values.len(),
            });
        }

        let differenced = difference(values, order.d);
        let (ar, ma, intercept) = estimate(order, &differenced);

        let mut model = Self {
            order,
            ar,
            ma,
            intercept,
            original: values.to_vec(),
            differenced,
            residuals: Vec::new(),
            residual_variance: f64::NAN,
            aic: f64::NAN,
        };
        model.compute_residuals();
        Ok(model)
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Akaike information criterion of the fit. NaN when the fit degenerated.
    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Point forecast `horizon` steps past the end of the fitted series.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }

        let p = self.order.p;
        let q = self.order.q;
        let mut extended = self.differenced.clone();
        let mut residuals = self.residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.intercept;
            for i in 0..p {
                if t > i {
                    pred += self.ar[i] * (extended[t - 1 - i] - self.intercept);
                }
            }
            // Future shocks are zero, so only in-sample residuals feed the
            // MA terms.
            for i in 0..q {
                if t > i {
                    pred += self.ma[i] * residuals[t - 1 - i];
                }
            }
            extended.push(pred);
            residuals.push(0.0);
        }

        let forecast_diff = extended[self.differenced.len()..].to_vec();
        integrate(&forecast_diff, &self.original, self.order.d)
    }

    /// Standard error of the forecast at each step.
    ///
    /// Uses the psi-weight (MA-infinity) representation of the fitted ARMA:
    /// `se(h) = sigma * sqrt(sum of psi_j^2 for j < h)`. The weights are
    /// cumulated once per order of differencing, so a random walk grows as
    /// `sigma * sqrt(h)` while an undifferenced white-noise fit stays flat.
    pub fn forecast_se(&self, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }
        let sigma = self.residual_variance.sqrt();

        let mut psi = vec![0.0; horizon];
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut w = if j <= self.order.q { self.ma[j - 1] } else { 0.0 };
            for i in 1..=self.order.p.min(j) {
                w += self.ar[i - 1] * psi[j - i];
            }
            psi[j] = w;
        }
        for _ in 0..self.order.d {
            for j in 1..horizon {
                psi[j] += psi[j - 1];
            }
        }

        let mut cumulative = 0.0;
        psi.iter()
            .map(|w| {
                cumulative += w * w;
                sigma * cumulative.sqrt()
            })
            .collect()
    }

    fn compute_residuals(&mut self) {
        let start = self.order.p.max(self.order.q);
        let (residuals, css) = css_residuals(
            &self.differenced,
            self.order.p,
            self.order.q,
            &self.ar,
            &self.ma,
            self.intercept,
        );
        self.residuals = residuals;

        let n_eff = self.differenced.len().saturating_sub(start);
        if n_eff == 0 {
            return;
        }
        let variance = css / n_eff as f64;
        self.residual_variance = variance;

        let n = n_eff as f64;
        let k = self.order.num_params() as f64;
        let log_likelihood =
            -0.5 * n * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());
        self.aic = -2.0 * log_likelihood + 2.0 * k;
    }
}

/// One-step residuals and the conditional sum of squares over the
/// differenced series.
fn css_residuals(
    diff_series: &[f64],
    p: usize,
    q: usize,
    ar: &[f64],
    ma: &[f64],
    intercept: f64,
) -> (Vec<f64>, f64) {
    let n = diff_series.len();
    let start = p.max(q);
    let mut residuals = vec![0.0; n];
    let mut css = 0.0;

    for t in start..n {
        let mut pred = intercept;
        for i in 0..p {
            pred += ar[i] * (diff_series[t - 1 - i] - intercept);
        }
        for i in 0..q {
            pred += ma[i] * residuals[t - 1 - i];
        }
        let err = diff_series[t] - pred;
        residuals[t] = err;
        css += err * err;
    }

    (residuals, css)
}

fn estimate(order: ArimaOrder, diff_series: &[f64]) -> (Vec<f64>, Vec<f64>, f64) {
    let p = order.p;
    let q = order.q;
    let mean = diff_series.iter().sum::<f64>() / diff_series.len().max(1) as f64;

    if p == 0 && q == 0 {
        return (Vec::new(), Vec::new(), mean);
    }

    let mut start = vec![0.0; order.num_params()];
    start[0] = mean;
    for i in 0..p {
        start[1 + i] = 0.1 / (i + 1) as f64;
    }
    for i in 0..q {
        start[1 + p + i] = 0.1 / (i + 1) as f64;
    }

    // Intercept is free; AR/MA coefficients stay inside the unit box for
    // stationarity and invertibility.
    let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
    bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

    let result = minimize_bounded(
        |params| {
            let intercept = params[0];
            let ar = &params[1..1 + p];
            let ma = &params[1 + p..];
            css_residuals(diff_series, p, q, ar, ma, intercept).1
        },
        &start,
        &bounds,
        SearchOptions {
            max_iter: 1000,
            ..Default::default()
        },
    );

    let ar = result.point[1..1 + p].to_vec();
    let ma = result.point[1 + p..].to_vec();
    (ar, ma, result.point[0])
}
