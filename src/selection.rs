//! Model selection by holdout backtest.
//!
//! Both families are fit on the full series first; a family that cannot fit
//! at all is out of the running. When both remain, a short holdout backtest
//! with fixed low-cost configurations decides which family's full fit gets
//! published.

use crate::core::{ForecastBands, Material, MonthlySeries};
use crate::error::{Result, SurchargeError};
use crate::models::ModelFamily;
use crate::utils::metrics::mae;
use tracing::{debug, info};

/// Longest holdout used for backtesting.
const MAX_HOLDOUT: usize = 3;

/// The published forecast for one material and the family that won it.
#[derive(Debug, Clone)]
pub struct SelectedForecast {
    pub family: ModelFamily,
    pub bands: ForecastBands,
}

/// Fit, backtest and pick a model family for one material's series.
///
/// The holdout is the last `min(3, len / 3)` observations. A family whose
/// backtest errors out or scores a non-finite error keeps its full fit but
/// loses any tie; when only one family fit at all it wins by default. ARIMA
/// must score strictly lower to win, so exact ties go to smoothing. Fails
/// with `NoViableModel` when neither family could fit the series.
pub fn select_and_forecast(
    material: Material,
    series: &MonthlySeries,
    horizon: usize,
    confidence: f64,
) -> Result<SelectedForecast> {
    let values = series.values();

    let mut candidates: Vec<(ModelFamily, ForecastBands)> = Vec::new();
    for family in ModelFamily::ALL {
        match family.fit_and_forecast(values, horizon, confidence) {
            Ok(bands) => candidates.push((family, bands)),
            Err(err) => {
                debug!(material = %material, family = family.name(), %err, "family failed to fit");
            }
        }
    }

    let winner = match candidates.len() {
        0 => return Err(SurchargeError::NoViableModel(material)),
        1 => {
            let (family, bands) = candidates.remove(0);
            info!(material = %material, family = family.name(), "only one family fit, selected by default");
            return Ok(SelectedForecast { family, bands });
        }
        _ => {
            let holdout = MAX_HOLDOUT.min(values.len() / 3);
            let (train, test) = series.split_holdout(holdout)?;

            let mut scores = Vec::new();
            for (family, _) in &candidates {
                let score = match family.backtest_forecast(train, holdout) {
                    Ok(predicted) => mae(test, &predicted),
                    Err(_) => f64::NAN,
                };
                debug!(material = %material, family = family.name(), mae = score, "backtest score");
                scores.push(score);
            }

            // ARIMA needs a strictly lower error; ties go to smoothing. A
            // family with a non-finite score loses to a finite one.
            let arima_mae = scores[0];
            let smoothing_mae = scores[1];
            if arima_mae.is_finite() && !smoothing_mae.is_finite() {
                ModelFamily::Arima
            } else if arima_mae.is_finite() && arima_mae < smoothing_mae {
                ModelFamily::Arima
            } else {
                ModelFamily::Smoothing
            }
        }
    };

    let (family, bands) = candidates
        .into_iter()
        .find(|(family, _)| *family == winner)
        .ok_or(SurchargeError::NoViableModel(material))?;
    info!(material = %material, family = family.name(), "model selected");
    Ok(SelectedForecast { family, bands })
}
