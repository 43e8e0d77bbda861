//! Surcharge trend statistics over recorded history.
//!
//! Feeds the reporting layer: month-over-month movement, a short moving
//! average, year-over-year comparison once enough history exists, and a
//! snapshot of how the latest surcharge splits across materials.

use crate::core::{Material, PriceHistory};
use crate::error::{Result, SurchargeError};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Trend figures for one month of history.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub period: NaiveDate,
    pub total_surcharge: f64,
    /// Percent change against the previous month. None for the first month
    /// or when the previous total is zero.
    pub mom_pct: Option<f64>,
    /// Mean of this and the two preceding totals. None before three months.
    pub moving_avg_3m: Option<f64>,
    /// Percent change against the same month one year earlier. None until
    /// thirteen months of history exist.
    pub yoy_pct: Option<f64>,
}

/// Where the surcharge stands right now.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestSnapshot {
    pub period: NaiveDate,
    pub total_surcharge: f64,
    /// Each material's share of the total, in percent.
    pub contribution_shares: BTreeMap<Material, f64>,
}

/// Full trend series plus the latest snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SurchargeTrend {
    pub points: Vec<TrendPoint>,
    pub latest: LatestSnapshot,
}

/// Compute the monthly surcharge trend from history.
pub fn monthly_trend(history: &PriceHistory) -> Result<SurchargeTrend> {
    if history.is_empty() {
        return Err(SurchargeError::EmptyData);
    }

    let sorted = history.sorted_by_period();
    let totals: Vec<f64> = sorted.iter().map(|obs| obs.total_surcharge()).collect();

    let mut points = Vec::with_capacity(sorted.len());
    for (i, obs) in sorted.iter().enumerate() {
        let mom_pct = (i >= 1)
            .then(|| totals[i - 1])
            .filter(|prev| *prev != 0.0)
            .map(|prev| (totals[i] - prev) / prev * 100.0);
        let moving_avg_3m =
            (i >= 2).then(|| (totals[i] + totals[i - 1] + totals[i - 2]) / 3.0);
        let yoy_pct = (i >= 12)
            .then(|| totals[i - 12])
            .filter(|prev| *prev != 0.0)
            .map(|prev| (totals[i] - prev) / prev * 100.0);

        points.push(TrendPoint {
            period: obs.period(),
            total_surcharge: totals[i],
            mom_pct,
            moving_avg_3m,
            yoy_pct,
        });
    }

    let last = &sorted[sorted.len() - 1];
    let mut contribution_shares = BTreeMap::new();
    if last.total_surcharge() != 0.0 {
        for material in Material::ALL {
            if let Some(contribution) = last.contribution(material) {
                contribution_shares
                    .insert(material, contribution / last.total_surcharge() * 100.0);
            }
        }
    }

    Ok(SurchargeTrend {
        points,
        latest: LatestSnapshot {
            period: last.period(),
            total_surcharge: last.total_surcharge(),
            contribution_shares,
        },
    })
}
