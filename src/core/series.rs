//! Monthly time series and calendar-month arithmetic.

use crate::error::{Result, SurchargeError};
use chrono::{Datelike, Months, NaiveDate};

/// Normalize a date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // with_day(1) only fails for invalid days; day 1 always exists.
    date.with_day(1).unwrap_or(date)
}

/// The month-start immediately following `date`'s month.
pub fn next_month(date: NaiveDate) -> Result<NaiveDate> {
    month_start(date)
        .checked_add_months(Months::new(1))
        .ok_or_else(|| SurchargeError::PeriodError(format!("month overflow after {date}")))
}

/// `horizon` consecutive month-starts beginning the month after `last`.
///
/// Gaps in the history are never back-filled and months are never skipped:
/// the forecast calendar depends only on the final observed period.
pub fn months_after(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let mut periods = Vec::with_capacity(horizon);
    let mut current = next_month(last)?;
    for _ in 0..horizon {
        periods.push(current);
        current = next_month(current)?;
    }
    Ok(periods)
}

/// A univariate monthly series: chronologically sorted, unique month-start
/// periods. Missing months are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    periods: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Build a series from (date, value) pairs.
    ///
    /// Dates are normalized to month-start and sorted ascending; duplicate
    /// months are rejected with a `PeriodError`.
    pub fn from_pairs(pairs: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let mut pairs: Vec<(NaiveDate, f64)> = pairs
            .into_iter()
            .map(|(d, v)| (month_start(d), v))
            .collect();
        pairs.sort_by_key(|(d, _)| *d);

        for window in pairs.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(SurchargeError::PeriodError(format!(
                    "duplicate month {}",
                    window[0].0
                )));
            }
        }

        let (periods, values) = pairs.into_iter().unzip();
        Ok(Self { periods, values })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Observation values, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Month-start periods, oldest first.
    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    /// The most recent observed period.
    pub fn last_period(&self) -> Option<NaiveDate> {
        self.periods.last().copied()
    }

    /// Split values into a training head and a held-out tail of `holdout`
    /// observations, for backtesting.
    pub fn split_holdout(&self, holdout: usize) -> Result<(&[f64], &[f64])> {
        if holdout >= self.len() {
            return Err(SurchargeError::InvalidParameter(format!(
                "holdout {holdout} leaves no training data for series of length {}",
                self.len()
            )));
        }
        Ok(self.values.split_at(self.len() - holdout))
    }
}
