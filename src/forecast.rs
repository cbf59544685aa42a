//! Reduction of the 3-hour forecast series to one reading per day.

use std::collections::HashSet;

use crate::models::ForecastSample;

/// Most days shown in the reduced forecast
pub const MAX_FORECAST_DAYS: usize = 5;

/// Time-of-day of the sample chosen to represent each day
pub const MIDDAY: &str = "12:00:00";

/// Keeps the midday sample of each calendar day, in input order, up to
/// [`MAX_FORECAST_DAYS`] days. Days without a midday sample are skipped.
pub fn reduce_forecast(samples: &[ForecastSample]) -> Vec<ForecastSample> {
    let mut seen = HashSet::new();

    samples
        .iter()
        .filter(|&sample| match sample.dt_txt.split_once(' ') {
            Some((date, time)) => time == MIDDAY && seen.insert(date),
            None => false,
        })
        .take(MAX_FORECAST_DAYS)
        .cloned()
        .collect()
}
