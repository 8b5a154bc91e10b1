//! Shared helper functions for indicator calculations.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use chrono::NaiveDate;

/// Trailing mean over `period` inputs. An output is `Some` only when every
/// input in its window is `Some`.
pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            let anchor = window[0]?;
            let mut offset = 0.0;
            for v in window {
                offset += (*v)? - anchor;
            }
            Some(anchor + offset / period as f64)
        })
        .collect()
}

/// Mean taken as offsets from the first value, so a constant window
/// returns that value exactly.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (&anchor, _) = values.split_first()?;
    let offset: f64 = values.iter().map(|v| v - anchor).sum();
    Some(anchor + offset / values.len() as f64)
}

/// Sample standard deviation (n - 1) over a trailing window.
pub fn rolling_sample_stddev(values: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if period < 2 || i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            let avg = mean(window)?;
            let variance = window
                .iter()
                .map(|v| {
                    let diff = v - avg;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;
            Some(variance.sqrt())
        })
        .collect()
}

/// Wraps raw optional values into a `Simple` indicator series.
pub fn to_simple_series(
    indicator_type: IndicatorType,
    dates: impl IntoIterator<Item = NaiveDate>,
    values: &[Option<f64>],
) -> IndicatorSeries {
    let values = dates
        .into_iter()
        .zip(values.iter())
        .map(|(date, v)| IndicatorPoint {
            date,
            valid: v.is_some(),
            value: IndicatorValue::Simple(v.unwrap_or(0.0)),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
