//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = EMA[i-1] + k*(X[i] - EMA[i-1]).
//! Warmup: first (n-1) inputs are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{mean, to_simple_series};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    to_simple_series(
        IndicatorType::Ema(period),
        bars.iter().map(|b| b.date),
        &ema_values(&closes, period),
    )
}

/// EMA over raw values, `None` during warmup.
pub fn ema_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if i < period - 1 {
            out.push(None);
        } else if i == period - 1 {
            ema = mean(&values[..period]).unwrap_or(v);
            out.push(Some(ema));
        } else {
            ema += k * (v - ema);
            out.push(Some(ema));
        }
    }

    out
}
