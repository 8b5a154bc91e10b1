//! Simple Moving Average over close or volume.
//!
//! SMA(n)[i] = (X[i-n+1] + ... + X[i]) / n
//! Warmup: first (n-1) bars are invalid. There is no partial-window fallback.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{rolling_mean, to_simple_series};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_sma(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let closes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.close)).collect();
    to_simple_series(
        IndicatorType::Sma(period),
        bars.iter().map(|b| b.date),
        &rolling_mean(&closes, period),
    )
}

pub fn calculate_volume_sma(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let volumes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.volume as f64)).collect();
    to_simple_series(
        IndicatorType::VolumeSma(period),
        bars.iter().map(|b| b.date),
        &rolling_mean(&volumes, period),
    )
}
