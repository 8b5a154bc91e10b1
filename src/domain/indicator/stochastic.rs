//! Stochastic oscillator.
//!
//! RAW(n)[i] = 100 × (C[i] - LL(n)) / (HH(n) - LL(n)), 0 when HH == LL
//! Fast = SMA(m) of RAW, Slow = SMA(m) of Fast.
//!
//! Checklist parameters: n=10, m=4.
//! Warmup: fast needs n + m - 1 bars, slow needs n + 2m - 2 bars.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::rolling_mean;
use crate::domain::ohlcv::PriceBar;

pub const CHECKLIST_PERIOD: usize = 10;
pub const CHECKLIST_SMOOTHING: usize = 4;

/// Raw stochastic values, `None` during warmup.
pub fn raw_stochastic(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    (0..bars.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];
            let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let range = highest - lowest;
            if range == 0.0 {
                Some(0.0)
            } else {
                Some(100.0 * (bars[i].close - lowest) / range)
            }
        })
        .collect()
}

/// Fast and slow lines. A point is valid once the fast line is; read
/// [`slow_from_end`] for the slow line's own validity.
pub fn calculate_stochastic(bars: &[PriceBar], period: usize, smoothing: usize) -> IndicatorSeries {
    let fast = rolling_mean(&raw_stochastic(bars, period), smoothing);
    let slow = rolling_mean(&fast, smoothing);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: fast[i].is_some(),
            value: IndicatorValue::Stochastic {
                fast: fast[i].unwrap_or(0.0),
                slow: slow[i].unwrap_or(f64::NAN),
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic { period, smoothing },
        values,
    }
}

pub fn fast_from_end(series: &IndicatorSeries, offset: usize) -> Option<f64> {
    match series.valid_from_end(offset)? {
        IndicatorValue::Stochastic { fast, .. } => Some(*fast),
        _ => None,
    }
}

pub fn slow_from_end(series: &IndicatorSeries, offset: usize) -> Option<f64> {
    match series.valid_from_end(offset)? {
        IndicatorValue::Stochastic { slow, .. } if slow.is_finite() => Some(*slow),
        _ => None,
    }
}
