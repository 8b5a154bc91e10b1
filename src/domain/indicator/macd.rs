//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: slow - 1 + signal - 1 bars.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{rolling_mean, to_simple_series};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let macd_line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    // The signal EMA is seeded from the first valid stretch of the MACD line.
    let line_start = macd_line.iter().position(Option::is_some);
    let mut signal_line: Vec<Option<f64>> = vec![None; bars.len()];
    if let Some(start) = line_start {
        let tail: Vec<f64> = macd_line[start..].iter().flatten().copied().collect();
        for (offset, value) in ema_values(&tail, signal_period).into_iter().enumerate() {
            signal_line[start + offset] = value;
        }
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match (macd_line[i], signal_line[i]) {
            (Some(line), Some(signal)) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Macd {
                    line,
                    signal,
                    histogram: line - signal,
                },
            },
            (line, _) => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Macd {
                    line: line.unwrap_or(0.0),
                    signal: 0.0,
                    histogram: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[PriceBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

/// Histogram values, `None` during warmup.
pub fn histogram_values(series: &IndicatorSeries) -> Vec<Option<f64>> {
    series
        .values
        .iter()
        .map(|p| match p.value {
            IndicatorValue::Macd { histogram, .. } if p.valid => Some(histogram),
            _ => None,
        })
        .collect()
}

/// Simple moving average of the MACD histogram.
pub fn calculate_histogram_sma(
    bars: &[PriceBar],
    macd: &IndicatorSeries,
    smoothing: usize,
) -> IndicatorSeries {
    let (fast, slow, signal) = match macd.indicator_type {
        IndicatorType::Macd { fast, slow, signal } => (fast, slow, signal),
        _ => (DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL),
    };
    to_simple_series(
        IndicatorType::MacdHistogramSma {
            fast,
            slow,
            signal,
            smoothing,
        },
        bars.iter().map(|b| b.date),
        &rolling_mean(&histogram_values(macd), smoothing),
    )
}
