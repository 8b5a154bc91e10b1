//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by N-1).
//!
//! Checklist parameters: period=15, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{mean, rolling_sample_stddev};
use crate::domain::ohlcv::PriceBar;

pub const CHECKLIST_PERIOD: usize = 15;
pub const CHECKLIST_STDDEV_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    bars: &[PriceBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let stddevs = rolling_sample_stddev(&closes, period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let middle = stddevs[i].and_then(|_| mean(&closes[i + 1 - period..=i]));
            (bar, stddevs[i].zip(middle))
        })
        .map(|(bar, bands)| match bands {
            Some((stddev, middle)) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Bollinger {
                    upper: middle + mult * stddev,
                    middle,
                    lower: middle - mult * stddev,
                },
            },
            None => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Bollinger {
                    upper: 0.0,
                    middle: 0.0,
                    lower: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}
