//! Trailing highest high ("52-week high" at n=250).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::to_simple_series;
use crate::domain::ohlcv::PriceBar;

pub const FIFTY_TWO_WEEK_BARS: usize = 250;

pub fn calculate_highest_high(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            bars[i + 1 - period..=i]
                .iter()
                .map(|b| b.high)
                .reduce(f64::max)
        })
        .collect();

    to_simple_series(
        IndicatorType::HighestHigh(period),
        bars.iter().map(|b| b.date),
        &values,
    )
}
