//! GreenlineTop extraction.
//!
//! A GreenlineTop is an all-time-high bar that stood for at least
//! [`GLT_MIN_DAYS`] calendar days before the all-time high was touched again.
//! The last all-time-high bar is measured against the evaluation date.
//!
//! Extraction is two passes over immutable data: [`running_max`] builds the
//! all-time-high series, [`extract_glts`] selects the qualifying tops.

use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub const GLT_MIN_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenlineTop {
    pub date: NaiveDate,
    pub high: f64,
}

/// Running all-time high of `high`, one `(date, ath)` pair per bar.
pub fn running_max(bars: &[PriceBar]) -> Vec<(NaiveDate, f64)> {
    bars.iter()
        .scan(f64::NEG_INFINITY, |ath, bar| {
            *ath = ath.max(bar.high);
            Some((bar.date, *ath))
        })
        .collect()
}

/// All GreenlineTops, oldest first.
pub fn extract_glts(
    bars: &[PriceBar],
    ath: &[(NaiveDate, f64)],
    as_of: NaiveDate,
) -> Vec<GreenlineTop> {
    let ath_days: Vec<GreenlineTop> = bars
        .iter()
        .zip(ath)
        .filter(|(bar, point)| bar.high == point.1)
        .map(|(bar, _)| GreenlineTop {
            date: bar.date,
            high: bar.high,
        })
        .collect();

    ath_days
        .iter()
        .enumerate()
        .filter(|(i, top)| {
            let next = ath_days.get(i + 1).map(|t| t.date).unwrap_or(as_of);
            (next - top.date).num_days() >= GLT_MIN_DAYS
        })
        .map(|(_, top)| *top)
        .collect()
}

/// The most recent GreenlineTop as of `as_of`, if any.
pub fn latest_glt(bars: &[PriceBar], as_of: NaiveDate) -> Option<GreenlineTop> {
    let ath = running_max(bars);
    extract_glts(bars, &ath, as_of).pop()
}
