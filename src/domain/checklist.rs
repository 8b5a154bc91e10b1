//! Stock checklist trend signals.
//!
//! Derives the uptrend/downtrend evidence for one price series: moving
//! average positions, MACD histogram slope, stochastic crossovers, Bollinger
//! breaches, 52-week and all-time highs, and the GreenlineTop breakout.
//!
//! Every signal is computed from complete lookback windows only. When the
//! series is too short for a window, that signal is `Undetermined`; the
//! other signals are unaffected.

use crate::domain::error::InsufficientHistory;
use crate::domain::greenline::{latest_glt, running_max, GreenlineTop};
use crate::domain::indicator::bollinger::{self, calculate_bollinger};
use crate::domain::indicator::highest::{calculate_highest_high, FIFTY_TWO_WEEK_BARS};
use crate::domain::indicator::macd::{calculate_histogram_sma, calculate_macd_default};
use crate::domain::indicator::sma::{calculate_sma, calculate_volume_sma};
use crate::domain::indicator::stochastic::{self, calculate_stochastic, fast_from_end, slow_from_end};
use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::indicator_helpers::mean;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{Signal, SignalSet};
use chrono::NaiveDate;

const SMA_30D: usize = 30;
const SMA_4W: usize = 20;
const SMA_10W: usize = 50;
const SMA_30W: usize = 150;
const MACD_HIST_SMOOTHING: usize = 4;
const VOLUME_SMA: usize = 50;
const VOLUME_SURGE: f64 = 1.5;
const STOCH_MIDLINE: f64 = 50.0;
/// close[-255:-245], about one trading year back
const YEAR_AGO_START: usize = 255;
const YEAR_AGO_END: usize = 245;

/// Signals plus the GreenlineTop they were measured against.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistSignals {
    pub latest_glt: Option<GreenlineTop>,
    pub signals: SignalSet,
}

/// Evaluates the checklist with the last bar's date as the evaluation date.
pub fn evaluate(series: &PriceSeries) -> ChecklistSignals {
    evaluate_as_of(series, series.last_date())
}

/// Evaluates the checklist; `as_of` closes the gap after the last all-time high.
pub fn evaluate_as_of(series: &PriceSeries, as_of: NaiveDate) -> ChecklistSignals {
    let bars = series.bars();
    let n = bars.len();
    let last = series.last();
    let prev = series.from_end(1);
    let close = last.close;

    let sma30 = last_simple(&calculate_sma(bars, SMA_30D), 0, n);
    let sma20 = last_simple(&calculate_sma(bars, SMA_4W), 0, n);
    let sma50 = last_simple(&calculate_sma(bars, SMA_10W), 0, n);
    let sma150 = last_simple(&calculate_sma(bars, SMA_30W), 0, n);

    let glt = latest_glt(bars, as_of);
    let macd = macd_histogram_and_average(series);
    let stoch = calculate_stochastic(bars, stochastic::CHECKLIST_PERIOD, stochastic::CHECKLIST_SMOOTHING);
    let fast_bars = stochastic::CHECKLIST_PERIOD + stochastic::CHECKLIST_SMOOTHING - 1;
    let fast = fast_from_end(&stoch, 0)
        .ok_or_else(|| short(&format!("{} fast", stoch.indicator_type), fast_bars, n));
    let fast_slow = fast.clone().and_then(|f| {
        slow_from_end(&stoch, 0).map(|s| (f, s)).ok_or_else(|| {
            short(
                &format!("{} slow", stoch.indicator_type),
                stoch.indicator_type.min_bars(),
                n,
            )
        })
    });
    let bands = bollinger_last_two(series);

    let averages = sma20.and_then(|a20| Ok((a20, sma50.clone()?, sma150.clone()?)));
    let stacked_up = averages.clone().map(|(a20, a50, a150)| a20 > a50 && a50 > a150);
    let stacked_down = averages.map(|(a20, a50, a150)| a20 < a50 && a50 < a150);

    let high_52w = last_simple(&calculate_highest_high(bars, FIFTY_TWO_WEEK_BARS), 0, n).map(|hh| {
        hh == last.high || prev.is_some_and(|p| hh == p.high)
    });

    let ath_l2 = InsufficientHistory::check("ATH", 2, n).map(|()| {
        let ath = running_max(bars);
        ath[n - 1].1 == last.high || prev.is_some_and(|p| ath[n - 2].1 == p.high)
    });

    let doubled = InsufficientHistory::check("CLOSE[-255:-245]", YEAR_AGO_START, n).map(|()| {
        let window: Vec<f64> = bars[n - YEAR_AGO_START..n - YEAR_AGO_END]
            .iter()
            .map(|b| b.close)
            .collect();
        mean(&window).is_some_and(|m| close >= 2.0 * m)
    });

    let volume = last_simple(&calculate_volume_sma(bars, VOLUME_SMA), 0, n)
        .map(|avg| last.volume as f64 > VOLUME_SURGE * avg);

    let uptrend = vec![
        ("c>30d_avg", sma30.clone().map(|a| close > a).into()),
        ("c>10w_avg", sma50.clone().map(|a| close > a).into()),
        ("c>30w_avg", sma150.clone().map(|a| close > a).into()),
        ("4w>10w>30w", stacked_up.into()),
        ("above_last_glt", Signal::Flag(glt.is_some_and(|g| close > g.high))),
        ("macd_hist_rising", macd.clone().map(|(h, avg)| h > avg).into()),
        ("stoch_fast>slow", fast_slow.clone().map(|(f, s)| f > s).into()),
        ("52w_high_l2", high_52w.into()),
        ("ath_l2", ath_l2.into()),
        ("1y_doubled", doubled.into()),
        ("stoch<50", fast.clone().map(|f| f < STOCH_MIDLINE).into()),
        (
            "<bb_lower_l2",
            bands
                .clone()
                .map(|[(lower1, _), (lower2, _)]| {
                    last.low < lower1 || prev.is_some_and(|p| p.low < lower2)
                })
                .into(),
        ),
        ("above_avg_volume", volume.into()),
    ];

    let downtrend = vec![
        ("c<30d_avg", sma30.map(|a| close < a).into()),
        ("c<10w_avg", sma50.map(|a| close < a).into()),
        ("c<30w_avg", sma150.map(|a| close < a).into()),
        ("4w<10w<30w", stacked_down.into()),
        ("macd_hist_falling", macd.map(|(h, avg)| h < avg).into()),
        ("stoch_fast<slow", fast_slow.map(|(f, s)| f < s).into()),
        ("stoch>50", fast.map(|f| f > STOCH_MIDLINE).into()),
        (
            ">bb_upper_l2",
            bands
                .map(|[(_, upper1), (_, upper2)]| {
                    last.high > upper1 || prev.is_some_and(|p| p.high > upper2)
                })
                .into(),
        ),
    ];

    ChecklistSignals {
        latest_glt: glt,
        signals: SignalSet::new(uptrend, downtrend),
    }
}

fn short(indicator: &str, required: usize, available: usize) -> InsufficientHistory {
    InsufficientHistory {
        indicator: indicator.to_string(),
        required,
        available,
    }
}

fn last_simple(
    series: &IndicatorSeries,
    offset: usize,
    available: usize,
) -> Result<f64, InsufficientHistory> {
    series.simple_from_end(offset).ok_or_else(|| {
        short(
            &series.indicator_type.to_string(),
            series.indicator_type.min_bars() + offset,
            available,
        )
    })
}

/// MACD histogram and its moving average at the last bar.
fn macd_histogram_and_average(series: &PriceSeries) -> Result<(f64, f64), InsufficientHistory> {
    let bars = series.bars();
    let macd = calculate_macd_default(bars);
    let smoothed = calculate_histogram_sma(bars, &macd, MACD_HIST_SMOOTHING);
    let average = last_simple(&smoothed, 0, bars.len())?;
    match macd.valid_from_end(0) {
        Some(IndicatorValue::Macd { histogram, .. }) => Ok((*histogram, average)),
        _ => Err(short(&macd.indicator_type.to_string(), macd.indicator_type.min_bars(), bars.len())),
    }
}

/// (lower, upper) at the last and second-to-last bar.
fn bollinger_last_two(series: &PriceSeries) -> Result<[(f64, f64); 2], InsufficientHistory> {
    let bars = series.bars();
    let boll = calculate_bollinger(
        bars,
        bollinger::CHECKLIST_PERIOD,
        bollinger::CHECKLIST_STDDEV_MULT_X100,
    );
    let at = |offset: usize| match boll.valid_from_end(offset) {
        Some(IndicatorValue::Bollinger { upper, lower, .. }) => Ok((*lower, *upper)),
        _ => Err(short(
            &boll.indicator_type.to_string(),
            boll.indicator_type.min_bars() + offset,
            bars.len(),
        )),
    };
    Ok([at(0)?, at(1)?])
}
