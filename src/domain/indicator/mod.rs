//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every series has one point per input bar; points inside the warmup window
//! are marked `valid: false` and must not be read.

pub mod bollinger;
pub mod ema;
pub mod highest;
pub mod macd;
pub mod sma;
pub mod stochastic;

pub use ema::calculate_ema;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Stochastic {
        fast: f64,
        slow: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    VolumeSma(usize),
    Ema(usize),
    HighestHigh(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    MacdHistogramSma {
        fast: usize,
        slow: usize,
        signal: usize,
        smoothing: usize,
    },
    Stochastic {
        period: usize,
        smoothing: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl IndicatorType {
    /// Number of bars needed before the first valid point.
    pub fn min_bars(&self) -> usize {
        match self {
            IndicatorType::Sma(n)
            | IndicatorType::VolumeSma(n)
            | IndicatorType::Ema(n)
            | IndicatorType::HighestHigh(n) => *n,
            IndicatorType::Macd { slow, signal, .. } => slow + signal - 1,
            IndicatorType::MacdHistogramSma {
                slow,
                signal,
                smoothing,
                ..
            } => slow + signal + smoothing - 2,
            // raw window, then the fast smoothing, then the slow smoothing
            IndicatorType::Stochastic { period, smoothing } => period + 2 * smoothing - 2,
            IndicatorType::Bollinger { period, .. } => *period,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// The value `offset` points before the end (0 = last), if it is valid.
    pub fn valid_from_end(&self, offset: usize) -> Option<&IndicatorValue> {
        let idx = self.values.len().checked_sub(offset + 1)?;
        let point = &self.values[idx];
        point.valid.then_some(&point.value)
    }

    /// Convenience for `Simple` series.
    pub fn simple_from_end(&self, offset: usize) -> Option<f64> {
        match self.valid_from_end(offset)? {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }

    /// The series as `Option`s, `None` for warmup points.
    pub fn simple_options(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|p| match p.value {
                IndicatorValue::Simple(v) if p.valid => Some(v),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::HighestHigh(period) => write!(f, "HIGHEST_HIGH({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::MacdHistogramSma {
                fast,
                slow,
                signal,
                smoothing,
            } => write!(f, "SMA({}) of MACD_HIST({},{},{})", smoothing, fast, slow, signal),
            IndicatorType::Stochastic { period, smoothing } => {
                write!(f, "STOCHASTIC({},{})", period, smoothing)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
