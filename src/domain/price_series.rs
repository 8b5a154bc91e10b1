//! Validated, immutable price history for one symbol.

use crate::domain::error::ScoutError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting empty input, non-finite prices and
    /// dates that are not strictly increasing.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, ScoutError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(ScoutError::NoData { symbol });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(ScoutError::InvalidSeries {
                    symbol,
                    reason: format!("non-finite price on {}", bar.date),
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(ScoutError::InvalidSeries {
                    symbol,
                    reason: format!(
                        "dates not strictly increasing: {} follows {}",
                        bar.date,
                        bars[i - 1].date
                    ),
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> &PriceBar {
        // Construction guarantees at least one bar.
        &self.bars[self.bars.len() - 1]
    }

    /// Bar `offset` positions before the last one (0 = last).
    pub fn from_end(&self, offset: usize) -> Option<&PriceBar> {
        self.bars.len().checked_sub(offset + 1).map(|i| &self.bars[i])
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last().date
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}
