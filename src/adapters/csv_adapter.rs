//! Offline price history from a directory of `<SYMBOL>.csv` files.
//!
//! Expected header: `date,open,high,low,close,volume` with `%Y-%m-%d` dates.

use crate::domain::error::ScoutError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::price_port::PriceHistoryPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl PriceHistoryPort for CsvAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScoutError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(ScoutError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let source = path.display().to_string();
        let mut reader = csv::Reader::from_path(&path).map_err(|e| ScoutError::parse(&source, e))?;

        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| ScoutError::parse(&source, format!("row {}: {}", line + 1, e)))?;
            if row.date < start || row.date > end {
                continue;
            }
            bars.push(PriceBar {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        debug!(symbol, bars = bars.len(), path = %source, "loaded CSV history");
        Ok(bars)
    }
}
