//! Daily price history port trait.

use crate::domain::error::ScoutError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait PriceHistoryPort {
    /// Daily bars for `symbol` in `[start, end]`, oldest first.
    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScoutError>;
}
