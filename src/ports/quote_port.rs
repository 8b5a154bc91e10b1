//! Quote and key-statistics port trait.

use crate::domain::error::ScoutError;
use crate::domain::fundamentals::{KeyStatistics, Quote};

pub trait QuotePort {
    fn fetch_quote(&self, symbol: &str) -> Result<Quote, ScoutError>;

    fn fetch_key_statistics(&self, symbol: &str) -> Result<KeyStatistics, ScoutError>;
}
