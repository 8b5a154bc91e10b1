//! Core domain types and logic: price data, the checklist signal engine,
//! curated lists and Market Pulse scheduling.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod indicator_helpers;
pub mod greenline;
pub mod signal;
pub mod checklist;
pub mod fundamentals;
pub mod session;
pub mod settings;
pub mod stock_list;
pub mod calendar;
pub mod pulse;
pub mod error;
