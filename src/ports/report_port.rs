//! Report writing port trait.

use crate::domain::error::ScoutError;
use crate::domain::fundamentals::ChecklistReport;
use crate::domain::stock_list::StockList;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Port for persisting checklist reports and fetched stock lists.
pub trait ReportPort {
    /// Writes one symbol's checklist; returns the file written.
    fn write_checklist(&self, report: &ChecklistReport, date: NaiveDate)
        -> Result<PathBuf, ScoutError>;

    fn write_stock_list(
        &self,
        list: StockList,
        date: NaiveDate,
        symbols: &[String],
    ) -> Result<PathBuf, ScoutError>;
}
