//! Plain-text report adapter implementing ReportPort.
//!
//! Checklists go to `<stocks_dir>/<SYMBOL>_<YYYY-MM-DD>.txt` as `[section]`
//! blocks of `key = value` lines; stock lists go to
//! `<lists_dir>/<list>/<YYYY-MM-DD>.txt`, one symbol per line.

use crate::domain::error::ScoutError;
use crate::domain::fundamentals::{ChecklistReport, Section};
use crate::domain::signal::TrendGroup;
use crate::domain::stock_list::StockList;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct TextReportAdapter {
    stocks_dir: PathBuf,
    lists_dir: PathBuf,
}

impl TextReportAdapter {
    pub fn new(stocks_dir: PathBuf, lists_dir: PathBuf) -> Self {
        Self {
            stocks_dir,
            lists_dir,
        }
    }

    pub fn checklist_path(&self, symbol: &str, date: NaiveDate) -> PathBuf {
        self.stocks_dir
            .join(format!("{}_{}.txt", symbol, date.format("%Y-%m-%d")))
    }

    pub fn list_path(&self, list: StockList, date: NaiveDate) -> PathBuf {
        self.lists_dir
            .join(list.name())
            .join(format!("{}.txt", date.format("%Y-%m-%d")))
    }
}

fn push_section(out: &mut String, name: &str, entries: impl IntoIterator<Item = (String, String)>) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "[{}]", name);
    for (key, value) in entries {
        let _ = writeln!(out, "{} = {}", key, value);
    }
}

fn fields(section: Section) -> impl Iterator<Item = (String, String)> {
    section
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
}

pub fn render_checklist(report: &ChecklistReport) -> String {
    let mut out = String::new();
    push_section(&mut out, "basics", fields(report.basics()));
    push_section(&mut out, "ibd", fields(report.ibd()));
    push_section(&mut out, "yahoo", fields(report.yahoo()));
    push_section(&mut out, "greenline", fields(report.greenline()));
    for group in [TrendGroup::Uptrend, TrendGroup::Downtrend] {
        let signals = report.checklist.signals.group(group);
        push_section(
            &mut out,
            group.name(),
            signals.iter().map(|(k, s)| (k.to_string(), s.to_string())),
        );
    }
    out
}

pub fn render_stock_list(symbols: &[String]) -> String {
    symbols.iter().map(|s| format!("{}\n", s)).collect()
}

fn write_file(path: &Path, content: &str) -> Result<(), ScoutError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

impl ReportPort for TextReportAdapter {
    fn write_checklist(
        &self,
        report: &ChecklistReport,
        date: NaiveDate,
    ) -> Result<PathBuf, ScoutError> {
        let path = self.checklist_path(&report.symbol, date);
        write_file(&path, &render_checklist(report))?;
        info!(symbol = %report.symbol, path = %path.display(), "wrote checklist");
        Ok(path)
    }

    fn write_stock_list(
        &self,
        list: StockList,
        date: NaiveDate,
        symbols: &[String],
    ) -> Result<PathBuf, ScoutError> {
        let path = self.list_path(list, date);
        write_file(&path, &render_stock_list(symbols))?;
        info!(list = %list, symbols = symbols.len(), path = %path.display(), "wrote stock list");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checklist::evaluate;
    use crate::domain::fundamentals::{IbdCheckup, KeyStatistics, Quote};
    use crate::domain::ohlcv::PriceBar;
    use crate::domain::price_series::PriceSeries;
    use chrono::Duration;
    use tempfile::TempDir;

    fn report(bars: usize) -> ChecklistReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<PriceBar> = (0..bars)
            .map(|i| PriceBar {
                date: start + Duration::days(i as i64),
                open: 10.0,
                high: 11.0 + i as f64,
                low: 9.0,
                close: 10.0 + i as f64,
                volume: 100,
            })
            .collect();
        let series = PriceSeries::new("NVDA", bars).unwrap();
        ChecklistReport {
            symbol: "NVDA".into(),
            generated_at: start.and_hms_opt(9, 30, 0).unwrap(),
            quote: Quote {
                name: Some("NVIDIA Corp".into()),
                price: Some(880.5),
                ..Quote::default()
            },
            key_statistics: KeyStatistics::default(),
            ibd: IbdCheckup::default(),
            in_ibd50: true,
            checklist: evaluate(&series),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn checklist_sections_in_order() {
        let text = render_checklist(&report(40));
        let headers: Vec<&str> = text.lines().filter(|l| l.starts_with('[')).collect();
        assert_eq!(
            headers,
            vec!["[basics]", "[ibd]", "[yahoo]", "[greenline]", "[uptrend]", "[downtrend]"]
        );
    }

    #[test]
    fn checklist_value_formatting() {
        let text = render_checklist(&report(40));
        assert!(text.contains("equity_name = NVIDIA Corp\n"));
        assert!(text.contains("price = 880.5\n"));
        assert!(text.contains("pe = none\n"));
        assert!(text.contains("in_ibd50 = true\n"));
        assert!(text.contains("last_glt_date = none\n"));
        assert!(text.contains("ath_l2 = true\n"));
        assert!(text.contains("c>30w_avg = undetermined (need 150 bars, have 40)\n"));
    }

    #[test]
    fn writes_checklist_to_symbol_date_file() {
        let dir = TempDir::new().unwrap();
        let adapter = TextReportAdapter::new(dir.path().join("stocks"), dir.path().join("lists"));

        let path = adapter.write_checklist(&report(40), date()).unwrap();

        assert_eq!(path, dir.path().join("stocks").join("NVDA_2024-03-15.txt"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[basics]\ndate = 01/01/2024 09:30:00\nsymbol = NVDA\n"));
    }

    #[test]
    fn writes_stock_list_one_symbol_per_line() {
        let dir = TempDir::new().unwrap();
        let adapter = TextReportAdapter::new(dir.path().join("stocks"), dir.path().join("lists"));
        let symbols = vec!["NVDA".to_string(), "AAPL".to_string()];

        let path = adapter
            .write_stock_list(StockList::Ibd50, date(), &symbols)
            .unwrap();

        assert_eq!(
            path,
            dir.path().join("lists").join("ibd50").join("2024-03-15.txt")
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "NVDA\nAAPL\n");
    }

    #[test]
    fn empty_list_writes_empty_file() {
        let dir = TempDir::new().unwrap();
        let adapter = TextReportAdapter::new(dir.path().join("s"), dir.path().join("l"));
        let path = adapter.write_stock_list(StockList::Funds, date(), &[]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }
}
