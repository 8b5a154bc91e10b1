//! CLI definition and dispatch.
//!
//! One invocation runs any combination of the three jobs, in this order:
//! stock lists, symbol checklists, Market Pulse download. Pipelines take
//! ports as trait objects so tests can drive them with mocks.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::ibd_adapter::IbdAdapter;
use crate::adapters::pulse_adapter::HttpPulseAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::checklist::evaluate_as_of;
use crate::domain::error::ScoutError;
use crate::domain::fundamentals::ChecklistReport;
use crate::domain::price_series::PriceSeries;
use crate::domain::pulse::{
    days_between, pulse_filename, pulse_urls, DayKind, PulseOutcome, PulseSummary,
};
use crate::domain::session::Session;
use crate::domain::settings::{PriceSource, Settings};
use crate::domain::signal::TrendGroup;
use crate::domain::stock_list::{ListCache, StockList};
use crate::ports::price_port::PriceHistoryPort;
use crate::ports::pulse_port::PulsePort;
use crate::ports::quote_port::QuotePort;
use crate::ports::report_port::ReportPort;
use crate::ports::research_port::ResearchPort;

pub const DEFAULT_CONFIG_FILE: &str = "marketscout.ini";

#[derive(Parser, Debug)]
#[command(
    name = "marketscout",
    version,
    about = "Stock research automation: IBD lists, trend checklists, Market Pulse images"
)]
pub struct Cli {
    /// INI config file (default: ./marketscout.ini when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// IBD lists to download (ibd50, canslim, sectorleaders, spotlight, bigcap,
    /// newhigh, relstrnewhighs, funds, ipos, global, risingprofits) or `all`
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub lists: Vec<String>,

    /// Symbols to run the trend checklist on
    #[arg(long, num_args = 1.., value_name = "SYMBOL")]
    pub symbols: Vec<String>,

    /// Download Market Pulse images from --pulse-start up to today
    #[arg(long)]
    pub pulse: bool,

    /// Inclusive start date, MM/DD/YYYY (default: yesterday)
    #[arg(long, value_parser = parse_us_date, value_name = "MM/DD/YYYY")]
    pub pulse_start: Option<NaiveDate>,

    /// Directory for Market Pulse images (default: pulse)
    #[arg(long)]
    pub pulse_dir: Option<PathBuf>,

    /// Price history source
    #[arg(long, value_parser = parse_price_source, value_name = "yahoo|csv")]
    pub prices: Option<PriceSource>,

    /// Directory of <SYMBOL>.csv files for --prices csv
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,
}

fn parse_us_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .map_err(|e| format!("expected MM/DD/YYYY, got '{}': {}", s, e))
}

fn parse_price_source(s: &str) -> Result<PriceSource, String> {
    s.parse()
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ScoutError> {
    match path {
        Some(path) => FileConfigAdapter::from_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            FileConfigAdapter::from_file(DEFAULT_CONFIG_FILE)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Applies CLI flags over file and environment settings.
pub fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(dir) = &cli.pulse_dir {
        settings.output.pulse_dir = dir.clone();
    }
    if let Some(source) = cli.prices {
        settings.price_source = source;
    }
    if let Some(dir) = &cli.csv_dir {
        settings.csv_dir = Some(dir.clone());
    }
    settings
}

fn execute(cli: Cli) -> Result<(), ScoutError> {
    // Stage 1: settings
    let config = load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(&config, |key| std::env::var(key).ok())?;
    let settings = apply_overrides(settings, &cli);

    let lists = StockList::parse_selection(&cli.lists)?;
    let symbols: Vec<String> = cli.symbols.iter().map(|s| s.trim().to_uppercase()).collect();
    if lists.is_empty() && symbols.is_empty() && !cli.pulse {
        warn!("nothing to do: pass --lists, --symbols or --pulse");
        return Ok(());
    }

    let now = Local::now().naive_local();
    let today = now.date();
    let report = TextReportAdapter::new(
        settings.output.stocks_dir.clone(),
        settings.output.lists_dir.clone(),
    );

    // Stage 2: research site jobs, one sign-in for both
    if !lists.is_empty() || !symbols.is_empty() {
        let credentials = settings.require_credentials()?;
        let research = IbdAdapter::new(&settings.http)?;
        let session = research.sign_in(credentials)?;
        let mut cache = ListCache::new();

        if !lists.is_empty() {
            run_lists_pipeline(&research, &report, &session, &lists, &mut cache, today)?;
        }

        if !symbols.is_empty() {
            let yahoo = YahooAdapter::new(&settings.http)?;
            let csv;
            let prices: &dyn PriceHistoryPort = match settings.price_source {
                PriceSource::Yahoo => &yahoo,
                PriceSource::Csv => {
                    csv = CsvAdapter::new(settings.require_csv_dir()?.clone());
                    &csv
                }
            };
            let sources = ChecklistSources {
                prices,
                quotes: &yahoo,
                research: &research,
            };
            let summary =
                run_checklist_pipeline(&sources, &report, &session, &symbols, &mut cache, now)?;
            if summary.written.is_empty() {
                if let Some((_, err)) = summary.failed.into_iter().next() {
                    return Err(err);
                }
            }
        }
    }

    // Stage 3: Market Pulse
    if cli.pulse {
        let start = cli.pulse_start.unwrap_or(today - Duration::days(1));
        let pulse = HttpPulseAdapter::new(&settings.http)?;
        run_pulse_pipeline(&pulse, &settings.output.pulse_dir, start, today)?;
    }

    Ok(())
}

/// Fetches and writes each list.
pub fn run_lists_pipeline(
    research: &dyn ResearchPort,
    report: &dyn ReportPort,
    session: &Session,
    lists: &[StockList],
    cache: &mut ListCache,
    today: NaiveDate,
) -> Result<Vec<PathBuf>, ScoutError> {
    let mut written = Vec::with_capacity(lists.len());
    for &list in lists {
        let symbols = cache.get_or_fetch(list, today, || research.fetch_list(session, list))?;
        written.push(report.write_stock_list(list, today, symbols)?);
    }
    Ok(written)
}

/// Providers the checklist draws on.
pub struct ChecklistSources<'a> {
    pub prices: &'a dyn PriceHistoryPort,
    pub quotes: &'a dyn QuotePort,
    pub research: &'a dyn ResearchPort,
}

#[derive(Debug, Default)]
pub struct ChecklistSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, ScoutError)>,
}

/// Builds one symbol's report.
///
/// Price history failures fail the symbol. Quote, key statistics and checkup
/// failures only blank their fields.
pub fn build_checklist_report(
    sources: &ChecklistSources<'_>,
    session: &Session,
    symbol: &str,
    ibd50: &[String],
    now: NaiveDateTime,
) -> Result<ChecklistReport, ScoutError> {
    let today = now.date();
    // full history: the all-time high needs every bar
    let bars = sources
        .prices
        .fetch_history(symbol, NaiveDate::default(), today)?;
    let series = PriceSeries::new(symbol, bars)?;
    let checklist = evaluate_as_of(&series, today);

    for (key, shortfall) in checklist.signals.undetermined() {
        warn!(symbol, signal = key, required = shortfall.required, available = shortfall.available, "signal undetermined");
    }

    let quote = sources.quotes.fetch_quote(symbol).unwrap_or_else(|e| {
        warn!(symbol, error = %e, "quote unavailable");
        Default::default()
    });
    let key_statistics = sources
        .quotes
        .fetch_key_statistics(symbol)
        .unwrap_or_else(|e| {
            warn!(symbol, error = %e, "key statistics unavailable");
            Default::default()
        });
    let ibd = sources
        .research
        .fetch_checkup(session, symbol)
        .unwrap_or_else(|e| {
            warn!(symbol, error = %e, "stock checkup unavailable");
            Default::default()
        });

    Ok(ChecklistReport {
        symbol: symbol.to_string(),
        generated_at: now,
        quote,
        key_statistics,
        ibd,
        in_ibd50: ibd50.iter().any(|s| s == symbol),
        checklist,
    })
}

/// Runs the checklist for each symbol; a failing symbol is logged and skipped.
pub fn run_checklist_pipeline(
    sources: &ChecklistSources<'_>,
    report: &dyn ReportPort,
    session: &Session,
    symbols: &[String],
    cache: &mut ListCache,
    now: NaiveDateTime,
) -> Result<ChecklistSummary, ScoutError> {
    let today = now.date();
    let ibd50 = cache
        .get_or_fetch(StockList::Ibd50, today, || {
            sources.research.fetch_list(session, StockList::Ibd50)
        })?
        .to_vec();

    let mut summary = ChecklistSummary::default();
    for symbol in symbols {
        let result = build_checklist_report(sources, session, symbol, &ibd50, now)
            .and_then(|r| {
                let path = report.write_checklist(&r, today)?;
                Ok((r, path))
            });
        match result {
            Ok((r, path)) => {
                info!(
                    symbol = %symbol,
                    uptrend = r.checklist.signals.count_true(TrendGroup::Uptrend),
                    downtrend = r.checklist.signals.count_true(TrendGroup::Downtrend),
                    "checklist complete"
                );
                summary.written.push(path);
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol");
                summary.failed.push((symbol.clone(), e));
            }
        }
    }
    Ok(summary)
}

/// Downloads Market Pulse images for each day in `[start, end)`.
pub fn run_pulse_pipeline(
    pulse: &dyn PulsePort,
    dir: &Path,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PulseSummary, ScoutError> {
    fs::create_dir_all(dir)?;
    let mut summary = PulseSummary::default();

    for day in days_between(start, end) {
        let kind = DayKind::classify(day);
        if !kind.attempt_download() {
            info!(%day, "weekend");
            summary.record(day, PulseOutcome::Weekend);
            continue;
        }
        if let DayKind::Holiday(holiday) = kind {
            info!(%day, holiday = holiday.name, "holiday, trying anyway");
        }

        let path = dir.join(pulse_filename(day));
        if path.exists() {
            info!(%day, path = %path.display(), "already downloaded");
            summary.record(day, PulseOutcome::AlreadyPresent(path));
            continue;
        }

        let mut image = None;
        for url in pulse_urls(day) {
            if let Some(bytes) = pulse.fetch_image(&url)? {
                image = Some(bytes);
                break;
            }
        }
        match image {
            Some(bytes) => {
                fs::write(&path, bytes)?;
                info!(%day, path = %path.display(), "downloaded");
                summary.record(day, PulseOutcome::Downloaded(path));
            }
            None => {
                warn!(%day, "no Market Pulse image");
                summary.record(day, PulseOutcome::Missing);
            }
        }
    }

    info!(
        downloaded = summary.downloaded(),
        already_present = summary.already_present(),
        missing = summary.missing(),
        weekends = summary.weekends(),
        "pulse run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "marketscout",
            "--lists",
            "ibd50",
            "funds",
            "--symbols",
            "nvda",
            "--pulse",
            "--pulse-start",
            "03/01/2024",
            "--prices",
            "csv",
        ])
        .unwrap();
        assert_eq!(cli.lists, vec!["ibd50", "funds"]);
        assert_eq!(cli.symbols, vec!["nvda"]);
        assert!(cli.pulse);
        assert_eq!(cli.pulse_start, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(cli.prices, Some(PriceSource::Csv));
    }

    #[test]
    fn rejects_iso_pulse_start() {
        assert!(Cli::try_parse_from(["marketscout", "--pulse-start", "2024-03-01"]).is_err());
    }

    #[test]
    fn rejects_unknown_price_source() {
        assert!(Cli::try_parse_from(["marketscout", "--prices", "bloomberg"]).is_err());
    }

    #[test]
    fn overrides_win_over_settings() {
        let settings = Settings::resolve(&FileConfigAdapter::empty(), |_| None).unwrap();
        let cli = Cli::try_parse_from([
            "marketscout",
            "--pulse-dir",
            "/tmp/mp",
            "--prices",
            "csv",
            "--csv-dir",
            "prices",
        ])
        .unwrap();
        let settings = apply_overrides(settings, &cli);
        assert_eq!(settings.output.pulse_dir, PathBuf::from("/tmp/mp"));
        assert_eq!(settings.price_source, PriceSource::Csv);
        assert_eq!(settings.csv_dir, Some(PathBuf::from("prices")));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/marketscout.ini")));
        assert!(matches!(result, Err(ScoutError::ConfigParse { .. })));
    }
}
