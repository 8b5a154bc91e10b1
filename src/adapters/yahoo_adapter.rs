//! Yahoo Finance adapter: daily chart history, quote summary and the
//! Key Statistics page.
//!
//! Yahoo has no official API and changes its responses without notice. Fields
//! that disappear come back as `None`; a chart response without bars is an
//! error.

use crate::adapters::http::{build_client, read_text, request_error};
use crate::domain::error::ScoutError;
use crate::domain::fundamentals::{KeyStatistics, Quote};
use crate::domain::ohlcv::PriceBar;
use crate::domain::settings::HttpSettings;
use crate::ports::price_port::PriceHistoryPort;
use crate::ports::quote_port::QuotePort;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::{debug, info};

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const QUOTE_BASE: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const KEY_STATS_BASE: &str = "https://finance.yahoo.com/quote";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    result: Vec<QuoteRow>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuoteRow {
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
    fifty_two_week_low: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low_change_percent: Option<f64>,
    fifty_two_week_high_change_percent: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    peg_ratio: Option<f64>,
    price_to_sales_trailing12_months: Option<f64>,
    market_cap: Option<f64>,
    short_ratio: Option<f64>,
}

pub struct YahooAdapter {
    client: Client,
}

impl YahooAdapter {
    pub fn new(settings: &HttpSettings) -> Result<Self, ScoutError> {
        Ok(Self {
            client: build_client(settings)?,
        })
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{CHART_BASE}/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d&events=history"
        )
    }

    fn get(&self, url: &str) -> Result<String, ScoutError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().map_err(|e| request_error(url, e))?;
        read_text(url, response)
    }
}

/// Bars from a v8 chart body. Bars with any missing OHLC value are dropped;
/// a second bar for the same date replaces the first.
pub fn parse_chart(symbol: &str, body: &str) -> Result<Vec<PriceBar>, ScoutError> {
    let source = format!("Yahoo chart for {}", symbol);
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| ScoutError::parse(&source, e))?;

    let data = match (response.chart.result, response.chart.error) {
        (_, Some(err)) if err.code == "Not Found" => {
            return Err(ScoutError::NoData {
                symbol: symbol.to_string(),
            });
        }
        (_, Some(err)) => {
            return Err(ScoutError::parse(
                &source,
                format!("{}: {}", err.code, err.description),
            ));
        }
        (Some(result), None) => result.into_iter().next(),
        (None, None) => None,
    }
    .ok_or_else(|| ScoutError::NoData {
        symbol: symbol.to_string(),
    })?;

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ScoutError::parse(&source, "no quote columns"))?;

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| ScoutError::parse(&source, format!("invalid timestamp {}", ts)))?;
        let column = |values: &[Option<f64>]| values.get(i).copied().flatten();
        match (
            column(&quote.open),
            column(&quote.high),
            column(&quote.low),
            column(&quote.close),
        ) {
            (Some(open), Some(high), Some(low), Some(close)) => {
                let bar = PriceBar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
                };
                // the live bar can repeat the last daily bar's date
                match bars.last_mut() {
                    Some(prev) if prev.date == date => {
                        debug!(symbol, %date, "replacing duplicate bar");
                        *prev = bar;
                    }
                    _ => bars.push(bar),
                }
            }
            _ => debug!(symbol, %date, "skipping incomplete bar"),
        }
    }

    if bars.is_empty() {
        return Err(ScoutError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(bars)
}

pub fn parse_quote(symbol: &str, body: &str) -> Result<Quote, ScoutError> {
    let source = format!("Yahoo quote for {}", symbol);
    let response: QuoteResponse =
        serde_json::from_str(body).map_err(|e| ScoutError::parse(&source, e))?;
    if let Some(err) = response.quote_response.error {
        return Err(ScoutError::parse(
            &source,
            format!("{}: {}", err.code, err.description),
        ));
    }
    let row = response
        .quote_response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ScoutError::NoData {
            symbol: symbol.to_string(),
        })?;

    Ok(Quote {
        name: row.long_name.or(row.short_name),
        price: row.regular_market_price,
        low_52w: row.fifty_two_week_low,
        high_52w: row.fifty_two_week_high,
        percent_from_52w_low: row.fifty_two_week_low_change_percent.map(|f| f * 100.0),
        percent_from_52w_high: row.fifty_two_week_high_change_percent.map(|f| f * 100.0),
        pe: row.trailing_pe,
        peg: row.peg_ratio,
        ps: row.price_to_sales_trailing12_months,
        market_cap: row.market_cap,
        short_ratio: row.short_ratio,
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn is_leaf_cell(cell: ElementRef<'_>) -> bool {
    !cell
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == "td")
}

/// Key Statistics rows: the value is the cell right after the label cell.
///
/// A cell starting with the label wins over one merely containing it, so
/// `Float` does not resolve to the `Short % of Float` row.
pub fn parse_key_statistics(body: &str) -> Result<KeyStatistics, ScoutError> {
    let document = Html::parse_document(body);
    let td = Selector::parse("td").map_err(|e| ScoutError::parse("key statistics selector", e))?;
    // Only innermost cells: a layout cell wrapping a nested table would
    // otherwise match every label.
    let cells: Vec<ElementRef<'_>> = document.select(&td).filter(|c| is_leaf_cell(*c)).collect();

    let mut stats = KeyStatistics::default();
    for label in KeyStatistics::LABELS {
        let label_cell = cells
            .iter()
            .find(|c| cell_text(**c).starts_with(label))
            .or_else(|| cells.iter().find(|c| cell_text(**c).contains(label)));
        let value = label_cell
            .and_then(|c| c.next_siblings().find_map(ElementRef::wrap))
            .map(cell_text)
            .filter(|v| !v.is_empty());
        stats.set(label, value);
    }
    Ok(stats)
}

impl PriceHistoryPort for YahooAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScoutError> {
        let body = self.get(&Self::chart_url(symbol, start, end))?;
        let bars = parse_chart(symbol, &body)?;
        info!(symbol, bars = bars.len(), "fetched price history");
        Ok(bars)
    }
}

impl QuotePort for YahooAdapter {
    fn fetch_quote(&self, symbol: &str) -> Result<Quote, ScoutError> {
        let body = self.get(&format!("{QUOTE_BASE}?symbols={symbol}"))?;
        parse_quote(symbol, &body)
    }

    fn fetch_key_statistics(&self, symbol: &str) -> Result<KeyStatistics, ScoutError> {
        let body = self.get(&format!("{KEY_STATS_BASE}/{symbol}/key-statistics"))?;
        parse_key_statistics(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_series::PriceSeries;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, 101.0, null],
                        "high":   [102.0, 103.5, 104.0],
                        "low":    [ 99.0, 100.5, 101.0],
                        "close":  [101.5, 103.0, 103.2],
                        "volume": [1000, null, 1200]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn chart_bars_parsed_and_incomplete_dropped() {
        let bars = parse_chart("AAPL", CHART).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 101.5);
        assert_eq!(bars[1].volume, 0);
    }

    #[test]
    fn chart_same_day_bars_keep_the_last() {
        // 2024-01-02 14:30 UTC daily bar, then 20:59 UTC live bar
        let body = r#"{"chart":{"result":[{
            "timestamp": [1704205800, 1704229140],
            "indicators": {"quote": [{
                "open": [100.0, 100.0],
                "high": [102.0, 104.0],
                "low": [99.0, 99.0],
                "close": [101.5, 103.7],
                "volume": [1000, 1500]
            }]}
        }],"error":null}}"#;
        let bars = parse_chart("AAPL", body).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 103.7);
        assert_eq!(bars[0].volume, 1500);
        assert!(PriceSeries::new("AAPL", bars).is_ok());
    }

    #[test]
    fn chart_not_found_is_no_data() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            parse_chart("ZZZZ", body),
            Err(ScoutError::NoData { symbol }) if symbol == "ZZZZ"
        ));
    }

    #[test]
    fn chart_garbage_is_parse_error() {
        assert!(matches!(
            parse_chart("AAPL", "<html>"),
            Err(ScoutError::Parse { .. })
        ));
    }

    #[test]
    fn chart_without_timestamps_is_no_data() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{"open":[],"high":[],"low":[],"close":[],"volume":[]}]}}],"error":null}}"#;
        assert!(matches!(parse_chart("NEW", body), Err(ScoutError::NoData { .. })));
    }

    #[test]
    fn chart_url_covers_end_day() {
        let url = YahooAdapter::chart_url(
            "MSFT",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        assert!(url.contains("/MSFT?period1=1704067200&period2=1704240000"));
    }

    #[test]
    fn quote_fields_mapped() {
        let body = r#"{"quoteResponse":{"result":[{
            "shortName":"Apple Inc.",
            "regularMarketPrice":190.5,
            "fiftyTwoWeekLow":124.17,
            "fiftyTwoWeekHigh":199.62,
            "fiftyTwoWeekLowChangePercent":0.5,
            "fiftyTwoWeekHighChangePercent":-0.05,
            "trailingPE":31.2,
            "marketCap":2950000000000
        }],"error":null}}"#;
        let quote = parse_quote("AAPL", body).unwrap();
        assert_eq!(quote.name.as_deref(), Some("Apple Inc."));
        assert_eq!(quote.price, Some(190.5));
        assert_eq!(quote.percent_from_52w_low, Some(50.0));
        assert_eq!(quote.percent_from_52w_high, Some(-5.0));
        assert_eq!(quote.pe, Some(31.2));
        assert_eq!(quote.peg, None);
        assert_eq!(quote.market_cap, Some(2.95e12));
    }

    #[test]
    fn quote_empty_result_is_no_data() {
        let body = r#"{"quoteResponse":{"result":[],"error":null}}"#;
        assert!(matches!(parse_quote("X", body), Err(ScoutError::NoData { .. })));
    }

    #[test]
    fn key_statistics_rows() {
        let body = r#"<html><body><table>
            <tr><td>Short % of Float 4</td><td>0.71%</td></tr>
            <tr><td>Float</td><td> 15.44B </td></tr>
            <tr><td>% Held by Institutions 1</td><td>61.20%</td></tr>
            </table></body></html>"#;
        let stats = parse_key_statistics(body).unwrap();
        assert_eq!(stats.short_percent_of_float.as_deref(), Some("0.71%"));
        assert_eq!(stats.float.as_deref(), Some("15.44B"));
        assert_eq!(stats.percent_held_by_institutions.as_deref(), Some("61.20%"));
        assert_eq!(stats.return_on_equity, None);
    }

    #[test]
    fn key_statistics_ignore_layout_cells() {
        let body = r#"<html><body><table><tr>
            <td><table>
              <tr><td><span>Float</span> 8</td><td>15.44B</td></tr>
              <tr><td>Return on Equity (ttm)</td><td>54.61%</td></tr>
            </table></td>
            <td>sidebar</td>
        </tr></table></body></html>"#;
        let stats = parse_key_statistics(body).unwrap();
        assert_eq!(stats.float.as_deref(), Some("15.44B"));
        assert_eq!(stats.return_on_equity.as_deref(), Some("54.61%"));
    }

    #[test]
    fn key_statistics_missing_page_structure() {
        let stats = parse_key_statistics("<html><p>Service unavailable</p></html>").unwrap();
        assert_eq!(stats, KeyStatistics::default());
    }
}
