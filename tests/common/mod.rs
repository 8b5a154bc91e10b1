#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use marketscout::domain::error::ScoutError;
use marketscout::domain::fundamentals::{IbdCheckup, KeyStatistics, Quote};
pub use marketscout::domain::ohlcv::PriceBar;
use marketscout::domain::price_series::PriceSeries;
use marketscout::domain::session::{Credentials, Session};
use marketscout::domain::stock_list::StockList;
use marketscout::ports::price_port::PriceHistoryPort;
use marketscout::ports::pulse_port::PulsePort;
use marketscout::ports::quote_port::QuotePort;
use marketscout::ports::research_port::ResearchPort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceHistoryPort for MockPricePort {
    fn fetch_history(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PriceBar>, ScoutError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScoutError::Http {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| ScoutError::NoData {
                symbol: symbol.to_string(),
            })
    }
}

/// Quote port that always fails, so reports fall back to missing fields.
pub struct UnavailableQuotes;

impl QuotePort for UnavailableQuotes {
    fn fetch_quote(&self, _symbol: &str) -> Result<Quote, ScoutError> {
        Err(ScoutError::Http {
            reason: "quote service down".into(),
        })
    }

    fn fetch_key_statistics(&self, _symbol: &str) -> Result<KeyStatistics, ScoutError> {
        Err(ScoutError::Http {
            reason: "key statistics down".into(),
        })
    }
}

pub struct FixedQuotes(pub Quote);

impl QuotePort for FixedQuotes {
    fn fetch_quote(&self, _symbol: &str) -> Result<Quote, ScoutError> {
        Ok(self.0.clone())
    }

    fn fetch_key_statistics(&self, _symbol: &str) -> Result<KeyStatistics, ScoutError> {
        Ok(KeyStatistics::default())
    }
}

pub struct MockResearchPort {
    pub lists: HashMap<StockList, Vec<String>>,
    pub reject_sign_in: bool,
    pub list_calls: Cell<usize>,
    pub checkup_calls: RefCell<Vec<String>>,
}

impl MockResearchPort {
    pub fn new() -> Self {
        Self {
            lists: HashMap::new(),
            reject_sign_in: false,
            list_calls: Cell::new(0),
            checkup_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_list(mut self, list: StockList, symbols: &[&str]) -> Self {
        self.lists
            .insert(list, symbols.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn rejecting_sign_in(mut self) -> Self {
        self.reject_sign_in = true;
        self
    }
}

impl ResearchPort for MockResearchPort {
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, ScoutError> {
        if self.reject_sign_in {
            return Err(ScoutError::Auth {
                username: credentials.username.clone(),
                reason: "bad password".into(),
            });
        }
        Ok(Session::from_set_cookies(&credentials.username, ["session=ok"]))
    }

    fn fetch_list(&self, _session: &Session, list: StockList) -> Result<Vec<String>, ScoutError> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(self.lists.get(&list).cloned().unwrap_or_default())
    }

    fn fetch_checkup(&self, _session: &Session, symbol: &str) -> Result<IbdCheckup, ScoutError> {
        self.checkup_calls.borrow_mut().push(symbol.to_string());
        Ok(IbdCheckup {
            industry: Some("Semiconductors".into()),
            ..IbdCheckup::default()
        })
    }
}

/// Serves images for the listed URLs; everything else is a 404.
pub struct MockPulsePort {
    pub images: HashMap<String, Vec<u8>>,
    pub requested: RefCell<Vec<String>>,
}

impl MockPulsePort {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }
}

impl PulsePort for MockPulsePort {
    fn fetch_image(&self, url: &str) -> Result<Option<Vec<u8>>, ScoutError> {
        self.requested.borrow_mut().push(url.to_string());
        Ok(self.images.get(url).cloned())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day from 2020-01-01 with the given closes.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let start = date(2020, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new("TEST", bars_from_closes(closes)).unwrap()
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "trader@example.com".into(),
        password: "pw".into(),
    }
}
