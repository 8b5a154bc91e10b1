//! Investor's Business Daily adapter: member sign-in, curated stock lists and
//! the Stock Checkup page.

use crate::adapters::http::{build_client, ensure_success, read_text, request_error};
use crate::domain::error::ScoutError;
use crate::domain::fundamentals::IbdCheckup;
use crate::domain::session::{Credentials, Session};
use crate::domain::settings::HttpSettings;
use crate::domain::stock_list::StockList;
use crate::ports::research_port::ResearchPort;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const SIGN_IN_URL: &str =
    "https://myibd.investors.com/Services/SiteAjaxService.asmx/MemberSingIn";
const LIST_SERVICE_URL: &str = "http://research.investors.com/Services/SiteAjaxService.asmx";
const CHECKUP_URL: &str = "http://research.investors.com/stockcheckup.aspx";
const JSON_CONTENT: &str = "application/json; charset=utf-8";
const INDUSTRY_LABEL: &str = "Industry Group";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    str_email: &'a str,
    str_password: &'a str,
    bln_remember: bool,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    d: ListData,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(rename = "ETablesDataList", default)]
    rows: Vec<ListRow>,
}

#[derive(Debug, Deserialize)]
struct ListRow {
    #[serde(rename = "Symbol")]
    symbol: String,
}

pub struct IbdAdapter {
    client: Client,
}

impl IbdAdapter {
    pub fn new(settings: &HttpSettings) -> Result<Self, ScoutError> {
        Ok(Self {
            client: build_client(settings)?,
        })
    }

    fn get_with_session(&self, session: &Session, url: &str) -> Result<String, ScoutError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, JSON_CONTENT)
            .header(COOKIE, session.cookie.as_str())
            .send()
            .map_err(|e| request_error(url, e))?;
        read_text(url, response)
    }
}

pub fn list_url(list: StockList) -> String {
    let endpoint = list.endpoint();
    format!("{}/{}?{}", LIST_SERVICE_URL, endpoint.method, endpoint.query())
}

pub fn parse_list(list: StockList, body: &str) -> Result<Vec<String>, ScoutError> {
    let response: ListResponse = serde_json::from_str(body)
        .map_err(|e| ScoutError::parse(format!("{} list", list), e))?;
    Ok(response
        .d
        .rows
        .into_iter()
        .map(|row| row.symbol.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

fn selector(css: &str) -> Result<Selector, ScoutError> {
    Selector::parse(css).map_err(|e| ScoutError::parse(format!("selector {}", css), e))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Text nodes directly under `element`, ignoring nested elements.
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|n| n.value().as_text())
        .map(|t| &**t)
        .collect()
}

/// A label cell holds the label in its own text or in a direct child's own
/// text. Outer layout cells wrapping whole tables never match.
fn is_label_cell(cell: ElementRef<'_>, label: &str) -> bool {
    own_text(cell).contains(label)
        || cell
            .children()
            .filter_map(ElementRef::wrap)
            .any(|child| own_text(child).contains(label))
}

/// Extracts the checkup ratings. Missing rows leave the field at its default.
pub fn parse_checkup(symbol: &str, body: &str) -> Result<IbdCheckup, ScoutError> {
    let document = Html::parse_document(body);
    let mut checkup = IbdCheckup::default();

    // The label sits in an element inside a <td>; the value is the next <td>.
    let td = selector("td")?;
    let cells: Vec<ElementRef<'_>> = document.select(&td).collect();
    for (label, key) in IbdCheckup::LABELS {
        let value = cells
            .iter()
            .find(|cell| is_label_cell(**cell, label))
            .and_then(|cell| cell.next_siblings().find_map(ElementRef::wrap))
            .map(|cell| text_of(cell).trim().to_string());
        if let Some(value) = value {
            checkup.set(key, &value);
        }
    }

    checkup.industry = document
        .select(&selector("#groupName")?)
        .next()
        .map(|e| {
            let raw = text_of(e);
            let trimmed = raw.trim_matches(|c: char| c == ' ' || c == ':');
            trimmed
                .strip_prefix(INDUSTRY_LABEL)
                .unwrap_or(trimmed)
                .trim_matches(|c: char| c == ' ' || c == ':')
                .to_string()
        })
        .filter(|s| !s.is_empty());

    checkup.industry_top5 = document
        .select(&selector("#divComposite .stockRoll")?)
        .position(|e| text_of(e).trim() == symbol)
        .map(|i| i + 1);

    let greens = |section: &str| -> Result<usize, ScoutError> {
        let css = format!("#{} a.passDef[rel=\"#cluetipPass\"]", section);
        Ok(document.select(&selector(&css)?).count())
    };
    checkup.fundamental_greens = greens("Fundamentals")?;
    checkup.technical_greens = greens("Technicals")?;

    Ok(checkup)
}

impl ResearchPort for IbdAdapter {
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, ScoutError> {
        let auth_error = |reason: String| ScoutError::Auth {
            username: credentials.username.clone(),
            reason,
        };
        let request = SignInRequest {
            str_email: &credentials.username,
            str_password: &credentials.password,
            bln_remember: false,
        };
        let response = self
            .client
            .post(SIGN_IN_URL)
            .json(&request)
            .send()
            .map_err(|e| request_error(SIGN_IN_URL, e))?;
        let response = ensure_success(SIGN_IN_URL, response)
            .map_err(|e| auth_error(e.to_string()))?;

        let session = Session::from_set_cookies(
            &credentials.username,
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        );
        if !session.has_cookies() {
            return Err(auth_error("sign-in returned no session cookie".to_string()));
        }
        info!(username = %credentials.username, "signed in to IBD");
        Ok(session)
    }

    fn fetch_list(&self, session: &Session, list: StockList) -> Result<Vec<String>, ScoutError> {
        let body = self.get_with_session(session, &list_url(list))?;
        let symbols = parse_list(list, &body)?;
        info!(list = %list, symbols = symbols.len(), "fetched stock list");
        Ok(symbols)
    }

    fn fetch_checkup(&self, session: &Session, symbol: &str) -> Result<IbdCheckup, ScoutError> {
        let url = format!("{}?symbol={}", CHECKUP_URL, symbol);
        let body = self.get_with_session(session, &url)?;
        parse_checkup(symbol, &body)
    }
}
