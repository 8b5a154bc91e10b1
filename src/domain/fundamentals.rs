//! Fundamental and rating fields gathered alongside the checklist signals.
//!
//! These are passthrough values for the report; nothing in the signal engine
//! reads them.

use crate::domain::checklist::ChecklistSignals;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// One report value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Number(f64),
    Text(String),
    Flag(bool),
    Date(NaiveDate),
    Missing,
}

impl Field {
    /// Numbers parse to `Number`, anything else stays text; blank is missing.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Field::Missing;
        }
        trimmed
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map_or_else(|| Field::Text(trimmed.to_string()), Field::Number)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

impl From<Option<f64>> for Field {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Field::Missing, Field::Number)
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        value.map_or(Field::Missing, Field::Text)
    }
}

impl From<Option<NaiveDate>> for Field {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Field::Missing, Field::Date)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Number(v) => write!(f, "{}", v),
            Field::Text(s) => f.write_str(s),
            Field::Flag(b) => write!(f, "{}", b),
            Field::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Field::Missing => f.write_str("none"),
        }
    }
}

/// Yahoo quote summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub low_52w: Option<f64>,
    pub high_52w: Option<f64>,
    pub percent_from_52w_low: Option<f64>,
    pub percent_from_52w_high: Option<f64>,
    pub pe: Option<f64>,
    pub peg: Option<f64>,
    pub ps: Option<f64>,
    pub market_cap: Option<f64>,
    pub short_ratio: Option<f64>,
}

/// Rows scraped from the Yahoo Key Statistics page, as displayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyStatistics {
    pub short_percent_of_float: Option<String>,
    pub percent_held_by_institutions: Option<String>,
    pub return_on_equity: Option<String>,
    pub float: Option<String>,
}

impl KeyStatistics {
    /// Page labels, matched as substrings of the row's first cell.
    pub const LABELS: [&'static str; 4] = [
        "Short % of Float",
        "% Held by Institutions",
        "Return on Equity",
        "Float",
    ];

    pub fn set(&mut self, label: &str, value: Option<String>) {
        match label {
            "Short % of Float" => self.short_percent_of_float = value,
            "% Held by Institutions" => self.percent_held_by_institutions = value,
            "Return on Equity" => self.return_on_equity = value,
            "Float" => self.float = value,
            _ => {}
        }
    }
}

/// IBD Stock Checkup ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct IbdCheckup {
    pub industry_rank: Field,
    pub next_earning: Option<NaiveDate>,
    pub eps_rating: Field,
    pub eps_change: Field,
    pub eps_growth_3y: Field,
    pub sales_growth_3y: Field,
    pub rs_rating: Field,
    pub acc_distr_rating: Field,
    pub composite_rating: Field,
    pub industry: Option<String>,
    /// 1-based position among the industry's top composite-rated stocks.
    pub industry_top5: Option<usize>,
    pub fundamental_greens: usize,
    pub technical_greens: usize,
}

impl Default for IbdCheckup {
    fn default() -> Self {
        Self {
            industry_rank: Field::Missing,
            next_earning: None,
            eps_rating: Field::Missing,
            eps_change: Field::Missing,
            eps_growth_3y: Field::Missing,
            sales_growth_3y: Field::Missing,
            rs_rating: Field::Missing,
            acc_distr_rating: Field::Missing,
            composite_rating: Field::Missing,
            industry: None,
            industry_top5: None,
            fundamental_greens: 0,
            technical_greens: 0,
        }
    }
}

impl IbdCheckup {
    /// Checkup row labels and the field each one fills.
    pub const LABELS: [(&'static str, &'static str); 9] = [
        ("Industry Group Rank (1 to 197)", "industry_rank"),
        ("EPS Due Date", "next_earning"),
        ("EPS Rating", "eps_rating"),
        ("EPS % Chg (Last Qtr)", "eps_change"),
        ("3 Yr EPS Growth Rate", "3y_eps_growth"),
        ("3 Yr Sales Growth Rate", "3y_sales_growth"),
        ("RS Rating", "rs_rating"),
        ("Accumulation/Distribution Rating", "acc_distr_rating"),
        ("Composite Rating", "ibd_rating"),
    ];

    pub fn set(&mut self, key: &str, raw: &str) {
        let value = Field::parse(raw);
        match key {
            "industry_rank" => self.industry_rank = value,
            "next_earning" => {
                self.next_earning = NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()
            }
            "eps_rating" => self.eps_rating = value,
            "eps_change" => self.eps_change = value,
            "3y_eps_growth" => self.eps_growth_3y = value,
            "3y_sales_growth" => self.sales_growth_3y = value,
            "rs_rating" => self.rs_rating = value,
            "acc_distr_rating" => self.acc_distr_rating = value,
            "ibd_rating" => self.composite_rating = value,
            _ => {}
        }
    }
}

/// Everything written to one symbol's checklist file.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistReport {
    pub symbol: String,
    pub generated_at: NaiveDateTime,
    pub quote: Quote,
    pub key_statistics: KeyStatistics,
    pub ibd: IbdCheckup,
    pub in_ibd50: bool,
    pub checklist: ChecklistSignals,
}

pub type Section = Vec<(&'static str, Field)>;

impl ChecklistReport {
    pub fn basics(&self) -> Section {
        let q = &self.quote;
        vec![
            ("date", Field::Text(self.generated_at.format("%m/%d/%Y %H:%M:%S").to_string())),
            ("symbol", Field::Text(self.symbol.clone())),
            ("equity_name", q.name.clone().into()),
            ("price", q.price.into()),
            ("52w_low", q.low_52w.into()),
            ("52w_high", q.high_52w.into()),
            ("percent_from_52w_low", q.percent_from_52w_low.into()),
            ("percent_from_52w_high", q.percent_from_52w_high.into()),
        ]
    }

    pub fn ibd(&self) -> Section {
        let i = &self.ibd;
        vec![
            ("industry", i.industry.clone().into()),
            ("industry_rank", i.industry_rank.clone()),
            (
                "industry_top5",
                i.industry_top5.map_or(Field::Missing, |p| Field::Number(p as f64)),
            ),
            ("3y_eps_growth", i.eps_growth_3y.clone()),
            ("3y_sales_growth", i.sales_growth_3y.clone()),
            ("eps_change", i.eps_change.clone()),
            ("eps_rating", i.eps_rating.clone()),
            ("rs_rating", i.rs_rating.clone()),
            ("acc_distr_rating", i.acc_distr_rating.clone()),
            ("ibd_rating", i.composite_rating.clone()),
            ("in_ibd50", Field::Flag(self.in_ibd50)),
            ("fundamental_greens", Field::Number(i.fundamental_greens as f64)),
            ("technical_greens", Field::Number(i.technical_greens as f64)),
            ("next_earning", i.next_earning.into()),
        ]
    }

    pub fn yahoo(&self) -> Section {
        let q = &self.quote;
        let ks = &self.key_statistics;
        vec![
            ("pe", q.pe.into()),
            ("peg", q.peg.into()),
            ("ps", q.ps.into()),
            ("market_cap", q.market_cap.into()),
            ("float", ks.float.clone().into()),
            ("annual_roe", ks.return_on_equity.clone().into()),
            ("percent_inst", ks.percent_held_by_institutions.clone().into()),
            ("percent_float_short", ks.short_percent_of_float.clone().into()),
            ("short_ratio", q.short_ratio.into()),
        ]
    }

    pub fn greenline(&self) -> Section {
        let glt = self.checklist.latest_glt;
        vec![
            ("last_glt_date", glt.map(|g| g.date).into()),
            ("last_glt_high", glt.map(|g| g.high).into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_parse() {
        assert_eq!(Field::parse(" 97 "), Field::Number(97.0));
        assert_eq!(Field::parse("1,234.5"), Field::Number(1234.5));
        assert_eq!(Field::parse("B+"), Field::Text("B+".into()));
        assert_eq!(Field::parse("  "), Field::Missing);
        assert_eq!(Field::parse("NaN"), Field::Text("NaN".into()));
    }

    #[test]
    fn field_display() {
        assert_eq!(Field::Number(12.5).to_string(), "12.5");
        assert_eq!(Field::Number(3.0).to_string(), "3");
        assert_eq!(Field::Missing.to_string(), "none");
        assert_eq!(Field::Flag(false).to_string(), "false");
        assert_eq!(
            Field::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()).to_string(),
            "2024-02-01"
        );
    }

    #[test]
    fn checkup_set_parses_due_date() {
        let mut checkup = IbdCheckup::default();
        checkup.set("next_earning", " 04/25/2024 ");
        checkup.set("eps_rating", "99");
        checkup.set("acc_distr_rating", "B-");
        checkup.set("unknown", "1");
        assert_eq!(checkup.next_earning, NaiveDate::from_ymd_opt(2024, 4, 25));
        assert_eq!(checkup.eps_rating, Field::Number(99.0));
        assert_eq!(checkup.acc_distr_rating, Field::Text("B-".into()));
    }

    #[test]
    fn checkup_bad_due_date_is_missing() {
        let mut checkup = IbdCheckup::default();
        checkup.set("next_earning", "N/A");
        assert!(checkup.next_earning.is_none());
    }

    #[test]
    fn key_statistics_set_by_label() {
        let mut ks = KeyStatistics::default();
        ks.set("Float", Some("15.2B".into()));
        ks.set("Short % of Float", Some("1.1%".into()));
        ks.set("Unrelated", Some("x".into()));
        assert_eq!(ks.float.as_deref(), Some("15.2B"));
        assert_eq!(ks.short_percent_of_float.as_deref(), Some("1.1%"));
        assert!(ks.return_on_equity.is_none());
    }
}
