//! Daily price bar.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// True when every price field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        }
    }

    #[test]
    fn finite_bar() {
        assert!(sample_bar().is_finite());
    }

    #[test]
    fn nan_close_is_not_finite() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(!bar.is_finite());
    }
}
