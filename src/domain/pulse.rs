//! Market Pulse image naming and day classification.

use crate::domain::calendar::{holiday_on, Holiday};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::path::PathBuf;

const UPLOADS_BASE: &str = "http://www.investors.com/wp-content/uploads";

/// Candidate image URLs for `date`, primary first.
pub fn pulse_urls(date: NaiveDate) -> [String; 2] {
    let folder = format!("{}/{}/{:02}", UPLOADS_BASE, date.year(), date.month());
    let stamp = date.format("%m%d%y");
    [
        format!("{}/MP{}.png", folder, stamp),
        format!("{}/MP4-3_{}.png", folder, stamp),
    ]
}

pub fn pulse_filename(date: NaiveDate) -> String {
    date.format("%Y.%m.%d.png").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekend,
    Holiday(Holiday),
    Weekday,
}

impl DayKind {
    pub fn classify(date: NaiveDate) -> Self {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return DayKind::Weekend;
        }
        holiday_on(date).map_or(DayKind::Weekday, DayKind::Holiday)
    }

    /// Holidays are still attempted; the image is sometimes published.
    pub fn attempt_download(&self) -> bool {
        !matches!(self, DayKind::Weekend)
    }
}

/// Days in `[start, end)`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let count = (end - start).num_days().max(0);
    (0..count).map(move |n| start + Duration::days(n))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PulseOutcome {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
    Missing,
    Weekend,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulseSummary {
    pub days: Vec<(NaiveDate, PulseOutcome)>,
}

impl PulseSummary {
    pub fn record(&mut self, date: NaiveDate, outcome: PulseOutcome) {
        self.days.push((date, outcome));
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, PulseOutcome::Downloaded(_)))
    }

    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, PulseOutcome::AlreadyPresent(_)))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, PulseOutcome::Missing))
    }

    pub fn weekends(&self) -> usize {
        self.count(|o| matches!(o, PulseOutcome::Weekend))
    }

    fn count(&self, pred: impl Fn(&PulseOutcome) -> bool) -> usize {
        self.days.iter().filter(|(_, o)| pred(o)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn urls_use_two_digit_fields() {
        let [primary, alternate] = pulse_urls(d(2017, 3, 7));
        assert_eq!(
            primary,
            "http://www.investors.com/wp-content/uploads/2017/03/MP030717.png"
        );
        assert_eq!(
            alternate,
            "http://www.investors.com/wp-content/uploads/2017/03/MP4-3_030717.png"
        );
    }

    #[test]
    fn filename_is_dotted_date() {
        assert_eq!(pulse_filename(d(2024, 1, 5)), "2024.01.05.png");
    }

    #[test]
    fn classify_days() {
        assert_eq!(DayKind::classify(d(2024, 3, 9)), DayKind::Weekend);
        assert_eq!(DayKind::classify(d(2024, 3, 10)), DayKind::Weekend);
        assert_eq!(DayKind::classify(d(2024, 3, 11)), DayKind::Weekday);
        assert!(matches!(
            DayKind::classify(d(2024, 7, 4)),
            DayKind::Holiday(h) if h.name == "Independence Day"
        ));
        assert!(DayKind::classify(d(2024, 7, 4)).attempt_download());
        assert!(!DayKind::Weekend.attempt_download());
    }

    #[test]
    fn range_excludes_end() {
        let days: Vec<_> = days_between(d(2024, 2, 27), d(2024, 3, 1)).collect();
        assert_eq!(days, vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29)]);
        assert_eq!(days_between(d(2024, 3, 1), d(2024, 3, 1)).count(), 0);
        assert_eq!(days_between(d(2024, 3, 2), d(2024, 3, 1)).count(), 0);
    }

    #[test]
    fn summary_counts() {
        let mut summary = PulseSummary::default();
        summary.record(d(2024, 3, 8), PulseOutcome::Downloaded("a".into()));
        summary.record(d(2024, 3, 9), PulseOutcome::Weekend);
        summary.record(d(2024, 3, 11), PulseOutcome::Missing);
        summary.record(d(2024, 3, 12), PulseOutcome::AlreadyPresent("b".into()));
        assert_eq!(summary.downloaded(), 1);
        assert_eq!(summary.weekends(), 1);
        assert_eq!(summary.missing(), 1);
        assert_eq!(summary.already_present(), 1);
    }
}
