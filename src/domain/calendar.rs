//! US federal holiday calendar.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holiday {
    pub name: &'static str,
    pub date: NaiveDate,
}

const JUNETEENTH_FIRST_YEAR: i32 = 2021;

/// Saturday holidays are observed on Friday, Sunday holidays on Monday.
fn nearest_workday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

fn fixed(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).map(nearest_workday)
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = first_of_next - Duration::days(1);
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    Some(last - Duration::days(i64::from(back)))
}

/// Observed federal holidays falling in `year`, in calendar order.
///
/// A New Year's Day on Saturday is observed on December 31 of the previous
/// year, so it shows up in that year's list.
pub fn federal_holidays(year: i32) -> Vec<Holiday> {
    let mut holidays: Vec<Holiday> = [
        ("New Year's Day", fixed(year, 1, 1)),
        ("New Year's Day", fixed(year + 1, 1, 1)),
        ("Martin Luther King Jr. Day", nth_weekday(year, 1, Weekday::Mon, 3)),
        ("Presidents Day", nth_weekday(year, 2, Weekday::Mon, 3)),
        ("Memorial Day", last_weekday(year, 5, Weekday::Mon)),
        (
            "Juneteenth",
            (year >= JUNETEENTH_FIRST_YEAR)
                .then(|| fixed(year, 6, 19))
                .flatten(),
        ),
        ("Independence Day", fixed(year, 7, 4)),
        ("Labor Day", nth_weekday(year, 9, Weekday::Mon, 1)),
        ("Columbus Day", nth_weekday(year, 10, Weekday::Mon, 2)),
        ("Veterans Day", fixed(year, 11, 11)),
        ("Thanksgiving", nth_weekday(year, 11, Weekday::Thu, 4)),
        ("Christmas", fixed(year, 12, 25)),
    ]
    .into_iter()
    .filter_map(|(name, date)| date.map(|date| Holiday { name, date }))
    .filter(|h| h.date.year() == year)
    .collect();
    holidays.sort_by_key(|h| h.date);
    holidays
}

/// The federal holiday observed on `date`, if any.
pub fn holiday_on(date: NaiveDate) -> Option<Holiday> {
    federal_holidays(date.year())
        .into_iter()
        .find(|h| h.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn holidays_2024() {
        let dates: Vec<NaiveDate> = federal_holidays(2024).iter().map(|h| h.date).collect();
        assert_eq!(
            dates,
            vec![
                d(2024, 1, 1),
                d(2024, 1, 15),
                d(2024, 2, 19),
                d(2024, 5, 27),
                d(2024, 6, 19),
                d(2024, 7, 4),
                d(2024, 9, 2),
                d(2024, 10, 14),
                d(2024, 11, 11),
                d(2024, 11, 28),
                d(2024, 12, 25),
            ]
        );
    }

    #[test]
    fn juneteenth_only_from_2021() {
        assert!(holiday_on(d(2020, 6, 19)).is_none());
        assert_eq!(holiday_on(d(2021, 6, 18)).unwrap().name, "Juneteenth");
    }

    #[test]
    fn saturday_observed_on_friday() {
        // July 4, 2020 was a Saturday
        assert_eq!(holiday_on(d(2020, 7, 3)).unwrap().name, "Independence Day");
        assert!(holiday_on(d(2020, 7, 4)).is_none());
    }

    #[test]
    fn sunday_observed_on_monday() {
        // Christmas 2022 was a Sunday
        assert_eq!(holiday_on(d(2022, 12, 26)).unwrap().name, "Christmas");
    }

    #[test]
    fn new_year_on_saturday_observed_in_previous_year() {
        // January 1, 2022 was a Saturday
        assert_eq!(holiday_on(d(2021, 12, 31)).unwrap().name, "New Year's Day");
        assert!(federal_holidays(2022).iter().all(|h| h.date.year() == 2022));
        assert!(holiday_on(d(2022, 1, 1)).is_none());
    }

    #[test]
    fn last_monday_of_may() {
        assert_eq!(last_weekday(2021, 5, Weekday::Mon), Some(d(2021, 5, 31)));
        assert_eq!(last_weekday(2023, 5, Weekday::Mon), Some(d(2023, 5, 29)));
    }

    #[test]
    fn thanksgiving_is_fourth_thursday() {
        assert_eq!(holiday_on(d(2023, 11, 23)).unwrap().name, "Thanksgiving");
    }
}
