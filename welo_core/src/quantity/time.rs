use super::{string_serde, QuantityKind};
use crate::{Error, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering format, also the first format tried when parsing
pub const TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

enum Layout {
    DateTime(&'static str),
    Date(&'static str),
}

/// Absolute formats, tried in order
const LAYOUTS: [Layout; 4] = [
    Layout::DateTime(TIME_FORMAT),
    Layout::Date("%d.%m.%Y"),
    Layout::DateTime("%Y.%m.%d %H:%M"),
    Layout::Date("%Y.%m.%d"),
];

/// Time of day only; the date is filled in with today
const CLOCK_FORMAT: &str = "%H:%M";

/// A point in (local, naive) time
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time {
    datetime: NaiveDateTime,
}

impl Time {
    /// Current local time, truncated to whole minutes
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        let datetime = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        Self { datetime }
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self { datetime }
    }

    /// Midnight at the start of `date`
    pub fn start_of_day(date: NaiveDate) -> Self {
        Self {
            datetime: date.and_time(NaiveTime::MIN),
        }
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// Parse `s`, resolving a bare `HH:MM` against `today`.
    pub fn parse_on(s: &str, today: NaiveDate) -> Result<Self> {
        let s = s.trim();

        for layout in &LAYOUTS {
            let parsed = match layout {
                Layout::DateTime(fmt) => NaiveDateTime::parse_from_str(s, fmt).ok(),
                Layout::Date(fmt) => NaiveDate::parse_from_str(s, fmt)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN)),
            };
            if let Some(datetime) = parsed {
                return Ok(Self { datetime });
            }
        }

        NaiveTime::parse_from_str(s, CLOCK_FORMAT)
            .map(|t| Self {
                datetime: today.and_time(t),
            })
            .map_err(|_| Error::invalid(s, QuantityKind::Time))
    }

    /// Age in whole years on `today`, taking this time as the birthday.
    ///
    /// Within the birth month, any day other than the birthday itself counts
    /// as "before the birthday", so the year is not complete yet.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let born = self.datetime.date();
        let mut age = today.year() - born.year();
        if today.month() < born.month()
            || (today.month() == born.month() && today.day() != born.day())
        {
            age -= 1;
        }
        age
    }

    pub fn age(&self) -> i32 {
        self.age_on(Local::now().date_naive())
    }

    /// Strictly between `start` and `end`
    pub fn in_period(&self, start: Time, end: Time) -> bool {
        self.datetime > start.datetime && self.datetime < end.datetime
    }
}

impl FromStr for Time {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_on(s, Local::now().date_naive())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime.format(TIME_FORMAT))
    }
}

impl std::ops::Add<chrono::Duration> for Time {
    type Output = Time;

    fn add(self, rhs: chrono::Duration) -> Time {
        Time {
            datetime: self.datetime + rhs,
        }
    }
}

string_serde!(Time);

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_day_first() {
        let t: Time = "27.02.1992".parse().unwrap();
        assert_eq!(t.datetime(), at(1992, 2, 27, 0, 0));

        let t: Time = "27.02.1992 18:30".parse().unwrap();
        assert_eq!(t.datetime(), at(1992, 2, 27, 18, 30));
    }

    #[test]
    fn test_parse_year_first() {
        let t: Time = "1992.02.27".parse().unwrap();
        assert_eq!(t.datetime(), at(1992, 2, 27, 0, 0));

        let t: Time = "1992.02.27 18:30".parse().unwrap();
        assert_eq!(t.datetime(), at(1992, 2, 27, 18, 30));
    }

    #[test]
    fn test_parse_clock_uses_today() {
        let today = date(2024, 5, 16);
        let t = Time::parse_on("07:45", today).unwrap();
        assert_eq!(t.datetime(), at(2024, 5, 16, 7, 45));
    }

    #[test]
    fn test_parse_invalid() {
        let today = date(2024, 5, 16);
        assert!(Time::parse_on("yesterday", today).is_err());
        assert!(Time::parse_on("31.02.1992", today).is_err());
        assert!(Time::parse_on("25:00", today).is_err());
    }

    #[test]
    fn test_display() {
        let t = Time::from_datetime(at(1992, 2, 7, 8, 5));
        assert_eq!(t.to_string(), "07.02.1992 08:05");
    }

    #[test]
    fn test_round_trip_is_exact_at_minute_precision() {
        let t = Time::now();
        let reparsed: Time = t.to_string().parse().unwrap();
        assert_eq!(reparsed, t);
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let born: Time = "27.02.1992".parse().unwrap();
        assert_eq!(born.age_on(date(2024, 1, 15)), 31);
        assert_eq!(born.age_on(date(2024, 2, 27)), 32);
        assert_eq!(born.age_on(date(2024, 3, 1)), 32);
    }

    #[test]
    fn test_age_within_birth_month_counts_as_before() {
        let born: Time = "10.06.1990".parse().unwrap();
        assert_eq!(born.age_on(date(2024, 6, 5)), 33);
        assert_eq!(born.age_on(date(2024, 6, 10)), 34);
        // Past the birthday but still in the birth month
        assert_eq!(born.age_on(date(2024, 6, 20)), 33);
    }

    #[test]
    fn test_in_period_is_strict() {
        let start = Time::start_of_day(date(2024, 5, 16));
        let end = start + chrono::Duration::hours(24);

        assert!(Time::from_datetime(at(2024, 5, 16, 12, 0)).in_period(start, end));
        assert!(!start.in_period(start, end));
        assert!(!end.in_period(start, end));
    }
}
