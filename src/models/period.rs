//! Budget periods and their date boundaries
//!
//! A budget covers the day, week (Monday to Sunday) or calendar month that
//! contains a reference time. Boundaries are inclusive and span full days:
//! the start is midnight, the end is the last nanosecond of the final day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BookkeeperError, BookkeeperResult};

/// Length of a budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Week,
    #[default]
    Month,
}

impl PeriodType {
    pub fn all() -> &'static [Self] {
        &[Self::Day, Self::Week, Self::Month]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// The period of this type containing `reference`
    pub fn bounds(&self, reference: NaiveDateTime) -> DateRange {
        let day = reference.date();
        match self {
            Self::Day => day_bounds(day),
            Self::Week => week_bounds(day),
            Self::Month => month_bounds(day),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = BookkeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            other => Err(BookkeeperError::InvalidArgument(format!(
                "Unknown period type '{}' (expected day, week or month)",
                other
            ))),
        }
    }
}

/// An inclusive range of timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whole days from `first` through `last`
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(end_of_day()),
        }
    }

    pub fn contains(&self, moment: NaiveDateTime) -> bool {
        self.start <= moment && moment <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

/// Midnight to end of `day`
pub fn day_bounds(day: NaiveDate) -> DateRange {
    DateRange::days(day, day)
}

/// Monday through Sunday of the week containing `day`
pub fn week_bounds(day: NaiveDate) -> DateRange {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    DateRange::days(monday, monday + Duration::days(6))
}

/// First through last calendar day of the month containing `day`
pub fn month_bounds(day: NaiveDate) -> DateRange {
    let first = day.with_day(1).unwrap_or(day);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    DateRange::days(first, last)
}

/// Bounds for a period named by text, around an optional reference time
///
/// Fails with `InvalidArgument` for an unknown period name or a missing
/// reference.
pub fn period_bounds(period: &str, reference: Option<NaiveDateTime>) -> BookkeeperResult<DateRange> {
    let period_type: PeriodType = period.parse()?;
    let reference = reference.ok_or_else(|| {
        BookkeeperError::InvalidArgument("A reference date is required".into())
    })?;
    Ok(period_type.bounds(reference))
}

/// Parse "YYYY-MM-DD", "YYYY-MM-DD HH:MM[:SS[.f]]" or the "T"-separated form
///
/// A bare date means midnight of that day.
pub fn parse_timestamp(input: &str) -> BookkeeperResult<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return Err(BookkeeperError::InvalidArgument(
            "A date is required".into(),
        ));
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(parsed);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| BookkeeperError::InvalidArgument(format!("Invalid date: '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, nano: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_nano_opt(h, min, s, nano).unwrap()
    }

    #[test]
    fn test_week_bounds_from_sunday() {
        let range = week_bounds(date(2024, 4, 7));
        assert_eq!(range.start, at(2024, 4, 1, 0, 0, 0, 0));
        assert_eq!(range.end, at(2024, 4, 7, 23, 59, 59, 999_999_999));
    }

    #[test]
    fn test_week_bounds_from_monday() {
        let range = week_bounds(date(2024, 4, 1));
        assert_eq!(range.start.date(), date(2024, 4, 1));
        assert_eq!(range.end.date(), date(2024, 4, 7));
    }

    #[test]
    fn test_month_bounds() {
        let range = month_bounds(date(2024, 4, 7));
        assert_eq!(range.start, at(2024, 4, 1, 0, 0, 0, 0));
        assert_eq!(range.end, at(2024, 4, 30, 23, 59, 59, 999_999_999));
    }

    #[test]
    fn test_month_bounds_leap_february() {
        let range = month_bounds(date(2024, 2, 29));
        assert_eq!(range.start.date(), date(2024, 2, 1));
        assert_eq!(range.end.date(), date(2024, 2, 29));
    }

    #[test]
    fn test_month_bounds_december() {
        let range = month_bounds(date(2023, 12, 20));
        assert_eq!(range.start.date(), date(2023, 12, 1));
        assert_eq!(range.end.date(), date(2023, 12, 31));
    }

    #[test]
    fn test_day_bounds() {
        let range = PeriodType::Day.bounds(at(2024, 4, 3, 15, 30, 0, 0));
        assert_eq!(range.start, at(2024, 4, 3, 0, 0, 0, 0));
        assert_eq!(range.end, at(2024, 4, 3, 23, 59, 59, 999_999_999));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = day_bounds(date(2024, 4, 3));
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(at(2024, 4, 4, 0, 0, 0, 0)));
    }

    #[test]
    fn test_period_bounds_by_name() {
        let range = period_bounds("week", Some(at(2024, 4, 7, 0, 0, 0, 0))).unwrap();
        assert_eq!(range.start.date(), date(2024, 4, 1));

        let range = period_bounds("MONTH", Some(at(2024, 2, 29, 0, 0, 0, 0))).unwrap();
        assert_eq!(range.end.date(), date(2024, 2, 29));
    }

    #[test]
    fn test_period_bounds_errors() {
        let err = period_bounds("fortnight", Some(at(2024, 4, 7, 0, 0, 0, 0))).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = period_bounds("day", None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-04-05").unwrap(), at(2024, 4, 5, 0, 0, 0, 0));
        assert_eq!(
            parse_timestamp("2024-04-05 01:48:50.826683").unwrap(),
            at(2024, 4, 5, 1, 48, 50, 826_683_000)
        );
        assert_eq!(
            parse_timestamp("2024-04-05 01:02:03.123456789").unwrap(),
            at(2024, 4, 5, 1, 2, 3, 123_456_789)
        );
        assert_eq!(
            parse_timestamp("2024-04-05T09:15").unwrap(),
            at(2024, 4, 5, 9, 15, 0, 0)
        );
        assert!(parse_timestamp("").unwrap_err().is_invalid_argument());
        assert!(parse_timestamp("05/04/2024").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_period_type_parse_and_display() {
        assert_eq!("Weekly".parse::<PeriodType>().unwrap(), PeriodType::Week);
        assert_eq!(PeriodType::Day.to_string(), "day");
        assert_eq!(
            serde_json::to_string(&PeriodType::Month).unwrap(),
            "\"month\""
        );
    }
}
