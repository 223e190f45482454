//! Calendar date value (no time-of-day component)

use super::temporal::Temporal;
use super::Value;
use crate::error::{FormError, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Milliseconds in one calendar day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// `num_days_from_ce()` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// A single calendar day, serialized as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Canonical chrono format string
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Parse a `YYYY-MM-DD` string; month and day may have one digit
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || FormError::InvalidFormat {
            kind: Self::KIND,
            input: input.to_string(),
            expected: "YYYY-MM-DD",
        };

        // chrono skips whitespace and accepts a signed year
        let digits_and_dashes = input.bytes().all(|b| b.is_ascii_digit() || b == b'-');
        if !digits_and_dashes || !input.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(input, Self::FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Build from year, month and day; `None` for impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The wrapped chrono date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Milliseconds between 1970-01-01 and this date at midnight
    pub fn epoch_millis(&self) -> i64 {
        (i64::from(self.0.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE) * MILLIS_PER_DAY
    }

    /// Shift backwards by whole days
    pub fn subtract_days(&self, days: i64) -> Result<Self> {
        match days.checked_neg() {
            Some(negated) => self.add(negated),
            None => Err(self.out_of_range(days)),
        }
    }

    fn out_of_range(&self, days: i64) -> FormError {
        FormError::OutOfRange {
            kind: Self::KIND,
            detail: format!("{} shifted by {} days", self, days),
        }
    }
}

impl Temporal for CalendarDate {
    const KIND: &'static str = "date";

    fn projection(&self) -> i64 {
        self.epoch_millis()
    }

    fn add(&self, days: i64) -> Result<Self> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted.map(Self).ok_or_else(|| self.out_of_range(days))
    }

    /// Whole days between the two dates, rounded toward negative infinity
    fn subtract(&self, other: &Self) -> i64 {
        (self.epoch_millis() - other.epoch_millis()).div_euclid(MILLIS_PER_DAY)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for CalendarDate {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime.date())
    }
}

impl TryFrom<&Value> for CalendarDate {
    type Error = FormError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Date(date) => Ok(*date),
            Value::Text(text) => Self::parse(text),
            other => Err(FormError::mismatch(Self::KIND, other.kind().name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_canonical_round_trip() {
            for s in ["2024-03-01", "1999-12-31", "2000-02-29", "0001-01-01"] {
                assert_eq!(date(s).to_string(), s);
            }
        }

        #[test]
        fn test_short_month_and_day_normalize() {
            assert_eq!(date("2024-3-1").to_string(), "2024-03-01");
        }

        #[test]
        fn test_rejects_malformed_input() {
            for s in [
                "",
                "2024",
                "2024-02-30",
                "2024-13-01",
                "yesterday",
                "01/02/2024",
                " 2024-03-01",
                "2024- 3- 1",
                "+2024-03-01",
                "-2024-03-01",
                "2024-03-01 ",
            ] {
                let err = CalendarDate::parse(s).unwrap_err();
                assert!(matches!(err, FormError::InvalidFormat { kind: "date", .. }));
            }
        }

        #[test]
        fn test_from_naive_datetime_drops_time() {
            let dt = NaiveDate::from_ymd_opt(2024, 5, 6)
                .unwrap()
                .and_hms_opt(23, 59, 0)
                .unwrap();
            assert_eq!(CalendarDate::from(dt).to_string(), "2024-05-06");
        }

        #[test]
        fn test_try_from_value() {
            assert_eq!(
                CalendarDate::try_from(&Value::Text("2024-01-02".into())).unwrap(),
                date("2024-01-02")
            );
            let err = CalendarDate::try_from(&Value::Boolean(true)).unwrap_err();
            assert_eq!(err, FormError::mismatch("date", "boolean"));
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn test_epoch_projection() {
            assert_eq!(date("1970-01-01").epoch_millis(), 0);
            assert_eq!(date("1970-01-02").epoch_millis(), MILLIS_PER_DAY);
            assert_eq!(date("1969-12-31").epoch_millis(), -MILLIS_PER_DAY);
        }

        #[test]
        fn test_add_crosses_month_and_year() {
            assert_eq!(date("2024-02-28").add(1).unwrap().to_string(), "2024-02-29");
            assert_eq!(date("2023-02-28").add(1).unwrap().to_string(), "2023-03-01");
            assert_eq!(date("2024-12-31").add(1).unwrap().to_string(), "2025-01-01");
            assert_eq!(date("2024-01-01").add(-1).unwrap().to_string(), "2023-12-31");
        }

        #[test]
        fn test_add_then_subtract_recovers_offset() {
            let start = date("2024-03-01");
            for n in [-800, -31, -1, 0, 1, 29, 365, 1000] {
                assert_eq!(start.add(n).unwrap().subtract(&start), n);
            }
        }

        #[test]
        fn test_equals_self_and_zero_shift() {
            let d = date("2024-06-15");
            assert!(d.equals(&d));
            assert!(d.add(0).unwrap().equals(&d));
            assert!(!d.add(1).unwrap().equals(&d));
        }

        #[test]
        fn test_subtract_days() {
            assert_eq!(
                date("2024-03-01").subtract_days(1).unwrap().to_string(),
                "2024-02-29"
            );
        }

        #[test]
        fn test_add_out_of_range() {
            let err = date("2024-03-01").add(i64::MAX).unwrap_err();
            assert!(matches!(err, FormError::OutOfRange { kind: "date", .. }));
            assert!(date("2024-03-01").subtract_days(i64::MIN).is_err());
        }

        #[test]
        fn test_ordering_follows_calendar() {
            assert!(date("2024-01-01") < date("2024-01-02"));
            assert!(date("2023-12-31") < date("2024-01-01"));
        }
    }

    #[test]
    fn test_serde_uses_canonical_form() {
        let json = serde_json::to_string(&date("2024-03-01")).unwrap();
        assert_eq!(json, "\"2024-03-01\"");
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date("2024-03-01"));
    }
}
