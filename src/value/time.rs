//! Clock time value (hour and minute, no date)

use super::temporal::Temporal;
use super::Value;
use crate::error::{FormError, Result};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Minutes in one day; projections live in `0..MINUTES_PER_DAY`
pub const MINUTES_PER_DAY: i64 = 1_440;

const SECONDS_PER_DAY: i64 = 86_400;

/// A wall-clock time with minute precision, serialized as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parse `HH:MM` (or `HH:MM:SS`, seconds dropped)
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || FormError::InvalidFormat {
            kind: Self::KIND,
            input: input.to_string(),
            expected: "HH:MM",
        };

        let parts: Vec<&str> = input.split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(invalid());
        }
        let mut numbers = parts.iter().map(|part| parse_component(part));
        let hour = numbers.next().flatten().ok_or_else(invalid)?;
        let minute = numbers.next().flatten().ok_or_else(invalid)?;
        if let Some(second) = numbers.next() {
            if !second.is_some_and(|s| s < 60) {
                return Err(invalid());
            }
        }
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self::from_minutes(i64::from(hour * 60 + minute)))
    }

    /// Build from minutes since midnight; values outside one day roll over
    pub fn from_minutes(minutes: i64) -> Self {
        let normalized = minutes.rem_euclid(MINUTES_PER_DAY);
        Self(NaiveTime::MIN + TimeDelta::minutes(normalized))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes since midnight, `0..=1439`
    pub fn minutes(&self) -> i64 {
        i64::from(self.0.hour() * 60 + self.0.minute())
    }

    /// The wrapped chrono time (seconds are always zero)
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Add minutes and report how many midnights were crossed.
    ///
    /// The carry is negative when moving backwards past midnight.
    pub fn add_with_carry(&self, minutes: i64) -> (Self, i64) {
        let whole_days = minutes.div_euclid(MINUTES_PER_DAY);
        let rest = minutes.rem_euclid(MINUTES_PER_DAY);
        let (time, wrapped_seconds) = self.0.overflowing_add_signed(TimeDelta::minutes(rest));
        (Self(time), whole_days + wrapped_seconds / SECONDS_PER_DAY)
    }

    /// Equivalent to `add(-minutes)`
    pub fn subtract_minutes(&self, minutes: i64) -> Self {
        self.add_with_carry(-(minutes % MINUTES_PER_DAY)).0
    }
}

/// A one- or two-digit clock component
fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl Temporal for ClockTime {
    const KIND: &'static str = "time";

    fn projection(&self) -> i64 {
        self.minutes()
    }

    /// Wraps silently past midnight; see [`ClockTime::add_with_carry`]
    fn add(&self, minutes: i64) -> Result<Self> {
        Ok(self.add_with_carry(minutes).0)
    }

    /// Signed minute difference within one day
    fn subtract(&self, other: &Self) -> i64 {
        self.minutes() - other.minutes()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self::from_minutes(i64::from(time.hour() * 60 + time.minute()))
    }
}

impl From<NaiveDateTime> for ClockTime {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::from(datetime.time())
    }
}

impl TryFrom<&Value> for ClockTime {
    type Error = FormError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Time(time) => Ok(*time),
            Value::Text(text) => Self::parse(text),
            other => Err(FormError::mismatch(Self::KIND, other.kind().name())),
        }
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
