//! Typed field values
//!
//! Field values are a closed set: free text, booleans, calendar dates and
//! clock times. Dates and times carry their own arithmetic through the
//! [`Temporal`] trait.

mod date;
mod temporal;
mod time;

pub use date::{CalendarDate, MILLIS_PER_DAY};
pub use temporal::{Temporal, TemporalValue};
pub use time::{ClockTime, MINUTES_PER_DAY};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The kind a value accessor coerces stored text into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Boolean,
    Date,
    Time,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => CalendarDate::KIND,
            ValueKind::Time => ClockTime::KIND,
        }
    }

    /// Text written to a target when a value of this kind is cleared
    pub fn empty_text(self) -> &'static str {
        match self {
            ValueKind::Boolean => "false",
            ValueKind::Text | ValueKind::Date | ValueKind::Time => "",
        }
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Boolean(bool),
    Date(CalendarDate),
    Time(ClockTime),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<CalendarDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<ClockTime> {
        match self {
            Value::Time(time) => Some(*time),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Boolean(flag) => write!(f, "{}", flag),
            Value::Date(date) => write!(f, "{}", date),
            Value::Time(time) => write!(f, "{}", time),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Boolean(flag)
    }
}

impl From<CalendarDate> for Value {
    fn from(date: CalendarDate) -> Self {
        Value::Date(date)
    }
}

impl From<ClockTime> for Value {
    fn from(time: ClockTime) -> Self {
        Value::Time(time)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Boolean(flag) => serializer.serialize_bool(*flag),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Date(date) => date.serialize(serializer),
            Value::Time(time) => time.serialize(serializer),
        }
    }
}

/// JSON shapes accepted for a value; temporal values arrive as text
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Boolean(flag) => Value::Boolean(flag),
            RawValue::Number(number) => Value::Text(number.to_string()),
            RawValue::Text(text) => Value::Text(text),
        })
    }
}
