//! Arithmetic capability shared by the temporal value types

use super::{CalendarDate, ClockTime, Value};
use crate::error::{FormError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Comparison and arithmetic over an integer projection.
///
/// Implemented only by [`CalendarDate`] (unit: days, projection: epoch
/// milliseconds) and [`ClockTime`] (unit and projection: minutes).
pub trait Temporal: Sized + Copy + Ord + fmt::Display {
    /// Name used in error messages
    const KIND: &'static str;

    /// Integer projection used for equality and ordering
    fn projection(&self) -> i64;

    /// Shift by a whole number of units
    fn add(&self, amount: i64) -> Result<Self>;

    /// Whole units between `other` and `self`
    fn subtract(&self, other: &Self) -> i64;

    fn equals(&self, other: &Self) -> bool {
        self.projection() == other.projection()
    }
}

/// Either temporal variant, for operations on dynamically typed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalValue {
    Date(CalendarDate),
    Time(ClockTime),
}

impl TemporalValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TemporalValue::Date(_) => CalendarDate::KIND,
            TemporalValue::Time(_) => ClockTime::KIND,
        }
    }

    pub fn projection(&self) -> i64 {
        match self {
            TemporalValue::Date(d) => d.projection(),
            TemporalValue::Time(t) => t.projection(),
        }
    }

    /// Days for dates, minutes for times
    pub fn add(&self, amount: i64) -> Result<Self> {
        match self {
            TemporalValue::Date(d) => d.add(amount).map(TemporalValue::Date),
            TemporalValue::Time(t) => t.add(amount).map(TemporalValue::Time),
        }
    }

    pub fn subtract(&self, other: &TemporalValue) -> Result<i64> {
        match (self, other) {
            (TemporalValue::Date(a), TemporalValue::Date(b)) => Ok(a.subtract(b)),
            (TemporalValue::Time(a), TemporalValue::Time(b)) => Ok(a.subtract(b)),
            _ => Err(FormError::mismatch(self.kind_name(), other.kind_name())),
        }
    }

    pub fn equals(&self, other: &TemporalValue) -> Result<bool> {
        self.compare(other).map(|ordering| ordering == Ordering::Equal)
    }

    pub fn compare(&self, other: &TemporalValue) -> Result<Ordering> {
        match (self, other) {
            (TemporalValue::Date(a), TemporalValue::Date(b)) => Ok(a.cmp(b)),
            (TemporalValue::Time(a), TemporalValue::Time(b)) => Ok(a.cmp(b)),
            _ => Err(FormError::mismatch(self.kind_name(), other.kind_name())),
        }
    }
}

impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalValue::Date(d) => fmt::Display::fmt(d, f),
            TemporalValue::Time(t) => fmt::Display::fmt(t, f),
        }
    }
}

impl TryFrom<&Value> for TemporalValue {
    type Error = FormError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(TemporalValue::Date(*d)),
            Value::Time(t) => Ok(TemporalValue::Time(*t)),
            other => Err(FormError::mismatch("date or time", other.kind().name())),
        }
    }
}

impl From<TemporalValue> for Value {
    fn from(value: TemporalValue) -> Self {
        match value {
            TemporalValue::Date(d) => Value::Date(d),
            TemporalValue::Time(t) => Value::Time(t),
        }
    }
}
