//! Single typed value bound to one attribute of a target

use crate::dom::{AttrValue, Document, Target, TEXT_CONTENT};
use crate::error::{FormError, Result};
use crate::value::{CalendarDate, ClockTime, Value, ValueKind};
use std::fmt;

/// Reads and writes one attribute of a target, coercing by [`ValueKind`].
///
/// Writes always store the value's canonical text; reads parse it back into
/// the declared kind.
#[derive(Debug)]
pub struct ValueAccessor<T: Target> {
    target: T,
    attribute: String,
    kind: ValueKind,
}

impl<T: Target> ValueAccessor<T> {
    /// Locate `id` and bind to its `attribute`; fails fast when absent
    pub fn bind<D>(document: &D, id: &str, attribute: &str, kind: ValueKind) -> Result<Self>
    where
        D: Document<Node = T>,
    {
        let target = document.locate(id)?;
        tracing::debug!(id, attribute, kind = kind.name(), "bound value accessor");
        Ok(Self::new(target, attribute, kind))
    }

    /// Bind to a node's rendered text
    pub fn content<D>(document: &D, id: &str) -> Result<Self>
    where
        D: Document<Node = T>,
    {
        Self::bind(document, id, TEXT_CONTENT, ValueKind::Text)
    }

    pub fn new(target: T, attribute: &str, kind: ValueKind) -> Self {
        Self {
            target,
            attribute: attribute.to_string(),
            kind,
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Current value in the declared kind
    pub fn get(&self) -> Result<Value> {
        let stored = self.target.read_attribute(&self.attribute);
        match self.kind {
            ValueKind::Text => Ok(Value::Text(
                stored.map(|value| value.to_text()).unwrap_or_default(),
            )),
            ValueKind::Boolean => match stored {
                None => Ok(Value::Boolean(false)),
                Some(AttrValue::Bool(flag)) => Ok(Value::Boolean(flag)),
                Some(AttrValue::Text(text)) => {
                    text.parse().map(Value::Boolean).map_err(|_| FormError::InvalidFormat {
                        kind: "boolean",
                        input: text,
                        expected: "true or false",
                    })
                }
            },
            ValueKind::Date => CalendarDate::parse(&stored_text(stored)).map(Value::Date),
            ValueKind::Time => ClockTime::parse(&stored_text(stored)).map(Value::Time),
        }
    }

    /// Store the canonical text of `value`
    pub fn set(&self, value: impl fmt::Display) {
        self.target
            .write_attribute(&self.attribute, &value.to_string());
    }

    /// Store the kind's empty representation
    pub fn clear(&self) {
        self.target
            .write_attribute(&self.attribute, self.kind.empty_text());
    }
}

fn stored_text(stored: Option<AttrValue>) -> String {
    stored.map(|value| value.to_text()).unwrap_or_default()
}
