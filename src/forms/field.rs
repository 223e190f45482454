//! Named form field composed of typed accessors

use crate::accessor::{ListAccessor, ValueAccessor};
use crate::dom::{Document, EventKind, Target, PLACEHOLDER, REQUIRED, VALUE};
use crate::error::Result;
use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Callback run on every input event; returning `false` blocks submission
pub type ChangeHook = Box<dyn FnMut() -> bool>;

/// Declared kind of a field, mirroring the input element it drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
    Time,
    Select,
}

impl FieldKind {
    /// Kind used by the field's value accessor
    pub fn value_kind(self) -> ValueKind {
        match self {
            FieldKind::Date => ValueKind::Date,
            FieldKind::Time => ValueKind::Time,
            FieldKind::Text | FieldKind::Number | FieldKind::Select => ValueKind::Text,
        }
    }

    /// Whether values come from a fixed option list
    pub fn is_enumerated(self) -> bool {
        matches!(self, FieldKind::Select)
    }

    /// `type` attribute of the input element
    pub fn input_type(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Select => "select",
        }
    }

    /// Element tag of the input
    pub fn tag(self) -> &'static str {
        if self.is_enumerated() {
            "select"
        } else {
            "input"
        }
    }
}

/// Initial state applied when a field is bound.
///
/// Every key is optional. Everything but `on_change` can be loaded from JSON.
#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldInit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    #[serde(alias = "defaultValue", alias = "default")]
    pub default_value: Option<Value>,
    pub options: Option<Vec<String>>,
    #[serde(skip)]
    pub on_change: Option<ChangeHook>,
}

impl FieldInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_change(mut self, hook: impl FnMut() -> bool + 'static) -> Self {
        self.on_change = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for FieldInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInit")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("placeholder", &self.placeholder)
            .field("required", &self.required)
            .field("default_value", &self.default_value)
            .field("options", &self.options)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// A named field bound to its input element and the conventional
/// `<name>-title` and `<name>-description` nodes.
#[derive(Debug)]
pub struct Field<T: Target> {
    name: String,
    kind: FieldKind,
    input: T,
    value: ValueAccessor<T>,
    title: ValueAccessor<T>,
    description: ValueAccessor<T>,
    placeholder: Option<ValueAccessor<T>>,
    required: ValueAccessor<T>,
    options: Option<ListAccessor<T>>,
    blocking: Rc<Cell<bool>>,
}

impl<T: Target> Field<T> {
    /// Bind every accessor and apply `init`.
    ///
    /// Any missing element aborts construction with `TargetNotFound`.
    pub fn bind<D>(document: &D, name: &str, kind: FieldKind, init: FieldInit) -> Result<Self>
    where
        D: Document<Node = T>,
    {
        let input = document.locate(name)?;

        let title = ValueAccessor::content(document, &format!("{name}-title"))?;
        if let Some(text) = &init.title {
            title.set(text);
        }

        let description = ValueAccessor::content(document, &format!("{name}-description"))?;
        if let Some(text) = &init.description {
            description.set(text);
        }

        let placeholder = if kind.is_enumerated() {
            None
        } else {
            let placeholder = ValueAccessor::new(input.clone(), PLACEHOLDER, ValueKind::Text);
            if let Some(text) = &init.placeholder {
                placeholder.set(text);
            }
            Some(placeholder)
        };

        let required = ValueAccessor::new(input.clone(), REQUIRED, ValueKind::Boolean);
        if let Some(flag) = init.required {
            required.set(flag);
        }

        let options = if kind.is_enumerated() {
            let options = ListAccessor::new(input.clone(), "option");
            if let Some(items) = &init.options {
                options.set_all(items);
            }
            Some(options)
        } else {
            None
        };

        let value = ValueAccessor::new(input.clone(), VALUE, kind.value_kind());
        if let Some(initial) = &init.default_value {
            value.set(initial);
        }

        let blocking = Rc::new(Cell::new(false));
        if let Some(mut hook) = init.on_change {
            let blocking = Rc::clone(&blocking);
            let field = name.to_string();
            input.on_event(
                EventKind::Input,
                Box::new(move || {
                    let allowed = hook();
                    if !allowed {
                        tracing::debug!(field = %field, "change hook is blocking submission");
                    }
                    blocking.set(!allowed);
                }),
            );
        }

        tracing::debug!(field = name, kind = kind.input_type(), "bound field");
        Ok(Self {
            name: name.to_string(),
            kind,
            input,
            value,
            title,
            description,
            placeholder,
            required,
            options,
            blocking,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The bound input (or select) element
    pub fn input(&self) -> &T {
        &self.input
    }

    pub fn get_value(&self) -> Result<Value> {
        self.value.get()
    }

    pub fn set_value(&self, value: impl fmt::Display) {
        self.value.set(value);
    }

    /// Clear the value and any pending veto from the change hook.
    ///
    /// Enumerated fields fall back to their first option instead of empty.
    pub fn reset(&self) {
        match self.options.as_ref().and_then(|options| options.get(0)) {
            Some(first) => self.value.set(first),
            None => self.value.clear(),
        }
        self.blocking.set(false);
    }

    pub fn value(&self) -> &ValueAccessor<T> {
        &self.value
    }

    pub fn title(&self) -> &ValueAccessor<T> {
        &self.title
    }

    pub fn description(&self) -> &ValueAccessor<T> {
        &self.description
    }

    /// Absent for enumerated fields
    pub fn placeholder(&self) -> Option<&ValueAccessor<T>> {
        self.placeholder.as_ref()
    }

    pub fn required(&self) -> &ValueAccessor<T> {
        &self.required
    }

    pub fn is_required(&self) -> bool {
        matches!(self.required.get(), Ok(Value::Boolean(true)))
    }

    /// Present only for enumerated fields
    pub fn options(&self) -> Option<&ListAccessor<T>> {
        self.options.as_ref()
    }

    /// Whether the change hook's last verdict was a veto
    pub fn is_blocking(&self) -> bool {
        self.blocking.get()
    }
}
