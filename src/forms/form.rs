//! Form aggregate: named fields, record extraction and gated submission

use super::field::Field;
use super::record::FormData;
use crate::accessor::ValueAccessor;
use crate::dom::{Document, EventKind, Target, TEXT_CONTENT};
use crate::error::{FormError, Result};
use crate::value::ValueKind;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Predicate consulted before a submission proceeds
#[cfg_attr(test, mockall::automock)]
pub trait SubmitGate {
    fn allow(&mut self) -> bool;
}

impl<F> SubmitGate for F
where
    F: FnMut() -> bool,
{
    fn allow(&mut self) -> bool {
        self()
    }
}

/// Receiver of the record assembled by a successful submission
#[cfg_attr(test, mockall::automock)]
pub trait SubmitSink {
    fn deliver(&mut self, record: FormData);
}

impl<F> SubmitSink for F
where
    F: FnMut(FormData),
{
    fn deliver(&mut self, record: FormData) {
        self(record)
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record was extracted, the fields reset and the sink called
    Submitted,
    /// The gate, a blocking field or a nested submit stopped it
    Suppressed,
}

struct FormState<T: Target> {
    name: String,
    target: T,
    title: Option<ValueAccessor<T>>,
    fields: Vec<Field<T>>,
    gate: RefCell<Option<Box<dyn SubmitGate>>>,
    sink: RefCell<Box<dyn SubmitSink>>,
    submitting: Cell<bool>,
}

impl<T: Target> FormState<T> {
    fn field(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|field| field.name() == name)
    }

    fn form_data(&self) -> Result<FormData> {
        let mut record = FormData::new();
        for field in &self.fields {
            record.insert(field.name(), field.get_value()?);
        }
        Ok(record)
    }

    fn reset(&self) {
        for field in &self.fields {
            field.reset();
        }
    }

    fn blocking_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.is_blocking())
            .map(Field::name)
            .collect()
    }

    fn submit(&self) -> Result<SubmitOutcome> {
        if self.submitting.replace(true) {
            tracing::warn!(form = %self.name, "ignoring submit triggered during submission");
            return Ok(SubmitOutcome::Suppressed);
        }
        let outcome = self.run_submission();
        self.submitting.set(false);
        outcome
    }

    fn run_submission(&self) -> Result<SubmitOutcome> {
        let allowed = self
            .gate
            .borrow_mut()
            .as_mut()
            .map_or(true, |gate| gate.allow());
        if !allowed {
            tracing::debug!(form = %self.name, "submission refused by gate");
            return Ok(SubmitOutcome::Suppressed);
        }

        let blocking = self.blocking_fields();
        if !blocking.is_empty() {
            tracing::debug!(form = %self.name, ?blocking, "submission blocked by field hooks");
            return Ok(SubmitOutcome::Suppressed);
        }

        let record = self.form_data()?;
        self.reset();
        tracing::info!(form = %self.name, fields = record.len(), "form submitted");
        self.sink.borrow_mut().deliver(record);
        Ok(SubmitOutcome::Submitted)
    }
}

/// A named collection of fields bound to a form element.
///
/// The form subscribes to its element's submit event. Each submission runs
/// the gate, extracts the record, resets every field and hands the record to
/// the sink, in that order.
pub struct Form<T: Target> {
    state: Rc<FormState<T>>,
}

impl<T: Target + 'static> Form<T> {
    pub fn builder(name: impl Into<String>) -> FormBuilder<T> {
        FormBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// The bound form element
    pub fn target(&self) -> &T {
        &self.state.target
    }

    /// The `<name>-title` heading, when the document has one
    pub fn title(&self) -> Option<&ValueAccessor<T>> {
        self.state.title.as_ref()
    }

    pub fn field(&self, name: &str) -> Option<&Field<T>> {
        self.state.field(name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field<T>] {
        &self.state.fields
    }

    /// Current value of every field, in declaration order
    pub fn get_form_data(&self) -> Result<FormData> {
        self.state.form_data()
    }

    /// Forward each known key to its field; unknown keys are ignored
    pub fn set_values(&self, record: &FormData) {
        for (name, value) in record.iter() {
            match self.state.field(name) {
                Some(field) => field.set_value(value),
                None => {
                    tracing::trace!(form = %self.state.name, field = name, "ignoring unknown field")
                }
            }
        }
    }

    /// Clear every bound field
    pub fn reset(&self) {
        self.state.reset();
    }

    /// Names of fields whose change hook currently vetoes submission
    pub fn blocking_fields(&self) -> Vec<&str> {
        self.state.blocking_fields()
    }

    /// Run the submission sequence directly, as the submit event does
    pub fn submit(&self) -> Result<SubmitOutcome> {
        self.state.submit()
    }
}

/// Collects fields and hooks before binding a [`Form`]
pub struct FormBuilder<T: Target> {
    name: String,
    fields: Vec<Field<T>>,
    gate: Option<Box<dyn SubmitGate>>,
    sink: Option<Box<dyn SubmitSink>>,
}

impl<T: Target + 'static> FormBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            gate: None,
            sink: None,
        }
    }

    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field<T>>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn on_submit(mut self, gate: impl SubmitGate + 'static) -> Self {
        self.gate = Some(Box::new(gate));
        self
    }

    /// Where submitted records go; by default they are only logged
    pub fn sink(mut self, sink: impl SubmitSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Locate the form element, check field names and subscribe to submit
    pub fn bind<D>(self, document: &D) -> Result<Form<T>>
    where
        D: Document<Node = T>,
    {
        let target = document.locate(&self.name)?;

        for (position, field) in self.fields.iter().enumerate() {
            if self.fields[..position]
                .iter()
                .any(|earlier| earlier.name() == field.name())
            {
                return Err(FormError::DuplicateField {
                    name: field.name().to_string(),
                });
            }
        }

        let title = document
            .locate(&format!("{}-title", self.name))
            .ok()
            .map(|heading| ValueAccessor::new(heading, TEXT_CONTENT, ValueKind::Text));

        let form_name = self.name.clone();
        let sink: Box<dyn SubmitSink> = match self.sink {
            Some(sink) => sink,
            None => Box::new(move |record: FormData| {
                tracing::info!(form = %form_name, ?record, "submitted record");
            }),
        };

        let state = Rc::new(FormState {
            name: self.name,
            target: target.clone(),
            title,
            fields: self.fields,
            gate: RefCell::new(self.gate),
            sink: RefCell::new(sink),
            submitting: Cell::new(false),
        });

        let weak = Rc::downgrade(&state);
        target.on_event(
            EventKind::Submit,
            Box::new(move || {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = state.submit() {
                    tracing::warn!(form = %state.name, error = %err, "submission failed");
                }
            }),
        );

        tracing::debug!(form = %state.name, fields = state.fields.len(), "bound form");
        Ok(Form { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{AttrValue, MemoryDocument, MemoryNode, VALUE};
    use crate::forms::{FieldInit, FieldKind};
    use crate::value::{CalendarDate, Value};

    fn scaffold(doc: &MemoryDocument, form: &str, fields: &[(&str, FieldKind)]) {
        let root = doc.body().append_element("form", form);
        root.append_element("h1", &format!("{form}-title"));
        for (name, kind) in fields {
            root.append_element("label", &format!("{name}-title"));
            root.append_element("p", &format!("{name}-description"));
            root.append_element(kind.tag(), name);
        }
    }

    /// `name` (text, initially "ann") and `start` (date, no initial value)
    fn signup(doc: &MemoryDocument) -> FormBuilder<MemoryNode> {
        scaffold(doc, "signup", &[("name", FieldKind::Text), ("start", FieldKind::Date)]);
        let name = Field::bind(
            doc,
            "name",
            FieldKind::Text,
            FieldInit::new().default_value("ann"),
        )
        .unwrap();
        let start = Field::bind(doc, "start", FieldKind::Date, FieldInit::new()).unwrap();
        Form::builder("signup").field(name).field(start)
    }

    fn stored(doc: &MemoryDocument, id: &str) -> Option<AttrValue> {
        doc.locate(id).unwrap().read_attribute(VALUE)
    }

    fn bob_record() -> FormData {
        [("name", "bob"), ("start", "2024-03-01")].into_iter().collect()
    }

    mod data {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_values_then_get_form_data() {
            let doc = MemoryDocument::new();
            let form = signup(&doc).bind(&doc).unwrap();

            form.set_values(&bob_record());
            let expected: FormData = [
                ("name", Value::from("bob")),
                ("start", Value::from(CalendarDate::parse("2024-03-01").unwrap())),
            ]
            .into_iter()
            .collect();
            assert_eq!(form.get_form_data().unwrap(), expected);
        }

        #[test]
        fn test_set_values_ignores_unknown_keys() {
            let doc = MemoryDocument::new();
            let form = signup(&doc).bind(&doc).unwrap();
            let record: FormData = [("nickname", "b"), ("name", "bea")].into_iter().collect();
            form.set_values(&record);
            assert_eq!(form.field("name").unwrap().get_value().unwrap(), Value::from("bea"));
            assert!(form.field("nickname").is_none());
        }

        #[test]
        fn test_get_form_data_surfaces_unparseable_dates() {
            let doc = MemoryDocument::new();
            let form = signup(&doc).bind(&doc).unwrap();
            assert!(matches!(
                form.get_form_data(),
                Err(FormError::InvalidFormat { kind: "date", .. })
            ));
        }

        #[test]
        fn test_fields_keep_declaration_order() {
            let doc = MemoryDocument::new();
            let form = signup(&doc).bind(&doc).unwrap();
            let names: Vec<&str> = form.fields().iter().map(Field::name).collect();
            assert_eq!(names, vec!["name", "start"]);
            assert_eq!(form.name(), "signup");
        }

        #[test]
        fn test_title_is_bound_when_present() {
            let doc = MemoryDocument::new();
            let form = signup(&doc).bind(&doc).unwrap();
            form.title().unwrap().set("Join us");
            assert_eq!(doc.locate("signup-title").unwrap().text(), "Join us");
        }
    }

    mod construction {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_missing_form_element_fails() {
            let doc = MemoryDocument::new();
            let result = Form::<MemoryNode>::builder("ghost").bind(&doc);
            assert_eq!(result.err(), Some(FormError::TargetNotFound { id: "ghost".into() }));
        }

        #[test]
        fn test_duplicate_field_names_fail() {
            let doc = MemoryDocument::new();
            scaffold(&doc, "f", &[("a", FieldKind::Text)]);
            let first = Field::bind(&doc, "a", FieldKind::Text, FieldInit::new()).unwrap();
            let second = Field::bind(&doc, "a", FieldKind::Text, FieldInit::new()).unwrap();
            let result = Form::builder("f").fields([first, second]).bind(&doc);
            assert_eq!(result.err(), Some(FormError::DuplicateField { name: "a".into() }));
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_gate_refusal_leaves_values_and_skips_sink() {
            let doc = MemoryDocument::new();
            let mut gate = MockSubmitGate::new();
            gate.expect_allow().times(1).return_const(false);
            let mut sink = MockSubmitSink::new();
            sink.expect_deliver().never();

            let form = signup(&doc).on_submit(gate).sink(sink).bind(&doc).unwrap();
            form.set_values(&bob_record());

            doc.dispatch("signup", EventKind::Submit).unwrap();
            assert_eq!(stored(&doc, "name"), Some(AttrValue::Text("bob".into())));
            assert_eq!(stored(&doc, "start"), Some(AttrValue::Text("2024-03-01".into())));
        }

        #[test]
        fn test_gate_pass_resets_fields_and_delivers_record() {
            let doc = MemoryDocument::new();
            let mut gate = MockSubmitGate::new();
            gate.expect_allow().times(1).return_const(true);
            let mut sink = MockSubmitSink::new();
            sink.expect_deliver()
                .withf(|record| {
                    record.get("name") == Some(&Value::from("bob"))
                        && record.get("start").and_then(Value::as_date).map(|d| d.to_string())
                            == Some("2024-03-01".to_string())
                })
                .times(1)
                .return_const(());

            let form = signup(&doc).on_submit(gate).sink(sink).bind(&doc).unwrap();
            form.set_values(&bob_record());

            doc.dispatch("signup", EventKind::Submit).unwrap();
            assert_eq!(stored(&doc, "name"), Some(AttrValue::Text(String::new())));
            assert_eq!(stored(&doc, "start"), Some(AttrValue::Text(String::new())));
        }

        #[test]
        fn test_absent_gate_passes() {
            let doc = MemoryDocument::new();
            let received = Rc::new(RefCell::new(Vec::new()));
            let inbox = Rc::clone(&received);
            let form = signup(&doc)
                .sink(move |record: FormData| inbox.borrow_mut().push(record))
                .bind(&doc)
                .unwrap();
            form.set_values(&bob_record());

            assert_eq!(form.submit().unwrap(), SubmitOutcome::Submitted);
            assert_eq!(received.borrow().len(), 1);
            assert_eq!(received.borrow()[0].get("name"), Some(&Value::from("bob")));
        }

        #[test]
        fn test_extraction_happens_before_reset_and_sink_sees_reset_fields() {
            let doc = MemoryDocument::new();
            let observed = Rc::new(RefCell::new(None));
            let slot = Rc::clone(&observed);
            let name_input = doc.clone();
            let form = signup(&doc)
                .sink(move |record: FormData| {
                    let current = name_input.locate("name").unwrap().read_attribute(VALUE);
                    *slot.borrow_mut() = Some((record, current));
                })
                .bind(&doc)
                .unwrap();
            form.set_values(&bob_record());
            form.submit().unwrap();

            let (record, current) = observed.borrow_mut().take().unwrap();
            assert_eq!(record.get("name"), Some(&Value::from("bob")));
            assert_eq!(current, Some(AttrValue::Text(String::new())));
        }

        #[test]
        fn test_extraction_error_keeps_values() {
            let doc = MemoryDocument::new();
            let mut sink = MockSubmitSink::new();
            sink.expect_deliver().never();
            let form = signup(&doc).sink(sink).bind(&doc).unwrap();
            form.field("name").unwrap().set_value("bob");

            assert!(form.submit().is_err());
            assert_eq!(stored(&doc, "name"), Some(AttrValue::Text("bob".into())));
        }

        #[test]
        fn test_blocking_field_suppresses_submission() {
            let doc = MemoryDocument::new();
            scaffold(&doc, "f", &[("code", FieldKind::Text)]);
            let code = Field::bind(
                &doc,
                "code",
                FieldKind::Text,
                FieldInit::new().on_change(|| false),
            )
            .unwrap();
            let mut sink = MockSubmitSink::new();
            sink.expect_deliver().never();
            let form = Form::builder("f").field(code).sink(sink).bind(&doc).unwrap();

            doc.dispatch("code", EventKind::Input).unwrap();
            assert_eq!(form.blocking_fields(), vec!["code"]);
            assert_eq!(form.submit().unwrap(), SubmitOutcome::Suppressed);
        }

        #[test]
        fn test_gate_may_read_fields_through_the_document() {
            let doc = MemoryDocument::new();
            let probe = doc.clone();
            let form = signup(&doc)
                .on_submit(move || {
                    probe
                        .locate("name")
                        .ok()
                        .and_then(|input| input.read_attribute(VALUE))
                        .is_some_and(|value| !value.to_text().is_empty())
                })
                .sink(|_: FormData| {})
                .bind(&doc)
                .unwrap();

            form.field("name").unwrap().set_value("");
            form.field("start").unwrap().set_value("2024-01-01");
            assert_eq!(form.submit().unwrap(), SubmitOutcome::Suppressed);

            form.field("name").unwrap().set_value("cy");
            assert_eq!(form.submit().unwrap(), SubmitOutcome::Submitted);
        }

        #[test]
        fn test_dropped_form_ignores_submit_events() {
            let doc = MemoryDocument::new();
            let mut sink = MockSubmitSink::new();
            sink.expect_deliver().never();
            let form = signup(&doc).sink(sink).bind(&doc).unwrap();
            form.set_values(&bob_record());
            drop(form);

            doc.dispatch("signup", EventKind::Submit).unwrap();
            assert_eq!(stored(&doc, "name"), Some(AttrValue::Text("bob".into())));
        }
    }
}
