//! Declarative form definitions and their element scaffolding

use super::field::{Field, FieldInit, FieldKind};
use super::form::{Form, FormBuilder};
use crate::accessor::ValueAccessor;
use crate::dom::{Document, MemoryDocument, MemoryNode, Target, TEXT_CONTENT};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One field of a [`FormDefinition`]
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(flatten)]
    pub init: FieldInit,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: FieldKind, init: FieldInit) -> Self {
        Self {
            name: name.into(),
            kind,
            init,
        }
    }
}

/// A form described as data, loadable from JSON
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FormDefinition {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Build the element tree the form and its fields bind to:
    ///
    /// ```text
    /// form#<form>
    ///   h1#<form>-title
    ///   section#<field>-section      (per field)
    ///     label#<field>-title
    ///     p#<field>-description
    ///     input#<field> | select#<field>
    ///     span#<field>-display
    ///   button#<form>-submit
    /// ```
    pub fn scaffold(&self, document: &MemoryDocument) -> MemoryNode {
        let form = document.body().append_element("form", &self.name);
        form.write_attribute("name", &self.name);
        form.append_element("h1", &format!("{}-title", self.name));

        for field in &self.fields {
            let name = field.name.as_str();
            let section = form.append_element("section", &format!("{name}-section"));
            section.write_attribute("class", "field");
            section
                .append_element("label", &format!("{name}-title"))
                .write_attribute(TEXT_CONTENT, name);
            section.append_element("p", &format!("{name}-description"));
            let input = section.append_element(field.kind.tag(), name);
            input.write_attribute("name", name);
            if !field.kind.is_enumerated() {
                input.write_attribute("type", field.kind.input_type());
            }
            section.append_element("span", &format!("{name}-display"));
        }

        let submit = form.append_element("button", &format!("{}-submit", self.name));
        submit.write_attribute("type", "submit");
        submit.write_attribute(TEXT_CONTENT, "Submit");
        form
    }

    /// Bind every field, consuming the definition's initial state
    pub fn into_builder<D>(self, document: &D) -> Result<FormBuilder<D::Node>>
    where
        D: Document,
        D::Node: 'static,
    {
        if let Some(title) = &self.title {
            ValueAccessor::content(document, &format!("{}-title", self.name))?.set(title);
        }

        let mut builder = Form::builder(self.name);
        for field in self.fields {
            builder = builder.field(Field::bind(document, &field.name, field.kind, field.init)?);
        }
        Ok(builder)
    }

    /// The booking form shown when no definition is configured
    pub fn sample() -> Self {
        Self {
            name: "booking".to_string(),
            title: Some("Room booking".to_string()),
            fields: vec![
                FieldDefinition::new(
                    "guest",
                    FieldKind::Text,
                    FieldInit::new()
                        .title("Guest name")
                        .placeholder("Ann Example")
                        .required(true),
                ),
                FieldDefinition::new(
                    "nights",
                    FieldKind::Number,
                    FieldInit::new().title("Nights").default_value("1"),
                ),
                FieldDefinition::new(
                    "arrival",
                    FieldKind::Date,
                    FieldInit::new()
                        .title("Arrival")
                        .description("YYYY-MM-DD")
                        .required(true),
                ),
                FieldDefinition::new(
                    "check_in",
                    FieldKind::Time,
                    FieldInit::new()
                        .title("Check-in time")
                        .description("HH:MM, 24-hour")
                        .default_value("15:00"),
                ),
                FieldDefinition::new(
                    "room",
                    FieldKind::Select,
                    FieldInit::new()
                        .title("Room")
                        .options(["single", "double", "suite"])
                        .default_value("single"),
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{AttrValue, VALUE};
    use crate::forms::{FormData, SubmitOutcome};
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scaffold_lays_out_conventional_ids() {
        let doc = MemoryDocument::new();
        let definition = FormDefinition::sample();
        let form = definition.scaffold(&doc);

        assert_eq!(form.tag(), "form");
        for id in [
            "booking-title",
            "booking-submit",
            "guest",
            "guest-title",
            "guest-description",
            "guest-display",
            "room",
        ] {
            assert!(doc.locate(id).is_ok(), "missing {id}");
        }
        assert_eq!(doc.locate("room").unwrap().tag(), "select");
        assert_eq!(
            doc.locate("arrival").unwrap().read_attribute("type"),
            Some(AttrValue::Text("date".into()))
        );
        assert_eq!(doc.locate("guest-title").unwrap().text(), "guest");
    }

    #[test]
    fn test_sample_binds_end_to_end() {
        let doc = MemoryDocument::new();
        let definition = FormDefinition::sample();
        definition.scaffold(&doc);
        let form = definition.into_builder(&doc).unwrap().bind(&doc).unwrap();

        assert_eq!(doc.locate("booking-title").unwrap().text(), "Room booking");
        assert_eq!(doc.locate("guest-title").unwrap().text(), "Guest name");
        assert_eq!(
            form.field("room").unwrap().options().unwrap().get_all(),
            vec!["single", "double", "suite"]
        );
        assert_eq!(
            form.field("check_in").unwrap().get_value().unwrap().to_string(),
            "15:00"
        );
        assert!(form.field("guest").unwrap().is_required());
    }

    #[test]
    fn test_submit_leaves_select_on_an_option() {
        let doc = MemoryDocument::new();
        let definition = FormDefinition::sample();
        definition.scaffold(&doc);
        let form = definition
            .into_builder(&doc)
            .unwrap()
            .sink(|_: FormData| {})
            .bind(&doc)
            .unwrap();

        let room = form.field("room").unwrap();
        room.set_value("suite");
        form.field("arrival").unwrap().set_value("2024-03-01");
        assert_eq!(form.submit().unwrap(), SubmitOutcome::Submitted);

        let options = room.options().unwrap().get_all();
        let value = room.get_value().unwrap().to_string();
        assert!(options.contains(&value), "{value:?} not in {options:?}");
        assert_eq!(value, "single");
    }

    #[test]
    fn test_definition_from_json() {
        let definition = FormDefinition::from_json(
            r#"{
                "name": "event",
                "fields": [
                    {"name": "title", "placeholder": "Launch"},
                    {"name": "day", "kind": "date", "defaultValue": "2024-03-01"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(definition.fields.len(), 2);
        assert_eq!(definition.fields[0].kind, FieldKind::Text);
        assert_eq!(definition.fields[1].kind, FieldKind::Date);

        let doc = MemoryDocument::new();
        definition.scaffold(&doc);
        let form = definition.into_builder(&doc).unwrap().bind(&doc).unwrap();
        assert_eq!(
            doc.locate("title").unwrap().read_attribute("placeholder"),
            Some(AttrValue::Text("Launch".into()))
        );
        assert_eq!(
            doc.locate("day").unwrap().read_attribute(VALUE),
            Some(AttrValue::Text("2024-03-01".into()))
        );
        assert_eq!(
            form.get_form_data().unwrap().get("title"),
            Some(&Value::from(""))
        );
    }
}
