//! Application state and key handling for the form runner

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formbind::accessor::ValueAccessor;
use formbind::dom::{Document, EventKind, MemoryDocument, MemoryNode, Target, VALUE};
use formbind::forms::{
    display, ChangeHook, Field, FieldKind, Form, FormData, FormDefinition, SubmitOutcome,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Main application state
pub struct App {
    document: MemoryDocument,
    pub form: Form<MemoryNode>,
    /// Index of the focused field
    pub active: usize,
    pub status_message: Option<String>,
    pub last_submission: Option<FormData>,
    inbox: Rc<RefCell<Option<FormData>>>,
    should_quit: bool,
}

impl App {
    /// Scaffold the definition into a fresh document and bind it
    pub fn new(mut definition: FormDefinition) -> Result<Self> {
        let document = MemoryDocument::new();
        definition.scaffold(&document);

        // Temporal fields refuse to submit while they hold unparseable text
        for field in &mut definition.fields {
            if !matches!(field.kind, FieldKind::Date | FieldKind::Time) {
                continue;
            }
            let accessor = ValueAccessor::new(
                document.locate(&field.name)?,
                VALUE,
                field.kind.value_kind(),
            );
            let hook: ChangeHook = Box::new(move || {
                input_text(accessor.target()).is_empty() || accessor.get().is_ok()
            });
            field.init.on_change = Some(hook);
        }

        let inbox = Rc::new(RefCell::new(None));
        let sink_inbox = Rc::clone(&inbox);
        let form = definition
            .into_builder(&document)?
            .sink(move |record: FormData| {
                *sink_inbox.borrow_mut() = Some(record);
            })
            .bind(&document)?;

        tracing::info!(form = %form.name(), fields = form.fields().len(), "form ready");
        Ok(Self {
            document,
            form,
            active: 0,
            status_message: None,
            last_submission: None,
            inbox,
            should_quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn active_field(&self) -> Option<&Field<MemoryNode>> {
        self.form.fields().get(self.active)
    }

    /// Text of the `<name>-display` node, empty when it is missing
    pub fn display_text(&self, name: &str) -> String {
        self.document
            .locate(&format!("{name}-display"))
            .map(|node| node.text())
            .unwrap_or_default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Enter => self.submit(),
            KeyCode::Up => self.cycle_option(-1),
            KeyCode::Down => self.cycle_option(1),
            KeyCode::Backspace => self.edit(|text| {
                text.pop();
            }),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit(|text| text.push(c))
            }
            _ => {}
        }
        Ok(())
    }

    fn focus_next(&mut self) {
        let count = self.form.fields().len();
        if count > 0 {
            self.active = (self.active + 1) % count;
        }
    }

    fn focus_prev(&mut self) {
        let count = self.form.fields().len();
        if count > 0 {
            self.active = (self.active + count - 1) % count;
        }
    }

    fn edit(&mut self, change: impl FnOnce(&mut String)) {
        let Some(field) = self.active_field() else {
            return;
        };
        if field.kind().is_enumerated() {
            return;
        }
        let mut text = input_text(field.input());
        change(&mut text);
        field.set_value(&text);
        self.after_input();
    }

    fn cycle_option(&mut self, step: isize) {
        let Some(field) = self.active_field() else {
            return;
        };
        let Some(options) = field.options() else {
            return;
        };
        let all = options.get_all();
        if all.is_empty() {
            return;
        }
        let current = input_text(field.input());
        let next = match all.iter().position(|option| *option == current) {
            Some(index) => (index as isize + step).rem_euclid(all.len() as isize) as usize,
            None => 0,
        };
        field.set_value(&all[next]);
        self.after_input();
    }

    /// Fire the input event and refresh the field's display line
    fn after_input(&mut self) {
        let Some(field) = self.active_field() else {
            return;
        };
        field.input().dispatch(EventKind::Input);

        let shown = if input_text(field.input()).is_empty() {
            String::new()
        } else {
            match field.get_value() {
                Ok(value) => value.to_string(),
                Err(err) => err.to_string(),
            }
        };
        if let Err(err) = display(&self.document, field.name(), shown) {
            tracing::debug!(field = %field.name(), error = %err, "no display node");
        }
        self.status_message = None;
    }

    fn submit(&mut self) {
        match self.form.submit() {
            Ok(SubmitOutcome::Submitted) => {
                let record = self.inbox.borrow_mut().take();
                self.status_message = record
                    .as_ref()
                    .and_then(|record| serde_json::to_string(record).ok())
                    .map(|json| format!("Submitted {json}"));
                self.last_submission = record;
                self.clear_displays();
                self.active = 0;
            }
            Ok(SubmitOutcome::Suppressed) => {
                let blocking = self.form.blocking_fields().join(", ");
                self.status_message = Some(format!("Fix before submitting: {blocking}"));
            }
            Err(err) => {
                tracing::warn!(form = %self.form.name(), error = %err, "submit failed");
                self.status_message = Some(format!("Submit failed: {err}"));
            }
        }
    }

    fn clear_displays(&self) {
        for field in self.form.fields() {
            if let Err(err) = display(&self.document, field.name(), "") {
                tracing::debug!(field = %field.name(), error = %err, "no display node");
            }
        }
    }
}

/// Raw `value` attribute of an input
pub fn input_text(node: &MemoryNode) -> String {
    node.read_attribute(VALUE)
        .map(|value| value.to_text())
        .unwrap_or_default()
}
