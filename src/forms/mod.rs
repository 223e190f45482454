//! Fields, forms and the records they produce

mod definition;
mod display;
mod field;
mod form;
mod record;

pub use definition::{FieldDefinition, FormDefinition};
pub use display::display;
pub use field::{ChangeHook, Field, FieldInit, FieldKind};
pub use form::{Form, FormBuilder, SubmitGate, SubmitOutcome, SubmitSink};
pub use record::FormData;
