//! Typed bindings between form fields and document elements.
//!
//! A [`dom::Document`] hands out [`dom::Target`] handles by id. Accessors in
//! [`accessor`] read and write one attribute of a target (or the child list
//! of a container) as a typed [`value::Value`]. [`forms::Field`] groups the
//! accessors of one input and [`forms::Form`] gathers fields into a record
//! that is delivered on submit.

pub mod accessor;
pub mod dom;
pub mod error;
pub mod forms;
pub mod value;

pub use error::{FormError, Result};
