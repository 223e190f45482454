//! Bindable target abstraction
//!
//! The core never touches a rendering surface directly. It binds to
//! element-like targets located by id through a [`Document`], reads and
//! writes their attributes, manages their children and subscribes to their
//! events. [`memory::MemoryDocument`] is the headless implementation used by
//! the terminal front-end and the tests.

pub mod memory;

pub use memory::{MemoryDocument, MemoryNode};

use crate::error::Result;

/// Attribute holding a node's rendered text
pub const TEXT_CONTENT: &str = "textContent";

/// Attribute holding an input's current value
pub const VALUE: &str = "value";

/// Attribute holding an input's hint text
pub const PLACEHOLDER: &str = "placeholder";

/// Boolean attribute marking an input as mandatory
pub const REQUIRED: &str = "required";

/// A stored attribute: free text or a reflected boolean
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Bool(bool),
}

impl AttrValue {
    /// Text form of the attribute (`"true"`/`"false"` for booleans)
    pub fn to_text(&self) -> String {
        match self {
            AttrValue::Text(text) => text.clone(),
            AttrValue::Bool(flag) => flag.to_string(),
        }
    }
}

/// Events a target can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The user edited an input
    Input,
    /// The user committed a selection
    Change,
    /// The user asked to submit a form
    Submit,
}

/// Zero-argument, synchronously invoked event callback
pub type EventHandler = Box<dyn FnMut()>;

/// An element-like node that accessors bind to.
///
/// Implementations are cheap handles: cloning yields another handle to the
/// same node, and all mutation goes through `&self`.
pub trait Target: Clone {
    fn read_attribute(&self, name: &str) -> Option<AttrValue>;

    fn write_attribute(&self, name: &str, value: &str);

    /// Child nodes in document order
    fn children(&self) -> Vec<Self>;

    /// Create a detached node owned by the same document
    fn create_element(&self, tag: &str) -> Self;

    /// Append `child` as the last child, detaching it from any previous parent
    fn append_child(&self, child: &Self);

    /// Swap the whole child list in one step
    fn replace_children(&self, children: &[Self]);

    /// Detach this node from its parent
    fn remove(&self);

    fn on_event(&self, kind: EventKind, handler: EventHandler);

    /// Create a node and append it as the last child
    fn create_child(&self, tag: &str) -> Self {
        let child = self.create_element(tag);
        self.append_child(&child);
        child
    }
}

/// Resolves element ids to targets
pub trait Document {
    type Node: Target;

    /// Find a connected node by id, failing with `TargetNotFound`
    fn locate(&self, id: &str) -> Result<Self::Node>;
}
