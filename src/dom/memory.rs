//! Headless in-memory document
//!
//! Nodes live in an arena owned by [`MemoryDocument`]; [`MemoryNode`] handles
//! hold only a weak reference to it, so a handle never keeps a document
//! alive. Once the document is dropped every handle operation is a no-op.

use super::{AttrValue, Document, EventHandler, EventKind, Target, REQUIRED, TEXT_CONTENT};
use crate::error::{FormError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Attributes reflected as booleans, like their DOM properties
const BOOLEAN_ATTRIBUTES: &[&str] = &[REQUIRED, "checked", "disabled"];

const ROOT: usize = 0;

type SharedHandler = Rc<RefCell<EventHandler>>;

#[derive(Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, AttrValue>,
    parent: Option<usize>,
    children: Vec<usize>,
    handlers: Vec<(EventKind, SharedHandler)>,
}

#[derive(Default)]
struct Arena {
    nodes: Vec<NodeData>,
}

impl Arena {
    fn push(&mut self, tag: &str) -> usize {
        self.nodes.push(NodeData {
            tag: tag.to_string(),
            ..Default::default()
        });
        self.nodes.len() - 1
    }

    fn detach(&mut self, index: usize) {
        if let Some(parent) = self.nodes[index].parent.take() {
            self.nodes[parent].children.retain(|&child| child != index);
        }
    }

    fn is_ancestor_or_self(&self, candidate: usize, mut index: usize) -> bool {
        loop {
            if index == candidate {
                return true;
            }
            match self.nodes[index].parent {
                Some(parent) => index = parent,
                None => return false,
            }
        }
    }

    /// First node in tree order whose `id` attribute matches
    fn find_by_id(&self, index: usize, id: &str) -> Option<usize> {
        let node = &self.nodes[index];
        if matches!(node.attributes.get("id"), Some(AttrValue::Text(value)) if value == id) {
            return Some(index);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_by_id(child, id))
    }
}

/// Owner of a tree of [`MemoryNode`]s rooted at a `body` node.
///
/// Slots are never reclaimed: removed or replaced nodes stay in the arena
/// until the document is dropped, so repeated `replace_children` grows it.
#[derive(Clone)]
pub struct MemoryDocument {
    arena: Rc<RefCell<Arena>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut arena = Arena::default();
        arena.push("body");
        Self {
            arena: Rc::new(RefCell::new(arena)),
        }
    }

    /// The root node
    pub fn body(&self) -> MemoryNode {
        self.node(ROOT)
    }

    /// Create a detached node
    pub fn create_element(&self, tag: &str) -> MemoryNode {
        let index = self.arena.borrow_mut().push(tag);
        self.node(index)
    }

    /// Deliver `kind` to the connected node with the given id
    pub fn dispatch(&self, id: &str, kind: EventKind) -> Result<()> {
        self.locate(id)?.dispatch(kind);
        Ok(())
    }

    fn node(&self, index: usize) -> MemoryNode {
        MemoryNode {
            arena: Rc::downgrade(&self.arena),
            index,
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &self.arena.borrow().nodes.len())
            .finish()
    }
}

impl Document for MemoryDocument {
    type Node = MemoryNode;

    fn locate(&self, id: &str) -> Result<MemoryNode> {
        let found = self.arena.borrow().find_by_id(ROOT, id);
        found
            .map(|index| self.node(index))
            .ok_or_else(|| FormError::not_found(id))
    }
}

/// Handle to a node in a [`MemoryDocument`]
#[derive(Clone)]
pub struct MemoryNode {
    arena: Weak<RefCell<Arena>>,
    index: usize,
}

impl MemoryNode {
    fn with<R>(&self, f: impl FnOnce(&Arena) -> R) -> Option<R> {
        let arena = self.arena.upgrade()?;
        let arena = arena.borrow();
        Some(f(&arena))
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> Option<R> {
        let arena = self.arena.upgrade()?;
        let mut arena = arena.borrow_mut();
        Some(f(&mut arena))
    }

    fn sibling(&self, index: usize) -> MemoryNode {
        MemoryNode {
            arena: self.arena.clone(),
            index,
        }
    }

    fn same_document(&self, other: &MemoryNode) -> bool {
        Weak::ptr_eq(&self.arena, &other.arena)
    }

    pub fn tag(&self) -> String {
        self.with(|arena| arena.nodes[self.index].tag.clone())
            .unwrap_or_default()
    }

    pub fn id(&self) -> Option<String> {
        self.read_attribute("id").map(|value| value.to_text())
    }

    /// Rendered text, empty when unset
    pub fn text(&self) -> String {
        self.read_attribute(TEXT_CONTENT)
            .map(|value| value.to_text())
            .unwrap_or_default()
    }

    pub fn parent(&self) -> Option<MemoryNode> {
        self.with(|arena| arena.nodes[self.index].parent)
            .flatten()
            .map(|index| self.sibling(index))
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self) -> bool {
        self.with(|arena| arena.is_ancestor_or_self(ROOT, self.index))
            .unwrap_or(false)
    }

    /// Append a new child element carrying an `id`
    pub fn append_element(&self, tag: &str, id: &str) -> MemoryNode {
        let child = self.create_child(tag);
        child.write_attribute("id", id);
        child
    }

    /// Invoke every handler registered for `kind`, in registration order.
    ///
    /// A handler that is already running (re-entrant dispatch) is skipped.
    pub fn dispatch(&self, kind: EventKind) {
        let handlers: Vec<SharedHandler> = self
            .with(|arena| {
                arena.nodes[self.index]
                    .handlers
                    .iter()
                    .filter(|(registered, _)| *registered == kind)
                    .map(|(_, handler)| Rc::clone(handler))
                    .collect()
            })
            .unwrap_or_default();

        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    let callback = &mut *handler;
                    callback();
                }
                Err(_) => tracing::trace!(?kind, "skipping re-entrant event handler"),
            }
        }
    }
}

impl Target for MemoryNode {
    fn read_attribute(&self, name: &str) -> Option<AttrValue> {
        self.with(|arena| arena.nodes[self.index].attributes.get(name).cloned())
            .flatten()
    }

    fn write_attribute(&self, name: &str, value: &str) {
        let stored = if BOOLEAN_ATTRIBUTES.contains(&name) {
            AttrValue::Bool(!(value.is_empty() || value.eq_ignore_ascii_case("false")))
        } else {
            AttrValue::Text(value.to_string())
        };
        self.with_mut(|arena| {
            arena.nodes[self.index]
                .attributes
                .insert(name.to_string(), stored);
        });
    }

    fn children(&self) -> Vec<Self> {
        self.with(|arena| arena.nodes[self.index].children.clone())
            .unwrap_or_default()
            .into_iter()
            .map(|index| self.sibling(index))
            .collect()
    }

    fn create_element(&self, tag: &str) -> Self {
        let index = self.with_mut(|arena| arena.push(tag)).unwrap_or(usize::MAX);
        self.sibling(index)
    }

    fn append_child(&self, child: &Self) {
        if !self.same_document(child) {
            tracing::warn!("refusing to adopt a node from another document");
            return;
        }
        self.with_mut(|arena| {
            if child.index >= arena.nodes.len()
                || arena.is_ancestor_or_self(child.index, self.index)
            {
                tracing::warn!(child = child.index, "refusing to append an ancestor");
                return;
            }
            arena.detach(child.index);
            arena.nodes[child.index].parent = Some(self.index);
            arena.nodes[self.index].children.push(child.index);
        });
    }

    fn replace_children(&self, children: &[Self]) {
        if children.iter().any(|child| !self.same_document(child)) {
            tracing::warn!("refusing to adopt nodes from another document");
            return;
        }
        self.with_mut(|arena| {
            let incoming: Vec<usize> = children
                .iter()
                .map(|child| child.index)
                .filter(|&index| {
                    index < arena.nodes.len() && !arena.is_ancestor_or_self(index, self.index)
                })
                .collect();
            for old in std::mem::take(&mut arena.nodes[self.index].children) {
                arena.nodes[old].parent = None;
            }
            for &index in &incoming {
                arena.detach(index);
                arena.nodes[index].parent = Some(self.index);
            }
            arena.nodes[self.index].children = incoming;
        });
    }

    fn remove(&self) {
        self.with_mut(|arena| arena.detach(self.index));
    }

    fn on_event(&self, kind: EventKind, handler: EventHandler) {
        self.with_mut(|arena| {
            arena.nodes[self.index]
                .handlers
                .push((kind, Rc::new(RefCell::new(handler))));
        });
    }
}

impl PartialEq for MemoryNode {
    fn eq(&self, other: &Self) -> bool {
        self.same_document(other) && self.index == other.index
    }
}

impl Eq for MemoryNode {}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryNode")
            .field("tag", &self.tag())
            .field("index", &self.index)
            .finish()
    }
}
