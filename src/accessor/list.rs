//! Ordered list of strings materialized as child nodes

use crate::dom::{Document, Target, TEXT_CONTENT, VALUE};
use crate::error::Result;
use std::fmt;

/// An index-addressable sequence backed by the children of a container.
///
/// Out-of-range reads return `None` and out-of-range writes or deletions are
/// silently ignored.
#[derive(Debug)]
pub struct ListAccessor<T: Target> {
    container: T,
    child_tag: String,
}

impl<T: Target> ListAccessor<T> {
    /// Locate the container by id; fails fast when absent
    pub fn bind<D>(document: &D, id: &str, child_tag: &str) -> Result<Self>
    where
        D: Document<Node = T>,
    {
        let container = document.locate(id)?;
        tracing::debug!(id, child_tag, "bound list accessor");
        Ok(Self::new(container, child_tag))
    }

    pub fn new(container: T, child_tag: &str) -> Self {
        Self {
            container,
            child_tag: child_tag.to_string(),
        }
    }

    pub fn length(&self) -> usize {
        self.container.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Snapshot of every item's text in document order
    pub fn get_all(&self) -> Vec<String> {
        self.container.children().iter().map(item_text).collect()
    }

    /// Replace the whole sequence in one swap
    pub fn set_all<I>(&self, items: I)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let fresh: Vec<T> = items
            .into_iter()
            .map(|item| self.create_item(&item.to_string()))
            .collect();
        self.container.replace_children(&fresh);
    }

    pub fn get(&self, index: usize) -> Option<String> {
        self.container.children().get(index).map(item_text)
    }

    /// Overwrite the item at `index`; no-op when out of range
    pub fn set(&self, index: usize, value: impl fmt::Display) {
        if let Some(item) = self.container.children().get(index) {
            let text = value.to_string();
            item.write_attribute(VALUE, &text);
            item.write_attribute(TEXT_CONTENT, &text);
        }
    }

    pub fn update(&self, index: usize, value: impl fmt::Display) {
        self.set(index, value);
    }

    pub fn append(&self, value: impl fmt::Display) {
        let item = self.create_item(&value.to_string());
        self.container.append_child(&item);
    }

    pub fn push(&self, value: impl fmt::Display) {
        self.append(value);
    }

    /// Remove the first item whose text equals `value`, returning its position
    pub fn remove_by_value(&self, value: &str) -> Option<usize> {
        let children = self.container.children();
        let index = children.iter().position(|item| item_text(item) == value)?;
        children[index].remove();
        Some(index)
    }

    /// Remove and return the last item
    pub fn pop_last(&self) -> Option<String> {
        let last = self.container.children().pop()?;
        last.remove();
        Some(item_text(&last))
    }

    /// Remove the item at `index`; no-op when out of range
    pub fn delete_at(&self, index: usize) {
        if let Some(item) = self.container.children().get(index) {
            item.remove();
        }
    }

    fn create_item(&self, text: &str) -> T {
        let item = self.container.create_element(&self.child_tag);
        item.write_attribute(VALUE, text);
        item.write_attribute(TEXT_CONTENT, text);
        item
    }
}

fn item_text<T: Target>(item: &T) -> String {
    item.read_attribute(TEXT_CONTENT)
        .map(|value| value.to_text())
        .unwrap_or_default()
}
