//! Output helper for the conventional `<prefix>-display` nodes

use crate::dom::{Document, Target, TEXT_CONTENT};
use crate::error::Result;
use std::fmt;

/// Write `value`'s text into the node with id `<prefix>-display`
pub fn display<D: Document>(document: &D, prefix: &str, value: impl fmt::Display) -> Result<()> {
    let target = document.locate(&format!("{prefix}-display"))?;
    target.write_attribute(TEXT_CONTENT, &value.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::error::FormError;
    use crate::value::{ClockTime, Temporal};

    #[test]
    fn test_display_writes_text() {
        let doc = MemoryDocument::new();
        doc.body().append_element("span", "end-display");
        let end = ClockTime::parse("22:30").unwrap().add(120).unwrap();
        display(&doc, "end", end).unwrap();
        assert_eq!(doc.locate("end-display").unwrap().text(), "00:30");
    }

    #[test]
    fn test_display_missing_target() {
        let doc = MemoryDocument::new();
        assert_eq!(
            display(&doc, "page", "hi").unwrap_err(),
            FormError::TargetNotFound { id: "page-display".into() }
        );
    }
}
