//! Error types for binding, parsing and value arithmetic

use thiserror::Error;

/// Errors raised by accessors, temporal values, fields and forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No element with the given id exists in the document
    #[error("Element with id '{id}' not found")]
    TargetNotFound { id: String },

    /// Stored or supplied text does not match the expected pattern
    #[error("Invalid {kind} format: '{input}' (expected {expected})")]
    InvalidFormat {
        kind: &'static str,
        input: String,
        expected: &'static str,
    },

    /// Operand of the wrong kind passed to a construction or arithmetic call
    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Arithmetic left the representable calendar range
    #[error("{kind} arithmetic out of range: {detail}")]
    OutOfRange { kind: &'static str, detail: String },

    /// Two fields with the same name registered on one form
    #[error("Field '{name}' is declared more than once")]
    DuplicateField { name: String },
}

impl FormError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        FormError::TargetNotFound { id: id.into() }
    }

    pub(crate) fn mismatch(expected: &'static str, found: &'static str) -> Self {
        FormError::TypeMismatch { expected, found }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_not_found_message() {
        let err = FormError::not_found("email-title");
        assert_eq!(err.to_string(), "Element with id 'email-title' not found");
    }

    #[test]
    fn test_invalid_format_message() {
        let err = FormError::InvalidFormat {
            kind: "date",
            input: "2024-13-01".to_string(),
            expected: "YYYY-MM-DD",
        };
        assert_eq!(
            err.to_string(),
            "Invalid date format: '2024-13-01' (expected YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = FormError::mismatch("time", "date");
        assert_eq!(err.to_string(), "Type mismatch: expected time, got date");
    }
}
