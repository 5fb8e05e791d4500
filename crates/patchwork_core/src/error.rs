//! Errors returned by change application.

use thiserror::Error;

/// Failure to apply a change set onto a record.
///
/// Fields assigned before the failing change keep their new values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyError {
    /// The record is absent or cannot be addressed
    #[error("invalid target {record}: {reason}")]
    InvalidTarget { record: &'static str, reason: String },

    /// The field's type has no coercion and the value is not of that exact type
    #[error("field '{field}' on {record} has type {type_name}, which cannot take a {actual} value")]
    UnknownFieldType {
        record: &'static str,
        field: String,
        type_name: &'static str,
        actual: &'static str,
    },

    /// The value could not be converted to the field's type
    #[error("cannot coerce {actual} into {expected} for field '{field}': {reason}")]
    Coercion {
        field: String,
        expected: &'static str,
        actual: &'static str,
        reason: String,
    },

    /// A change names no field (only raised when unknown fields are rejected)
    #[error("{record} has no field tagged '{tag}'")]
    UnknownField { record: &'static str, tag: String },
}

impl ApplyError {
    /// Tag of the change that failed, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ApplyError::InvalidTarget { .. } => None,
            ApplyError::UnknownFieldType { field, .. } | ApplyError::Coercion { field, .. } => {
                Some(field)
            }
            ApplyError::UnknownField { tag, .. } => Some(tag),
        }
    }
}
