//! Codec error types
//!
//! Errors raised when a record cannot be encoded against its declared
//! schema, or when a wire payload cannot be decoded back into a record.

use thiserror::Error;

use crate::schema::FieldType;

/// Errors from the schema-driven record codec
#[derive(Debug, Error)]
pub enum CodecError {
    /// Record value count does not match the schema's field count
    #[error("field count mismatch: schema declares {expected} fields, record has {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    /// A value does not conform to its declared field type
    #[error("field `{field}` expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: &'static str,
    },

    /// Null supplied for a field that is not nullable
    #[error("field `{0}` is not nullable")]
    UnexpectedNull(String),

    /// Payload ended before all schema fields were decoded
    #[error("payload truncated while decoding field `{field}`: need {needed} more bytes")]
    Truncated { field: String, needed: usize },

    /// Payload has bytes left over after the last schema field
    #[error("payload has {0} trailing bytes after the last field")]
    TrailingBytes(usize),

    /// Varint did not terminate within 10 bytes
    #[error("varint overflow while decoding field `{0}`")]
    VarintOverflow(String),

    /// A decoded string was not valid UTF-8
    #[error("field `{0}` contains invalid UTF-8")]
    InvalidUtf8(String),

    /// Presence branch byte was neither 0 (null) nor 1 (present)
    #[error("field `{field}` has invalid presence branch {branch}")]
    InvalidBranch { field: String, branch: u8 },
}

impl CodecError {
    /// Create a type mismatch error
    pub fn type_mismatch(field: &str, expected: FieldType, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
            actual,
        }
    }

    /// Create a truncation error
    pub fn truncated(field: &str, needed: usize) -> Self {
        Self::Truncated {
            field: field.to_string(),
            needed,
        }
    }
}
