//! Schema-bound property records
//!
//! A `Record` pairs a shared collection schema with one value per field.
//! Values are loosely typed on purpose: upstream decoding (JSON bodies,
//! connector payloads) produces values before the schema check, and the
//! codec reports the mismatch when the record is encoded.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::CodecError;
use crate::schema::Schema;

/// A single property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (legal only for nullable fields)
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
    Binary(Bytes),
}

impl Value {
    /// Short name of the value's runtime type, for error messages
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Long(_) => "long",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Binary(_) => "binary",
        }
    }

    /// Check if the value is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// One event's property values, bound to a collection schema
///
/// Construction only checks arity; per-field type conformance is checked
/// by [`crate::encode_record`] so that a mismatch surfaces exactly where
/// the ingestion pipeline can classify it as a hard per-event failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Record {
    /// Bind values to a schema
    ///
    /// # Errors
    ///
    /// Returns `CodecError::FieldCountMismatch` if the value count does not
    /// match the schema's field count.
    pub fn new(schema: Arc<Schema>, values: Vec<Value>) -> Result<Self, CodecError> {
        if values.len() != schema.len() {
            return Err(CodecError::FieldCountMismatch {
                expected: schema.len(),
                actual: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    /// Get the bound schema
    #[inline]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Get a value by field position
    #[inline]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by field name
    pub fn value_by_name(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Iterate over values in schema field order
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Number of values (always equals the schema's field count)
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record has no values
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
