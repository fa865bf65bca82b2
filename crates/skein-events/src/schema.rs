//! Collection schemas
//!
//! A `Schema` fixes the field order and field types for every event of a
//! collection. The binary record format carries no field names, so encoder
//! and decoder must agree on the same schema instance.

use std::sync::Arc;

/// Primitive type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Boolean flag
    Bool,
    /// 64-bit signed integer
    Long,
    /// 64-bit IEEE float
    Double,
    /// UTF-8 string
    String,
    /// Milliseconds since the Unix epoch
    Timestamp,
    /// Opaque byte payload
    Binary,
}

impl FieldType {
    /// Get the string name of this field type
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Timestamp => "timestamp",
            Self::Binary => "binary",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field of a collection schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    ty: FieldType,
    nullable: bool,
}

impl Field {
    /// Create a required (non-nullable) field
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }

    /// Create a nullable field
    pub fn nullable(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
        }
    }

    /// Get the field name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the field type
    #[inline]
    pub fn ty(&self) -> FieldType {
        self.ty
    }

    /// Whether null is a legal value for this field
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Ordered field list for one collection
///
/// Schemas are shared between many events of the same collection, so they
/// are normally held behind an `Arc` (see [`Schema::into_shared`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from an ordered field list
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Wrap this schema in an `Arc` for sharing across events
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Number of fields
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field by position
    #[inline]
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Look up a field position by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Iterate over the fields in declaration order
    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}
