//! Tests for schema types

use crate::schema::{Field, FieldType, Schema};

fn page_view_schema() -> Schema {
    Schema::new(vec![
        Field::new("url", FieldType::String),
        Field::new("_time", FieldType::Timestamp),
        Field::nullable("referrer", FieldType::String),
        Field::nullable("duration_ms", FieldType::Long),
    ])
}

#[test]
fn test_field_lookup_by_name() {
    let schema = page_view_schema();

    assert_eq!(schema.index_of("url"), Some(0));
    assert_eq!(schema.index_of("duration_ms"), Some(3));
    assert_eq!(schema.index_of("missing"), None);
}

#[test]
fn test_field_accessors() {
    let schema = page_view_schema();
    let field = schema.field(2).unwrap();

    assert_eq!(field.name(), "referrer");
    assert_eq!(field.ty(), FieldType::String);
    assert!(field.is_nullable());

    let required = schema.field(0).unwrap();
    assert!(!required.is_nullable());
}

#[test]
fn test_len_and_iteration_order() {
    let schema = page_view_schema();

    assert_eq!(schema.len(), 4);
    assert!(!schema.is_empty());

    let names: Vec<&str> = schema.fields().map(|f| f.name()).collect();
    assert_eq!(names, ["url", "_time", "referrer", "duration_ms"]);
}

#[test]
fn test_field_type_display() {
    assert_eq!(FieldType::Timestamp.to_string(), "timestamp");
    assert_eq!(FieldType::Double.as_str(), "double");
}

#[test]
fn test_empty_schema() {
    let schema = Schema::new(vec![]);

    assert!(schema.is_empty());
    assert_eq!(schema.field(0), None);
}
