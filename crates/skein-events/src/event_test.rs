//! Tests for the event type

use crate::event::Event;
use crate::record::{Record, Value};
use crate::schema::{Field, FieldType, Schema};

fn sample_event() -> Event {
    let schema = Schema::new(vec![Field::new("name", FieldType::String)]).into_shared();
    let record = Record::new(schema, vec![Value::from("signup")]).unwrap();
    Event::new("acme", "app_events", record)
}

#[test]
fn test_accessors() {
    let event = sample_event();

    assert_eq!(event.project(), "acme");
    assert_eq!(event.collection(), "app_events");
    assert_eq!(
        event.properties().value_by_name("name"),
        Some(&Value::String("signup".into()))
    );
}

#[test]
fn test_partition_key_joins_project_and_collection() {
    let event = sample_event();

    assert_eq!(event.partition_key(), "acme|app_events");
}
