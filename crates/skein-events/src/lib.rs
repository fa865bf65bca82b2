//! Skein Events - Core event types and the binary record codec
//!
//! This crate provides the types that flow through the ingestion pipeline:
//! - `Event` - an immutable unit of input data (tenant, collection, properties)
//! - `Schema` / `Field` / `FieldType` - the declared shape of a collection
//! - `Record` / `Value` - a schema-bound property map, validated at encode time
//! - `codec` - the schema-driven binary encoding used on the wire
//!
//! # Design Principles
//!
//! - **Schema-driven**: field order and types are fixed by the collection's
//!   declared schema; the wire format carries no field names or tags
//! - **Late validation**: `Record` values are loosely typed and checked
//!   against the schema when encoded, so a schema/data mismatch surfaces as
//!   an `EncodeError` at the ingestion boundary instead of deep in transport
//! - **Zero-copy friendly**: encoding appends to a caller-supplied `BytesMut`
//!   so the delivery layer can split records off without copying

mod codec;
mod error;
mod event;
mod record;
mod schema;

pub use codec::{decode_record, encode_record};
pub use error::CodecError;
pub use event::Event;
pub use record::{Record, Value};
pub use schema::{Field, FieldType, Schema};

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod event_test;
#[cfg(test)]
mod schema_test;
