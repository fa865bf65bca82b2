//! Schema-driven binary record codec
//!
//! Encodes one record's values in schema field order into a compact binary
//! payload, and decodes such a payload back given the same schema.
//!
//! # Wire Format Layout
//!
//! No field names or tags appear on the wire; the schema fixes everything:
//!
//! ```text
//! for each field, in schema order:
//!   nullable fields: presence branch (1 byte: 0 = null, 1 = present)
//!   bool:            1 byte (0 / 1)
//!   long, timestamp: zigzag varint
//!   double:          8 bytes, IEEE-754 bits little-endian
//!   string, binary:  varint length prefix, then the bytes
//! ```
//!
//! Varints are unsigned LEB128 (7 bits per byte, low groups first); signed
//! values are zigzag-mapped so small negative numbers stay small on the
//! wire.

use bytes::{BufMut, BytesMut};

use crate::error::CodecError;
use crate::record::{Record, Value};
use crate::schema::{Field, FieldType, Schema};

use std::sync::Arc;

/// Encode a record's values into `out` in schema field order
///
/// Appends to the buffer without touching existing content, so the caller
/// can pack several records into one allocation and split them apart.
///
/// # Errors
///
/// `CodecError::TypeMismatch` / `CodecError::UnexpectedNull` when a value
/// does not conform to its declared field - a schema/data mismatch that
/// must be treated as a hard, non-retriable failure for that event.
pub fn encode_record(record: &Record, out: &mut BytesMut) -> Result<(), CodecError> {
    let schema = record.schema();

    for (index, value) in record.values().enumerate() {
        // Record::new guarantees one value per schema field
        let field = match schema.field(index) {
            Some(f) => f,
            None => {
                return Err(CodecError::FieldCountMismatch {
                    expected: schema.len(),
                    actual: record.len(),
                })
            }
        };
        encode_field(field, value, out)?;
    }

    Ok(())
}

fn encode_field(field: &Field, value: &Value, out: &mut BytesMut) -> Result<(), CodecError> {
    if field.is_nullable() {
        if value.is_null() {
            out.put_u8(0);
            return Ok(());
        }
        out.put_u8(1);
    } else if value.is_null() {
        return Err(CodecError::UnexpectedNull(field.name().to_string()));
    }

    match (field.ty(), value) {
        (FieldType::Bool, Value::Bool(v)) => out.put_u8(u8::from(*v)),
        (FieldType::Long, Value::Long(v)) => write_zigzag(out, *v),
        (FieldType::Timestamp, Value::Timestamp(v)) => write_zigzag(out, *v),
        (FieldType::Double, Value::Double(v)) => out.put_u64_le(v.to_bits()),
        (FieldType::String, Value::String(v)) => {
            write_varint(out, v.len() as u64);
            out.put_slice(v.as_bytes());
        }
        (FieldType::Binary, Value::Binary(v)) => {
            write_varint(out, v.len() as u64);
            out.put_slice(v);
        }
        (expected, actual) => {
            return Err(CodecError::type_mismatch(
                field.name(),
                expected,
                actual.kind(),
            ))
        }
    }

    Ok(())
}

/// Decode a payload produced by [`encode_record`] against the same schema
///
/// The payload must contain exactly one record; leftover bytes are an
/// error so framing bugs surface here instead of corrupting the next
/// record.
pub fn decode_record(payload: &[u8], schema: Arc<Schema>) -> Result<Record, CodecError> {
    let mut cursor = payload;
    let mut values = Vec::with_capacity(schema.len());

    for field in schema.fields() {
        values.push(decode_field(field, &mut cursor)?);
    }

    if !cursor.is_empty() {
        return Err(CodecError::TrailingBytes(cursor.len()));
    }

    Record::new(schema, values)
}

fn decode_field(field: &Field, cursor: &mut &[u8]) -> Result<Value, CodecError> {
    if field.is_nullable() {
        let branch = take_byte(field, cursor)?;
        match branch {
            0 => return Ok(Value::Null),
            1 => {}
            other => {
                return Err(CodecError::InvalidBranch {
                    field: field.name().to_string(),
                    branch: other,
                })
            }
        }
    }

    let value = match field.ty() {
        FieldType::Bool => Value::Bool(take_byte(field, cursor)? != 0),
        FieldType::Long => Value::Long(read_zigzag(field, cursor)?),
        FieldType::Timestamp => Value::Timestamp(read_zigzag(field, cursor)?),
        FieldType::Double => {
            if cursor.len() < 8 {
                return Err(CodecError::truncated(field.name(), 8 - cursor.len()));
            }
            let (bits, rest) = cursor.split_at(8);
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bits);
            *cursor = rest;
            Value::Double(f64::from_bits(u64::from_le_bytes(raw)))
        }
        FieldType::String => {
            let bytes = take_len_prefixed(field, cursor)?;
            let s = std::str::from_utf8(bytes)
                .map_err(|_| CodecError::InvalidUtf8(field.name().to_string()))?;
            Value::String(s.to_string())
        }
        FieldType::Binary => {
            let bytes = take_len_prefixed(field, cursor)?;
            Value::Binary(bytes::Bytes::copy_from_slice(bytes))
        }
    };

    Ok(value)
}

// =============================================================================
// Wire primitives
// =============================================================================

/// Write an unsigned LEB128 varint
#[inline]
fn write_varint(out: &mut BytesMut, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.put_u8(byte);
            return;
        }
        out.put_u8(byte | 0x80);
    }
}

/// Write a zigzag-mapped signed varint
#[inline]
fn write_zigzag(out: &mut BytesMut, value: i64) {
    write_varint(out, ((value << 1) ^ (value >> 63)) as u64);
}

#[inline]
fn take_byte(field: &Field, cursor: &mut &[u8]) -> Result<u8, CodecError> {
    match cursor.split_first() {
        Some((byte, rest)) => {
            *cursor = rest;
            Ok(*byte)
        }
        None => Err(CodecError::truncated(field.name(), 1)),
    }
}

fn read_varint(field: &Field, cursor: &mut &[u8]) -> Result<u64, CodecError> {
    let mut value = 0u64;
    let mut shift = 0u32;

    // LEB128 for u64 terminates within 10 bytes
    for _ in 0..10 {
        let byte = take_byte(field, cursor)?;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }

    Err(CodecError::VarintOverflow(field.name().to_string()))
}

#[inline]
fn read_zigzag(field: &Field, cursor: &mut &[u8]) -> Result<i64, CodecError> {
    let raw = read_varint(field, cursor)?;
    Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
}

fn take_len_prefixed<'a>(field: &Field, cursor: &mut &'a [u8]) -> Result<&'a [u8], CodecError> {
    let len = read_varint(field, cursor)? as usize;
    if cursor.len() < len {
        return Err(CodecError::truncated(field.name(), len - cursor.len()));
    }
    let (bytes, rest) = cursor.split_at(len);
    *cursor = rest;
    Ok(bytes)
}
