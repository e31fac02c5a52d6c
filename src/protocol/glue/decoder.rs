//! Glue field decoders.
//!
//! Dispatch is driven by the leading wire tag of each field. A `Null` tag
//! clears presence for any declared kind; any other tag must equal the kind
//! the schema declares for that position.

use log::trace;

use super::types::{FieldDef, TypeTag, Value};
use crate::common::error::GlueError;
use crate::protocol::codec::InBuf;

/// Decode one field slot. Returns `None` for an absent (null) field.
pub(crate) fn decode_field(
    def: &FieldDef,
    input: &mut InBuf<'_>,
) -> Result<Option<Value>, GlueError> {
    let tag = TypeTag::from_u32(input.read_u32()?)?;

    if tag != TypeTag::Null && tag != def.kind {
        return Err(GlueError::TagMismatch {
            field: def.name,
            declared: def.kind.as_u32(),
            found: tag.as_u32(),
        });
    }

    let value = match tag {
        TypeTag::Null => {
            trace!("field {}: null", def.name);
            return Ok(None);
        }
        TypeTag::Bool => Value::Bool(input.read_u32()? != 0),
        TypeTag::Int32 => Value::Int32(input.read_i32()?),
        TypeTag::Float32 => Value::Float32(input.read_f32()?),
        TypeTag::String => {
            let len = input.read_u32()? as usize;
            Value::String(input.read_str(len)?)
        }
        TypeTag::Raw => {
            let len = input.read_u32()? as usize;
            Value::Raw(input.read_raw(len)?)
        }
        TypeTag::ArrayBool => Value::ArrayBool(decode_packed(input, |p| {
            Ok(p.read_u32()? != 0)
        })?),
        TypeTag::ArrayInt32 => Value::ArrayInt32(decode_packed(input, |p| p.read_i32())?),
        TypeTag::ArrayFloat32 => Value::ArrayFloat32(decode_packed(input, |p| p.read_f32())?),
        TypeTag::ArrayString => Value::ArrayString(decode_elems(input, |p| {
            let len = p.read_u32()? as usize;
            p.read_str(len)
        })?),
        TypeTag::ArrayRaw => Value::ArrayRaw(decode_elems(input, |p| {
            let len = p.read_u32()? as usize;
            p.read_raw(len)
        })?),
    };

    trace!("field {}: {:?}", def.name, tag);
    Ok(Some(value))
}

/// Decode a densely packed array of 4-byte elements.
///
/// The full payload size is checked against the remaining span before any
/// allocation, so a forged count cannot drive an oversized reservation.
fn decode_packed<'a, T, F>(input: &mut InBuf<'a>, mut read: F) -> Result<Vec<T>, GlueError>
where
    F: FnMut(&mut InBuf<'a>) -> Result<T, GlueError>,
{
    let count = input.read_u32()? as usize;
    let needed = count
        .checked_mul(4)
        .ok_or(GlueError::Malformed("length overflow"))?;
    if input.remaining() < needed {
        return Err(GlueError::TruncatedMessage {
            needed,
            remaining: input.remaining(),
        });
    }
    let mut v = Vec::with_capacity(count);
    for _ in 0..count {
        v.push(read(input)?);
    }
    Ok(v)
}

/// Decode an array of length-prefixed elements.
///
/// Each element is at least its own 4-byte length prefix, which bounds the
/// plausible count; the reservation is additionally capped.
fn decode_elems<'a, T, F>(input: &mut InBuf<'a>, mut read: F) -> Result<Vec<T>, GlueError>
where
    F: FnMut(&mut InBuf<'a>) -> Result<T, GlueError>,
{
    let count = input.read_u32()? as usize;
    let needed = count
        .checked_mul(4)
        .ok_or(GlueError::Malformed("length overflow"))?;
    if input.remaining() < needed {
        return Err(GlueError::TruncatedMessage {
            needed,
            remaining: input.remaining(),
        });
    }
    let mut v = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        v.push(read(input)?);
    }
    Ok(v)
}
