//! Glue field encoders.
//!
//! Encoding never fails: any well-formed in-memory value has exactly one
//! wire form. Length limits are a resource condition, not a protocol one.

use log::trace;

use super::types::{Field, TypeTag, Value};
use crate::protocol::codec::OutBuf;

/// Encode one field: `Null` tag alone when absent, tag plus payload when set.
pub(crate) fn encode_field(field: &Field, output: &mut OutBuf) {
    match field.value() {
        None => {
            trace!("field {}: null", field.def().name);
            output.append_u32(TypeTag::Null.as_u32());
        }
        Some(value) => {
            trace!("field {}: {:?}", field.def().name, value.tag());
            output.append_u32(value.tag().as_u32());
            encode_value(value, output);
        }
    }
}

fn encode_value(value: &Value, output: &mut OutBuf) {
    match value {
        Value::Bool(v) => output.append_u32(*v as u32),
        Value::Int32(v) => output.append_i32(*v),
        Value::Float32(v) => output.append_f32(*v),
        Value::String(v) => {
            output.append_u32(v.len() as u32);
            output.append_str(v);
        }
        Value::Raw(v) => {
            output.append_u32(v.len() as u32);
            output.append_bytes(v);
        }
        Value::ArrayBool(v) => {
            output.append_u32(v.len() as u32);
            for elem in v {
                output.append_u32(*elem as u32);
            }
        }
        Value::ArrayInt32(v) => {
            output.append_u32(v.len() as u32);
            for elem in v {
                output.append_i32(*elem);
            }
        }
        Value::ArrayFloat32(v) => {
            output.append_u32(v.len() as u32);
            for elem in v {
                output.append_f32(*elem);
            }
        }
        Value::ArrayString(v) => {
            output.append_u32(v.len() as u32);
            for elem in v {
                output.append_u32(elem.len() as u32);
                output.append_str(elem);
            }
        }
        Value::ArrayRaw(v) => {
            output.append_u32(v.len() as u32);
            for elem in v {
                output.append_u32(elem.len() as u32);
                output.append_bytes(elem);
            }
        }
    }
}
