//! Message schema and typed message values.
//!
//! A [`Schema`] is the closed contract for one message type: an 8-byte
//! prototype id plus an ordered field list. A [`Message`] is one transient
//! instance of a schema, built per call, serialized once, consumed once.

use log::debug;

use super::decoder::decode_field;
use super::encoder::encode_field;
use super::types::{Field, FieldDef, Value};
use super::{MAGIC, PROTO_ID_LEN, VERSION};
use crate::common::error::GlueError;
use crate::protocol::codec::{InBuf, OutBuf};

/// Ordered field list bound to a prototype id.
///
/// Schemas are declared as statics (see [`super::messages`]); field order is
/// fixed at definition time and is the only correlation between wire
/// position and field identity. Both ends of a channel must compile in
/// identical definitions for a given id.
#[derive(Debug)]
pub struct Schema {
    proto_id: &'static [u8; PROTO_ID_LEN],
    fields: &'static [FieldDef],
}

impl Schema {
    /// The `[u8; 8]` parameter type is the construction-time length check;
    /// ids are authored as ASCII literals and written verbatim.
    pub const fn new(
        proto_id: &'static [u8; PROTO_ID_LEN],
        fields: &'static [FieldDef],
    ) -> Schema {
        Schema { proto_id, fields }
    }

    pub fn proto_id(&self) -> &[u8; PROTO_ID_LEN] {
        self.proto_id
    }

    /// Prototype id as text, for logs and error messages.
    pub fn proto_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.proto_id)
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|def| def.name == name)
    }
}

/// One in-memory message: a schema reference plus one value slot per field.
///
/// All fields start absent; setters flip presence. Fields are addressed by
/// name, which exists only in the compiled-in schema, never on the wire.
#[derive(Debug, Clone)]
pub struct Message {
    schema: &'static Schema,
    fields: Vec<Field>,
}

impl Message {
    pub fn new(schema: &'static Schema) -> Message {
        Message {
            schema,
            fields: schema.fields().iter().map(|def| Field::absent(*def)).collect(),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn index_of(&self, name: &str) -> usize {
        match self.schema.field_index(name) {
            Some(i) => i,
            None => panic!(
                "no field '{}' in schema '{}'",
                name,
                self.schema.proto_str()
            ),
        }
    }

    /// Set a field's value.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a field of the schema or if the value's tag
    /// differs from the declared kind. Both are programmer errors; wire
    /// conditions never reach this path.
    pub fn set(&mut self, name: &str, value: Value) {
        let i = self.index_of(name);
        let declared = self.fields[i].def().kind;
        if value.tag() != declared {
            panic!(
                "field '{}' of schema '{}' is declared {:?}, not {:?}",
                name,
                self.schema.proto_str(),
                declared,
                value.tag()
            );
        }
        self.fields[i].set(Some(value));
    }

    /// Clear a field back to absent. Panics on unknown name.
    pub fn unset(&mut self, name: &str) {
        let i = self.index_of(name);
        self.fields[i].set(None);
    }

    /// Current value of a field, `None` when absent. Panics on unknown name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let i = self.index_of(name);
        self.fields[i].value()
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set(name, Value::Bool(value));
    }

    pub fn set_i32(&mut self, name: &str, value: i32) {
        self.set(name, Value::Int32(value));
    }

    pub fn set_f32(&mut self, name: &str, value: f32) {
        self.set(name, Value::Float32(value));
    }

    pub fn set_str(&mut self, name: &str, value: impl Into<String>) {
        self.set(name, Value::String(value.into()));
    }

    pub fn set_raw(&mut self, name: &str, value: Vec<u8>) {
        self.set(name, Value::Raw(value));
    }

    pub fn set_bool_arr(&mut self, name: &str, value: Vec<bool>) {
        self.set(name, Value::ArrayBool(value));
    }

    pub fn set_i32_arr(&mut self, name: &str, value: Vec<i32>) {
        self.set(name, Value::ArrayInt32(value));
    }

    pub fn set_f32_arr(&mut self, name: &str, value: Vec<f32>) {
        self.set(name, Value::ArrayFloat32(value));
    }

    pub fn set_str_arr(&mut self, name: &str, value: Vec<String>) {
        self.set(name, Value::ArrayString(value));
    }

    pub fn set_raw_arr(&mut self, name: &str, value: Vec<Vec<u8>>) {
        self.set(name, Value::ArrayRaw(value));
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        match self.get(name) {
            Some(Value::Int32(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.get(name) {
            Some(Value::Float32(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::String(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_raw(&self, name: &str) -> Option<&[u8]> {
        match self.get(name) {
            Some(Value::Raw(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_bool_arr(&self, name: &str) -> Option<&[bool]> {
        match self.get(name) {
            Some(Value::ArrayBool(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_i32_arr(&self, name: &str) -> Option<&[i32]> {
        match self.get(name) {
            Some(Value::ArrayInt32(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_f32_arr(&self, name: &str) -> Option<&[f32]> {
        match self.get(name) {
            Some(Value::ArrayFloat32(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_str_arr(&self, name: &str) -> Option<&[String]> {
        match self.get(name) {
            Some(Value::ArrayString(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_raw_arr(&self, name: &str) -> Option<&[Vec<u8>]> {
        match self.get(name) {
            Some(Value::ArrayRaw(v)) => Some(v),
            _ => None,
        }
    }

    /// Serialize into the caller's output buffer.
    ///
    /// Clears the buffer first, then writes magic, version, the 8-byte
    /// prototype id verbatim, and every field in declared order. Absent
    /// fields serialize as the bare `Null` tag irrespective of kind.
    pub fn serialize(&self, output: &mut OutBuf) {
        debug!("serializing message {}", self.schema.proto_str());
        output.clear();
        output.append_u32(MAGIC);
        output.append_u32(VERSION);
        output.append_bytes(self.schema.proto_id());
        for field in &self.fields {
            encode_field(field, output);
        }
    }

    /// Deserialize one message of the expected schema from a read cursor.
    ///
    /// Header gates run in order: magic, version, prototype id. Each is a
    /// hard failure carrying the offending values; there is no negotiation
    /// and no partial decode. Fields are then read in declared order, each
    /// deciding null vs. typed payload from its own leading tag.
    pub fn deserialize(schema: &'static Schema, input: &mut InBuf<'_>) -> Result<Message, GlueError> {
        let magic = input.read_u32()?;
        if magic != MAGIC {
            return Err(GlueError::BadMagic { found: magic });
        }

        let version = input.read_u32()?;
        if version != VERSION {
            return Err(GlueError::VersionMismatch {
                expected: VERSION,
                found: version,
            });
        }

        let found: [u8; PROTO_ID_LEN] = input.read_bytes(PROTO_ID_LEN)?.try_into().unwrap();
        if &found != schema.proto_id() {
            return Err(GlueError::PrototypeMismatch {
                expected: *schema.proto_id(),
                found,
            });
        }

        debug!("deserializing message {}", schema.proto_str());
        let mut fields = Vec::with_capacity(schema.fields().len());
        for def in schema.fields() {
            let value = decode_field(def, input)?;
            fields.push(Field::with_value(*def, value));
        }

        Ok(Message { schema, fields })
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Message) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.fields == other.fields
    }
}
