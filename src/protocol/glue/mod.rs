//! Schema-driven glue message format.
//!
//! A glue message is a fixed, ordered list of tagged fields behind a small
//! header. Field identity is positional: both ends compile in the same
//! schema and the wire carries only tags and payloads, never names. The
//! concrete schemas live in [`messages`].

mod decoder;
mod encoder;
mod schema;
mod types;

pub mod messages;

pub use schema::{Message, Schema};
pub use types::{Field, FieldDef, TypeTag, Value};

/// Protocol family constant, spells "GLUE" once little-endian encoded.
pub const MAGIC: u32 = 0x4555_4c47;

/// Protocol revision. Bumped whenever any schema changes; decode is a hard
/// gate with no compatibility window.
pub const VERSION: u32 = 1;

/// Prototype ids are exactly this many ASCII bytes, never length-prefixed.
pub const PROTO_ID_LEN: usize = 8;
