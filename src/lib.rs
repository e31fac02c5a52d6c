#![deny(clippy::all)]
#![warn(unused_crate_dependencies)]

//! Binary glue-message codec for a wasm linear-memory boundary.
//!
//! The host and the compute engine exchange one serialized message per call
//! across a pointer-and-length interface. Each message is a fixed, ordered
//! list of tagged fields bound to an 8-byte prototype id; both sides compile
//! in identical schema definitions and the wire carries no field names.

pub mod common;
pub mod protocol;

pub use common::error::GlueError;
pub use protocol::codec::{InBuf, OutBuf};
pub use protocol::glue::{messages, Field, FieldDef, Message, Schema, TypeTag, Value};
