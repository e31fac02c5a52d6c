//! Protocol implementation for veles.
//!
//! This module contains all wire-format code:
//! - `codec` - Low-level binary serialization primitives
//! - `glue` - Schema-driven glue message format

pub mod codec;
pub mod glue;

// Re-export commonly used items
pub use codec::{InBuf, OutBuf};
pub use glue::{messages, Field, FieldDef, Message, Schema, TypeTag, Value};
