//! Unified error types for the veles codebase.

use std::fmt;

/// Error type for glue message decoding.
///
/// Every variant is fatal for the message being decoded; there is no partial
/// or best-effort decode. Encoding has no failure path.
#[derive(Debug, Clone, PartialEq)]
pub enum GlueError {
    /// First header word is not the protocol magic
    BadMagic { found: u32 },
    /// Protocol revision disagreement between peers
    VersionMismatch { expected: u32, found: u32 },
    /// Message decoded against the wrong schema
    PrototypeMismatch { expected: [u8; 8], found: [u8; 8] },
    /// Buffer ends before a field's payload does
    TruncatedMessage { needed: usize, remaining: usize },
    /// Tag value outside the closed enumeration
    UnsupportedTag { found: u32 },
    /// Wire tag disagrees with the kind the schema declares for the position
    TagMismatch {
        field: &'static str,
        declared: u32,
        found: u32,
    },
    /// Payload content is invalid for its kind
    Malformed(&'static str),
}

impl fmt::Display for GlueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlueError::BadMagic { found } => {
                write!(f, "bad magic number 0x{:08x}", found)
            }
            GlueError::VersionMismatch { expected, found } => {
                write!(f, "version mismatch: expected {}, got {}", expected, found)
            }
            GlueError::PrototypeMismatch { expected, found } => {
                write!(
                    f,
                    "prototype id mismatch: expected {:?}, got {:?}",
                    String::from_utf8_lossy(expected),
                    String::from_utf8_lossy(found)
                )
            }
            GlueError::TruncatedMessage { needed, remaining } => {
                write!(
                    f,
                    "truncated message: needed {} bytes, {} remaining",
                    needed, remaining
                )
            }
            GlueError::UnsupportedTag { found } => {
                write!(f, "unsupported type tag {}", found)
            }
            GlueError::TagMismatch {
                field,
                declared,
                found,
            } => {
                write!(
                    f,
                    "tag mismatch on field '{}': declared {}, got {}",
                    field, declared, found
                )
            }
            GlueError::Malformed(msg) => write!(f, "malformed data: {}", msg),
        }
    }
}

impl std::error::Error for GlueError {}
