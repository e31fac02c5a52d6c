//! Low-level binary serialization primitives.
//!
//! All numeric primitives are fixed-width 4-byte little-endian. The write
//! side appends into a growable buffer; the read side walks a borrowed span
//! and refuses to read past its end.

use crate::common::error::GlueError;
use bytes::{BufMut, BytesMut};

/// Initial reservation for a fresh or cleared output buffer.
const OUTBUF_RESERVE: usize = 1024;

/// Growable write cursor.
///
/// One instance is meant to be recycled across calls: `clear()` resets the
/// length but keeps the allocation. Two in-flight serializations on the same
/// buffer are not supported; callers treat encode-submit-decode as one unit.
#[derive(Debug, Default)]
pub struct OutBuf {
    data: BytesMut,
}

impl OutBuf {
    pub fn new() -> Self {
        OutBuf {
            data: BytesMut::with_capacity(OUTBUF_RESERVE),
        }
    }

    /// Append raw bytes verbatim.
    pub fn append_bytes(&mut self, val: &[u8]) {
        self.data.extend_from_slice(val);
    }

    /// Append string content (no length prefix).
    pub fn append_str(&mut self, val: &str) {
        self.data.extend_from_slice(val.as_bytes());
    }

    pub fn append_u32(&mut self, val: u32) {
        self.data.put_u32_le(val);
    }

    pub fn append_i32(&mut self, val: i32) {
        self.data.put_i32_le(val);
    }

    pub fn append_f32(&mut self, val: f32) {
        self.data.put_f32_le(val);
    }

    /// Reset length to zero, keeping identity and capacity for reuse.
    pub fn clear(&mut self) {
        self.data.clear();
        self.data.reserve(OUTBUF_RESERVE);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Bounds-aware read cursor over a borrowed byte span.
///
/// Every read checks the remaining length first and fails with
/// `TruncatedMessage` instead of walking past the end of the span.
#[derive(Debug)]
pub struct InBuf<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> InBuf<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        InBuf { data, pos: 0 }
    }

    /// Consume exactly `n` bytes and return them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], GlueError> {
        let remaining = self.data.len() - self.pos;
        if remaining < n {
            return Err(GlueError::TruncatedMessage {
                needed: n,
                remaining,
            });
        }
        let s = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    pub fn read_u32(&mut self) -> Result<u32, GlueError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_i32(&mut self) -> Result<i32, GlueError> {
        let b = self.read_bytes(4)?;
        Ok(i32::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_f32(&mut self) -> Result<f32, GlueError> {
        let b = self.read_bytes(4)?;
        Ok(f32::from_le_bytes(b.try_into().unwrap()))
    }

    /// Consume `len` bytes of UTF-8 string content.
    pub fn read_str(&mut self, len: usize) -> Result<String, GlueError> {
        let b = self.read_bytes(len)?;
        let s = std::str::from_utf8(b).map_err(|_| GlueError::Malformed("utf8"))?;
        Ok(s.to_string())
    }

    /// Consume `len` bytes into an owned buffer.
    pub fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, GlueError> {
        let b = self.read_bytes(len)?;
        Ok(b.to_vec())
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_symmetry() {
        let mut out = OutBuf::new();
        out.append_u32(0xdead_beef);
        out.append_i32(-7);
        out.append_f32(1.5);
        out.append_bytes(b"xyz");

        let mut inp = InBuf::new(out.as_slice());
        assert_eq!(inp.read_u32().unwrap(), 0xdead_beef);
        assert_eq!(inp.read_i32().unwrap(), -7);
        assert_eq!(inp.read_f32().unwrap(), 1.5);
        assert_eq!(inp.read_raw(3).unwrap(), b"xyz");
        assert_eq!(inp.remaining(), 0);
    }

    #[test]
    fn test_fixed_width_layout() {
        let mut out = OutBuf::new();
        out.append_u32(1);
        assert_eq!(out.as_slice(), &[0x01, 0x00, 0x00, 0x00]);
        out.append_i32(-1);
        assert_eq!(out.len(), 8);
        assert_eq!(&out.as_slice()[4..], &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_clear_resets_length_only() {
        let mut out = OutBuf::new();
        out.append_bytes(&[0u8; 64]);
        out.clear();
        assert!(out.is_empty());
        out.append_u32(9);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_read_past_end() {
        let mut inp = InBuf::new(&[1, 2, 3]);
        let err = inp.read_u32().unwrap_err();
        assert_eq!(
            err,
            GlueError::TruncatedMessage {
                needed: 4,
                remaining: 3
            }
        );
        // cursor did not advance on failure
        assert_eq!(inp.position(), 0);
        assert_eq!(inp.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert!(inp.read_bytes(1).is_err());
    }

    #[test]
    fn test_read_str_rejects_bad_utf8() {
        let mut inp = InBuf::new(&[0xff, 0xfe]);
        assert_eq!(
            inp.read_str(2).unwrap_err(),
            GlueError::Malformed("utf8")
        );
    }
}
