//! Primitive encoding/decoding for the inspect-link wire format.
//!
//! Implements varints, field tags, fixed-width 32/64-bit fields, and
//! length-delimited runs.

use crate::error::DecodeError;
use crate::limits::{MAX_VARINT_BYTES, MAX_VARINT_BYTES_32};

/// Wire type of a field, encoded in the low three bits of its tag.
///
/// Any value outside this set fails decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Base-128 varint.
    Varint = 0,
    /// 8 bytes, little-endian.
    Fixed64 = 1,
    /// Varint length prefix followed by that many bytes.
    LengthDelimited = 2,
    /// 4 bytes, little-endian.
    Fixed32 = 5,
}

impl WireType {
    /// Converts the low three tag bits to a wire type.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// A single forward-only cursor over a byte slice, with bounds checking on
/// every read. One reader serves exactly one decode call; it is never shared
/// or resumed across calls.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.pos >= self.data.len() {
            return Err(DecodeError::UnexpectedEof {
                context,
                pos: self.pos,
            });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.data.len() - self.pos {
            return Err(DecodeError::UnexpectedEof {
                context,
                pos: self.pos,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an unsigned 64-bit varint (at most 10 bytes).
    #[inline]
    pub fn read_varint(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift = 0u32;

        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte(context)?;
            let value = (byte & 0x7F) as u64;

            // The 10th byte may only carry the single remaining bit.
            if shift == 63 && value > 1 {
                return Err(DecodeError::VarintOverflow {
                    context,
                    pos: start,
                });
            }
            result |= value << shift;

            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;

            if i == MAX_VARINT_BYTES - 1 {
                return Err(DecodeError::VarintTooLong {
                    max_bytes: MAX_VARINT_BYTES,
                    pos: start,
                });
            }
        }

        unreachable!("loop always returns within MAX_VARINT_BYTES iterations")
    }

    /// Reads an unsigned 32-bit varint (at most 5 bytes).
    ///
    /// Encodings longer than 5 bytes or values above `u32::MAX` are
    /// rejected, never silently truncated.
    #[inline]
    pub fn read_varint_u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift = 0u32;

        for i in 0..MAX_VARINT_BYTES_32 {
            let byte = self.read_byte(context)?;
            result |= ((byte & 0x7F) as u64) << shift;

            if byte & 0x80 == 0 {
                return u32::try_from(result).map_err(|_| DecodeError::VarintOverflow {
                    context,
                    pos: start,
                });
            }
            shift += 7;

            if i == MAX_VARINT_BYTES_32 - 1 {
                return Err(DecodeError::VarintTooLong {
                    max_bytes: MAX_VARINT_BYTES_32,
                    pos: start,
                });
            }
        }

        unreachable!("loop always returns within MAX_VARINT_BYTES_32 iterations")
    }

    /// Reads a field tag: `(field_number << 3) | wire_type`.
    ///
    /// Field number 0 and unknown wire types fail decode.
    pub fn read_tag(&mut self) -> Result<(u32, WireType), DecodeError> {
        let start = self.pos;
        let tag = self.read_varint_u32("tag")?;
        let field = tag >> 3;
        if field == 0 {
            return Err(DecodeError::InvalidFieldNumber { pos: start });
        }
        let wire = WireType::from_u8((tag & 0x07) as u8).ok_or(DecodeError::InvalidWireType {
            wire_type: (tag & 0x07) as u8,
            field,
            pos: start,
        })?;
        Ok((field, wire))
    }

    /// Reads a little-endian fixed 32-bit value.
    #[inline]
    pub fn read_fixed32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4, context)?;
        // SAFETY: read_bytes guarantees exactly 4 bytes, try_into always succeeds
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a little-endian fixed 64-bit value.
    #[inline]
    pub fn read_fixed64(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        let bytes = self.read_bytes(8, context)?;
        // SAFETY: read_bytes guarantees exactly 8 bytes, try_into always succeeds
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a 32-bit float as its raw little-endian bit pattern.
    ///
    /// No value transformation and no NaN filtering: the codec must
    /// round-trip every bit pattern, including ones the validation layer
    /// would flag.
    #[inline]
    pub fn read_f32(&mut self, context: &'static str) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_fixed32(context)?))
    }

    /// Reads a length-prefixed byte run, bounded by `max_len` and by the
    /// remaining buffer.
    #[inline]
    pub fn read_len_delimited(
        &mut self,
        max_len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint("length")? as usize;
        if len > max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len,
                max: max_len,
            });
        }
        self.read_bytes(len, field)
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// Invalid UTF-8 fails decode rather than substituting or truncating.
    pub fn read_string(&mut self, max_len: usize, field: &'static str) -> Result<String, DecodeError> {
        let bytes = self.read_len_delimited(max_len, field)?;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Skips one field's value using the wire-type-appropriate rule.
    ///
    /// Unknown field numbers are skipped, not rejected, to stay forward
    /// compatible with schema additions.
    pub fn skip_field(&mut self, wire: WireType) -> Result<(), DecodeError> {
        match wire {
            WireType::Varint => {
                self.read_varint("skipped varint")?;
            }
            WireType::Fixed64 => {
                self.read_bytes(8, "skipped fixed64")?;
            }
            WireType::LengthDelimited => {
                let len = self.read_varint("skipped length")? as usize;
                if len > self.remaining_len() {
                    return Err(DecodeError::UnexpectedEof {
                        context: "skipped bytes",
                        pos: self.pos,
                    });
                }
                self.read_bytes(len, "skipped bytes")?;
            }
            WireType::Fixed32 => {
                self.read_bytes(4, "skipped fixed32")?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned varint (LEB128).
    #[inline]
    pub fn write_varint(&mut self, mut value: u64) {
        // Stack buffer batches the writes (faster than repeated push calls).
        let mut buf = [0u8; MAX_VARINT_BYTES];
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if value == 0 {
                break;
            }
        }
        self.buf.extend_from_slice(&buf[..len]);
    }

    /// Writes a field tag.
    #[inline]
    pub fn write_tag(&mut self, field: u32, wire: WireType) {
        self.write_varint((u64::from(field) << 3) | wire as u64);
    }

    /// Writes a little-endian fixed 32-bit value.
    #[inline]
    pub fn write_fixed32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a 32-bit float as its raw little-endian bit pattern.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.write_fixed32(value.to_bits());
    }

    /// Writes a length-prefixed byte run.
    pub fn write_len_delimited(&mut self, bytes: &[u8]) {
        self.write_varint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, s: &str) {
        self.write_len_delimited(s.as_bytes());
    }
}
