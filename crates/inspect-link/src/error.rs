//! Error types for inspect-link encoding and decoding.

use thiserror::Error;

/// Coarse classification of decode-side failures.
///
/// Lets callers map the detailed [`DecodeError`] variants onto the three
/// failure families they typically branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input text itself was malformed (bad hex, bad UTF-8, bad URL).
    InvalidInput,
    /// The input exceeded a configured size limit.
    BufferOverflow,
    /// The payload bytes were structurally invalid.
    Decoding,
}

/// Error during payload or URL decoding.
///
/// Every variant carries enough context (byte position, field name, offending
/// value) to diagnose the failure without re-running the decode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input while reading {context} at byte {pos}")]
    UnexpectedEof { context: &'static str, pos: usize },

    #[error("varint exceeds maximum length ({max_bytes} bytes) at byte {pos}")]
    VarintTooLong { max_bytes: usize, pos: usize },

    #[error("varint for {context} overflows its integer type at byte {pos}")]
    VarintOverflow { context: &'static str, pos: usize },

    #[error("invalid wire type {wire_type} for field {field} at byte {pos}")]
    InvalidWireType { wire_type: u8, field: u32, pos: usize },

    #[error("field {field} has wire type {found}, expected {expected}")]
    WireTypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: u8,
    },

    #[error("field number 0 is reserved (byte {pos})")]
    InvalidFieldNumber { pos: usize },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("decode exceeded the field budget of {max} fields")]
    FieldBudgetExceeded { max: usize },

    #[error("input of {len} bytes exceeds maximum buffer size {max}")]
    BufferOverflow { len: usize, max: usize },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("hex text has odd length {len}")]
    OddHexLength { len: usize },

    #[error("invalid hex digit {byte:#04x} at offset {pos}")]
    InvalidHexDigit { byte: u8, pos: usize },

    #[error("frame of {len} bytes is shorter than marker + checksum")]
    FrameTooShort { len: usize },

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("URL of {len} characters exceeds maximum {max}")]
    UrlTooLong { len: usize, max: usize },

    #[error("invalid inspect URL: {reason}")]
    InvalidUrl { reason: &'static str },

    #[error("URL is an unmasked reference and carries no local payload")]
    NotMasked,
}

impl DecodeError {
    /// Returns the coarse classification for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InvalidUtf8 { .. }
            | DecodeError::OddHexLength { .. }
            | DecodeError::InvalidHexDigit { .. }
            | DecodeError::FrameTooShort { .. }
            | DecodeError::UrlTooLong { .. }
            | DecodeError::InvalidUrl { .. }
            | DecodeError::NotMasked => ErrorKind::InvalidInput,
            DecodeError::BufferOverflow { .. } => ErrorKind::BufferOverflow,
            _ => ErrorKind::Decoding,
        }
    }
}

/// Error during record encoding.
///
/// The writer accepts any structurally valid record, including out-of-domain
/// numeric values; these variants cover the cases that cannot be serialized
/// at all and must fail loudly rather than substitute a default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("unrecognized rarity name: {name:?}")]
    UnknownRarity { name: String },
}
