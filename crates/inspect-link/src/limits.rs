//! Security limits and wire constants for decoding.
//!
//! The decoder operates on attacker-controlled text extracted from URLs.
//! Every allocation and every loop is bounded by one of these limits.

/// Type-marker byte prefixed to every masked (self-contained) payload.
pub const MASKED_MARKER: u8 = 0x00;

/// Size of the frame around the serialized record: marker (1) + CRC32 (4).
pub const FRAME_OVERHEAD: usize = 5;

/// Maximum size of a decoded payload buffer (10 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Maximum decoded length of a length-delimited field (string or nested message).
pub const MAX_TEXT_LEN: usize = 1024;

/// Maximum number of fields processed per decode call, nested fields included.
///
/// Defends against payloads stuffed with trivially-encoded repeated fields.
pub const MAX_FIELDS_PER_DECODE: usize = 100;

/// Maximum accepted URL length in characters.
pub const MAX_URL_LEN: usize = 2048;

/// Maximum custom name length enforced by the validation layer.
///
/// The wire codec itself only bounds strings by [`MAX_TEXT_LEN`]; this
/// tighter limit is a domain rule, not a codec rule.
pub const MAX_CUSTOM_NAME_LEN: usize = 100;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum encoded length of a 32-bit varint.
pub const MAX_VARINT_BYTES_32: usize = 5;

/// Legal domain of `paintseed` (inclusive).
pub const MAX_PAINT_SEED: u32 = 1000;

/// Configurable limits for a single decode call.
///
/// The defaults mirror the constants in this module. Callers that feed the
/// decoder from a trusted source may raise them; callers exposed to the open
/// internet should keep them as-is.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    /// Maximum decoded payload buffer size in bytes.
    pub max_payload_size: usize,
    /// Maximum decoded length-delimited field length in bytes.
    pub max_text_len: usize,
    /// Maximum fields processed per decode call.
    pub max_fields: usize,
    /// Maximum accepted URL length in characters.
    pub max_url_len: usize,
    /// Whether to recompute and verify the trailing CRC32 when unframing.
    ///
    /// Disabled by default: the consuming ecosystem computes and strips the
    /// checksum without a visible verification branch, so strict verification
    /// would reject payloads it accepts. Enable for strict ingestion paths.
    pub verify_checksum: bool,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            max_text_len: MAX_TEXT_LEN,
            max_fields: MAX_FIELDS_PER_DECODE,
            max_url_len: MAX_URL_LEN,
            verify_checksum: false,
        }
    }
}

impl DecodeLimits {
    /// Creates the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns limits with checksum verification enabled.
    pub fn strict() -> Self {
        Self {
            verify_checksum: true,
            ..Self::default()
        }
    }
}
