//! Checksum and hex framing around serialized records.
//!
//! Wire layout: `[type_marker:1][serialized_record:N][crc32:4 LE]`, the whole
//! sequence hex-encoded to lowercase ASCII. The CRC is IEEE 802.3 (table
//! driven; `crc32fast` builds its lookup tables once and reuses them) and
//! covers the marker plus the record bytes.
//!
//! Checksum verification on decode is a configuration choice
//! ([`DecodeLimits::verify_checksum`]) and is off by default: the consuming
//! ecosystem computes and strips the checksum without verifying it, so a
//! strict default would reject payloads it accepts.

use crate::error::DecodeError;
use crate::limits::{DecodeLimits, FRAME_OVERHEAD, MASKED_MARKER};

/// Wraps a serialized record into the hex frame embedded in masked URLs.
pub fn frame_payload(record: &[u8]) -> String {
    let mut framed = Vec::with_capacity(record.len() + FRAME_OVERHEAD);
    framed.push(MASKED_MARKER);
    framed.extend_from_slice(record);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&framed);
    let crc = hasher.finalize();
    framed.extend_from_slice(&crc.to_le_bytes());

    hex_encode(&framed)
}

/// Unwraps a hex frame back to the serialized record bytes.
///
/// Fails on odd-length or non-hex text, on frames shorter than marker +
/// checksum, and on inputs over `limits.max_payload_size`. The leading type
/// marker is stripped when present; the trailing checksum is always
/// stripped and only compared when `limits.verify_checksum` is set.
pub fn unframe_payload(hex_text: &str, limits: &DecodeLimits) -> Result<Vec<u8>, DecodeError> {
    if hex_text.len() > limits.max_payload_size * 2 {
        return Err(DecodeError::BufferOverflow {
            len: hex_text.len() / 2,
            max: limits.max_payload_size,
        });
    }

    let bytes = hex_decode(hex_text)?;
    if bytes.len() < FRAME_OVERHEAD {
        return Err(DecodeError::FrameTooShort { len: bytes.len() });
    }

    let (body, crc_bytes) = bytes.split_at(bytes.len() - 4);
    if limits.verify_checksum {
        // SAFETY: split_at guarantees exactly 4 bytes, try_into always succeeds
        let stored = u32::from_le_bytes(crc_bytes.try_into().unwrap());
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(body);
        let computed = hasher.finalize();
        if stored != computed {
            return Err(DecodeError::ChecksumMismatch { stored, computed });
        }
    }

    let record = match body.first() {
        Some(&MASKED_MARKER) => &body[1..],
        _ => body,
    };
    Ok(record.to_vec())
}

// =============================================================================
// HEX
// =============================================================================

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encodes bytes as lowercase hex text.
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
    }
    out
}

/// Decodes hex text, accepting both cases.
///
/// The text must consist solely of hex digits and have even length; the
/// errors carry the offending byte and offset.
pub fn hex_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = text.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddHexLength { len: bytes.len() });
    }

    let mut out = Vec::with_capacity(bytes.len() / 2);
    for (i, pair) in bytes.chunks_exact(2).enumerate() {
        let hi = hex_digit(pair[0]).ok_or(DecodeError::InvalidHexDigit {
            byte: pair[0],
            pos: i * 2,
        })?;
        let lo = hex_digit(pair[1]).ok_or(DecodeError::InvalidHexDigit {
            byte: pair[1],
            pos: i * 2 + 1,
        })?;
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Record bytes for {defindex:7, paintindex:44, paintseed:661, paintwear:0.15}.
    const GOLDEN_RECORD: [u8; 12] = [
        0x18, 0x07, 0x20, 0x2c, 0x3d, 0x9a, 0x99, 0x19, 0x3e, 0x40, 0x95, 0x05,
    ];
    const GOLDEN_FRAME: &str = "001807202c3d9a99193e40950540ef1819";

    #[test]
    fn test_golden_frame() {
        assert_eq!(frame_payload(&GOLDEN_RECORD), GOLDEN_FRAME);
    }

    #[test]
    fn test_unframe_golden() {
        let record = unframe_payload(GOLDEN_FRAME, &DecodeLimits::default()).unwrap();
        assert_eq!(record, GOLDEN_RECORD);
    }

    #[test]
    fn test_unframe_without_marker() {
        // Marker is stripped when present, tolerated when absent.
        let without_marker = &GOLDEN_FRAME[2..];
        let record = unframe_payload(without_marker, &DecodeLimits::default()).unwrap();
        assert_eq!(record, GOLDEN_RECORD);
    }

    #[test]
    fn test_frame_roundtrip_empty_record() {
        let hex = frame_payload(&[]);
        assert_eq!(hex.len(), FRAME_OVERHEAD * 2);
        let record = unframe_payload(&hex, &DecodeLimits::strict()).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_checksum_not_verified_by_default() {
        // Default policy: the checksum is parsed and stripped, not verified.
        let mut corrupted = GOLDEN_FRAME.to_string();
        corrupted.replace_range(GOLDEN_FRAME.len() - 2.., "00");
        let record = unframe_payload(&corrupted, &DecodeLimits::default()).unwrap();
        assert_eq!(record, GOLDEN_RECORD);
    }

    #[test]
    fn test_checksum_verified_when_enabled() {
        let mut corrupted = GOLDEN_FRAME.to_string();
        corrupted.replace_range(GOLDEN_FRAME.len() - 2.., "00");
        assert!(matches!(
            unframe_payload(&corrupted, &DecodeLimits::strict()),
            Err(DecodeError::ChecksumMismatch { .. })
        ));
        // The intact frame passes strict verification.
        assert!(unframe_payload(GOLDEN_FRAME, &DecodeLimits::strict()).is_ok());
    }

    #[test]
    fn test_single_byte_mutations_change_checksum() {
        // Flip one byte anywhere in the checksum-covered region; the
        // recomputed CRC must differ from the stored one.
        for i in 0..GOLDEN_FRAME.len() - 8 {
            let mut mutated: Vec<u8> = GOLDEN_FRAME.bytes().collect();
            mutated[i] = if mutated[i] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(mutated).unwrap();
            assert!(
                matches!(
                    unframe_payload(&mutated, &DecodeLimits::strict()),
                    Err(DecodeError::ChecksumMismatch { .. })
                ),
                "mutation at {} slipped past the checksum",
                i
            );
        }
    }

    #[test]
    fn test_odd_length_rejected() {
        let err = unframe_payload("001807f", &DecodeLimits::default()).unwrap_err();
        assert_eq!(err, DecodeError::OddHexLength { len: 7 });
    }

    #[test]
    fn test_non_hex_rejected() {
        let err = unframe_payload("0018zz202c3d9a99193e40950540ef1819", &DecodeLimits::default())
            .unwrap_err();
        assert_eq!(err, DecodeError::InvalidHexDigit { byte: b'z', pos: 4 });
    }

    #[test]
    fn test_short_frame_rejected() {
        assert_eq!(
            unframe_payload("00112233", &DecodeLimits::default()).unwrap_err(),
            DecodeError::FrameTooShort { len: 4 }
        );
    }

    #[test]
    fn test_oversized_input_rejected() {
        let limits = DecodeLimits {
            max_payload_size: 8,
            ..DecodeLimits::default()
        };
        let err = unframe_payload(&"00".repeat(9), &limits).unwrap_err();
        assert!(matches!(err, DecodeError::BufferOverflow { max: 8, .. }));
    }

    #[test]
    fn test_hex_decode_accepts_uppercase() {
        assert_eq!(hex_decode("00FFab").unwrap(), [0x00, 0xFF, 0xAB]);
    }

    #[test]
    fn test_hex_encode_is_lowercase() {
        assert_eq!(hex_encode(&[0xAB, 0xCD, 0x01]), "abcd01");
    }

    #[test]
    fn test_crc_check_value() {
        // Standard IEEE 802.3 check value for "123456789".
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(b"123456789");
        assert_eq!(hasher.finalize(), 0xcbf4_3926);
    }
}
