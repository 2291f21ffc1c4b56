//! The externally visible inspect URL.
//!
//! Two forms share one fixed template:
//!
//! - **masked**: the template followed by the hex frame from [`crate::frame`];
//!   self-contained and locally decodable.
//! - **unmasked**: the template followed by decimal reference identifiers
//!   joined by single-letter prefixes (`M` market/listing, `S` owner
//!   inventory, `A` asset/offer); resolving one requires the out-of-scope
//!   [`crate::resolve::ResolveReference`] collaborator.
//!
//! The scheme/host/path portion is matched case-insensitively; the payload
//! is case-sensitive. The canonical form emitted here uses the lowercase
//! template and lowercase hex.

use lazy_static::lazy_static;
use regex::Regex;

use crate::codec::encode_item;
use crate::error::{DecodeError, EncodeError};
use crate::frame::{frame_payload, unframe_payload};
use crate::limits::{DecodeLimits, FRAME_OVERHEAD};
use crate::model::EconItem;
use crate::validate::ValidationReport;

/// Fixed template preceding the payload or reference identifiers.
pub const URL_PREFIX: &str =
    "steam://rungame/730/76561202255233023/+csgo_econ_action_preview%20";

lazy_static! {
    static ref UNMASKED_RE: Regex =
        Regex::new(r"^M(\d{1,20})(?:S(\d{1,20}))?(?:A(\d{1,20}))?$").unwrap();
}

/// Reference identifiers carried by an unmasked URL.
///
/// The market/listing id is always present; owner and asset ids are
/// optional. These merely name an item held remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmaskedRef {
    pub market_id: u64,
    pub owner_id: Option<u64>,
    pub asset_id: Option<u64>,
}

/// A parsed inspect URL.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectLink {
    /// Self-contained hex payload, decodable locally.
    Masked { payload: String },
    /// Reference identifiers requiring an external lookup.
    Unmasked(UnmaskedRef),
}

/// Classification of an input URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlClass {
    Masked,
    Unmasked,
    Invalid,
}

// =============================================================================
// BUILDING
// =============================================================================

/// Encodes an item record into a masked inspect URL.
pub fn build_masked_url(item: &EconItem) -> Result<String, EncodeError> {
    let record = encode_item(item)?;
    Ok(format!("{URL_PREFIX}{}", frame_payload(&record)))
}

/// Builds an unmasked inspect URL from reference identifiers.
pub fn build_unmasked_url(reference: &UnmaskedRef) -> String {
    let mut url = format!("{URL_PREFIX}M{}", reference.market_id);
    if let Some(owner) = reference.owner_id {
        url.push('S');
        url.push_str(&owner.to_string());
    }
    if let Some(asset) = reference.asset_id {
        url.push('A');
        url.push_str(&asset.to_string());
    }
    url
}

// =============================================================================
// PARSING
// =============================================================================

/// Extracts the payload/reference portion, matching the template
/// case-insensitively. None if the template does not match.
fn split_template(url: &str) -> Option<&str> {
    // get() rather than split_at: the boundary may fall inside a multibyte
    // character in hostile input, and that must classify as invalid, not panic.
    let head = url.get(..URL_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(URL_PREFIX) {
        return None;
    }
    url.get(URL_PREFIX.len()..)
}

/// Parses a URL into its masked or unmasked form, with default limits.
pub fn parse_url(url: &str) -> Result<InspectLink, DecodeError> {
    parse_url_with_limits(url, &DecodeLimits::default())
}

/// Parses a URL into its masked or unmasked form.
pub fn parse_url_with_limits(
    url: &str,
    limits: &DecodeLimits,
) -> Result<InspectLink, DecodeError> {
    if url.len() > limits.max_url_len {
        return Err(DecodeError::UrlTooLong {
            len: url.len(),
            max: limits.max_url_len,
        });
    }
    let tail = split_template(url).ok_or(DecodeError::InvalidUrl {
        reason: "URL does not match the inspect template",
    })?;

    if let Some(captures) = UNMASKED_RE.captures(tail) {
        // Over-long digit runs overflow u64 and fall through to invalid.
        let parse = |index: usize| {
            captures
                .get(index)
                .map(|m| m.as_str().parse::<u64>())
                .transpose()
        };
        let market_id = parse(1)
            .map_err(|_| DecodeError::InvalidUrl {
                reason: "reference identifier overflows 64 bits",
            })?
            .ok_or(DecodeError::InvalidUrl {
                reason: "missing market identifier",
            })?;
        let owner_id = parse(2).map_err(|_| DecodeError::InvalidUrl {
            reason: "reference identifier overflows 64 bits",
        })?;
        let asset_id = parse(3).map_err(|_| DecodeError::InvalidUrl {
            reason: "reference identifier overflows 64 bits",
        })?;
        return Ok(InspectLink::Unmasked(UnmaskedRef {
            market_id,
            owner_id,
            asset_id,
        }));
    }

    if tail.len() >= FRAME_OVERHEAD * 2 && tail.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok(InspectLink::Masked {
            payload: tail.to_string(),
        });
    }

    Err(DecodeError::InvalidUrl {
        reason: "payload is neither a hex frame nor a reference",
    })
}

/// Classifies a URL as masked, unmasked, or invalid.
pub fn classify_url(url: &str) -> UrlClass {
    match parse_url(url) {
        Ok(InspectLink::Masked { .. }) => UrlClass::Masked,
        Ok(InspectLink::Unmasked(_)) => UrlClass::Unmasked,
        Err(_) => UrlClass::Invalid,
    }
}

/// Decodes a masked URL all the way to an item record, with default limits.
pub fn decode_masked_url(url: &str) -> Result<EconItem, DecodeError> {
    decode_masked_url_with_limits(url, &DecodeLimits::default())
}

/// Decodes a masked URL all the way to an item record.
///
/// Unmasked URLs fail with [`DecodeError::NotMasked`]; resolving them is the
/// collaborator's job.
pub fn decode_masked_url_with_limits(
    url: &str,
    limits: &DecodeLimits,
) -> Result<EconItem, DecodeError> {
    match parse_url_with_limits(url, limits)? {
        InspectLink::Masked { payload } => {
            let record = unframe_payload(&payload, limits)?;
            crate::codec::decode_item_with_limits(&record, limits)
        }
        InspectLink::Unmasked(_) => Err(DecodeError::NotMasked),
    }
}

/// Reformats a valid URL into its canonical form.
///
/// Canonical means the lowercase template with, for masked URLs, the
/// lowercase hex payload. Idempotent: normalizing a canonical URL yields a
/// byte-identical string.
pub fn normalize_url(url: &str) -> Result<String, DecodeError> {
    match parse_url(url)? {
        InspectLink::Masked { payload } => Ok(format!("{URL_PREFIX}{}", payload.to_lowercase())),
        InspectLink::Unmasked(reference) => Ok(build_unmasked_url(&reference)),
    }
}

/// Structurally validates a URL with default limits.
///
/// Distinct from classification: a URL can classify as masked yet still
/// fail validation when its hex payload does not unframe.
pub fn validate_url(url: &str) -> ValidationReport {
    validate_url_with_limits(url, &DecodeLimits::default())
}

/// Structurally validates a URL under the given limits.
///
/// Callers that decode with a non-default policy (strict checksum, raised
/// URL length) can validate under that same policy.
pub fn validate_url_with_limits(url: &str, limits: &DecodeLimits) -> ValidationReport {
    let mut report = ValidationReport::new();

    if url.len() > limits.max_url_len {
        report.error(format!(
            "URL of {} characters exceeds maximum {}",
            url.len(),
            limits.max_url_len
        ));
        return report;
    }

    match parse_url_with_limits(url, limits) {
        Ok(InspectLink::Masked { payload }) => {
            match unframe_payload(&payload, limits) {
                Ok(record) => {
                    if let Err(e) = crate::codec::decode_item_with_limits(&record, limits) {
                        report.error(format!("payload record does not parse: {e}"));
                    }
                }
                Err(e) => report.error(format!("hex payload does not unframe: {e}")),
            }
            if payload.bytes().any(|b| b.is_ascii_uppercase()) {
                report.warn("hex payload is not canonical lowercase");
            }
        }
        Ok(InspectLink::Unmasked(reference)) => {
            if reference.owner_id.is_none() && reference.asset_id.is_none() {
                report.warn("reference carries only a market identifier");
            }
        }
        Err(e) => report.error(format!("{e}")),
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLDEN_URL: &str = "steam://rungame/730/76561202255233023/+csgo_econ_action_preview%20001807202c3d9a99193e40950540ef1819";

    #[test]
    fn test_masked_url_golden() {
        let item = EconItem::new(7, 44, 661, 0.15);
        assert_eq!(build_masked_url(&item).unwrap(), GOLDEN_URL);
    }

    #[test]
    fn test_masked_url_roundtrip() {
        let mut item = EconItem::new(7, 44, 661, 0.15);
        item.customname = Some("fire".to_string());
        let url = build_masked_url(&item).unwrap();
        let decoded = decode_masked_url(&url).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_unmasked_url_roundtrip() {
        let reference = UnmaskedRef {
            market_id: 176321160220,
            owner_id: Some(76561198084749846),
            asset_id: Some(13874827217),
        };
        let url = build_unmasked_url(&reference);
        assert_eq!(parse_url(&url).unwrap(), InspectLink::Unmasked(reference));
        assert_eq!(classify_url(&url), UrlClass::Unmasked);
    }

    #[test]
    fn test_unmasked_market_only() {
        let url = format!("{URL_PREFIX}M42");
        match parse_url(&url).unwrap() {
            InspectLink::Unmasked(r) => {
                assert_eq!(r.market_id, 42);
                assert_eq!(r.owner_id, None);
                assert_eq!(r.asset_id, None);
            }
            other => panic!("expected unmasked, got {other:?}"),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_url(GOLDEN_URL), UrlClass::Masked);
        assert_eq!(classify_url(&format!("{URL_PREFIX}M1S2A3")), UrlClass::Unmasked);
        assert_eq!(classify_url("https://example.com/"), UrlClass::Invalid);
        assert_eq!(classify_url(&format!("{URL_PREFIX}xyz")), UrlClass::Invalid);
        assert_eq!(classify_url(URL_PREFIX), UrlClass::Invalid);
    }

    #[test]
    fn test_template_case_insensitive_payload_case_preserved() {
        let shouted = GOLDEN_URL.replace("steam://rungame", "STEAM://RunGame");
        assert_eq!(classify_url(&shouted), UrlClass::Masked);

        // Payload case is preserved by parsing, canonicalized by normalize.
        let upper_payload = GOLDEN_URL.to_uppercase();
        match parse_url(&upper_payload).unwrap() {
            InspectLink::Masked { payload } => {
                assert_eq!(payload, payload.to_uppercase());
            }
            other => panic!("expected masked, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_is_canonical_and_idempotent() {
        let messy = GOLDEN_URL.to_uppercase();
        let normalized = normalize_url(&messy).unwrap();
        assert_eq!(normalized, GOLDEN_URL);
        assert_eq!(normalize_url(&normalized).unwrap(), normalized);
    }

    #[test]
    fn test_url_too_long() {
        let url = format!("{URL_PREFIX}{}", "00".repeat(1200));
        assert!(matches!(
            parse_url(&url),
            Err(DecodeError::UrlTooLong { .. })
        ));
        assert_eq!(classify_url(&url), UrlClass::Invalid);
    }

    #[test]
    fn test_reference_overflow_is_invalid() {
        // 20 nines overflows u64.
        let url = format!("{URL_PREFIX}M99999999999999999999");
        assert_eq!(classify_url(&url), UrlClass::Invalid);
    }

    #[test]
    fn test_decode_unmasked_needs_resolution() {
        let url = format!("{URL_PREFIX}M1S2A3");
        assert_eq!(decode_masked_url(&url).unwrap_err(), DecodeError::NotMasked);
    }

    #[test]
    fn test_validate_classifies_masked_but_flags_bad_frame() {
        // Classifies as masked (hex shape) yet fails validation: odd
        // truncation keeps it even-length but breaks the record structure.
        let url = format!("{URL_PREFIX}00ff");
        assert_eq!(classify_url(&url), UrlClass::Invalid); // below min frame

        let short_frame = format!("{URL_PREFIX}00ffffffffff");
        assert_eq!(classify_url(&short_frame), UrlClass::Masked);
        let report = validate_url(&short_frame);
        assert!(!report.valid);
    }

    #[test]
    fn test_validate_good_url() {
        let report = validate_url(GOLDEN_URL);
        assert!(report.valid, "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_url_len_limit_is_configurable() {
        use crate::limits::MAX_URL_LEN;

        let mut item = EconItem::new(7, 44, 661, 0.15);
        item.customname = Some("x".repeat(1024));
        let url = build_masked_url(&item).unwrap();
        assert!(url.len() > MAX_URL_LEN);
        assert!(matches!(parse_url(&url), Err(DecodeError::UrlTooLong { .. })));

        let roomy = DecodeLimits {
            max_url_len: 4096,
            ..DecodeLimits::default()
        };
        assert!(matches!(
            parse_url_with_limits(&url, &roomy),
            Ok(InspectLink::Masked { .. })
        ));
        assert_eq!(decode_masked_url_with_limits(&url, &roomy).unwrap(), item);

        let tight = DecodeLimits {
            max_url_len: 32,
            ..DecodeLimits::default()
        };
        assert!(matches!(
            parse_url_with_limits(GOLDEN_URL, &tight),
            Err(DecodeError::UrlTooLong { max: 32, .. })
        ));
    }

    #[test]
    fn test_validate_url_respects_checksum_policy() {
        // Flip the last CRC hex digit. The default policy strips the
        // checksum without comparing; the strict policy must reject.
        let mut corrupted = GOLDEN_URL.to_string();
        corrupted.pop();
        corrupted.push('8');

        assert!(validate_url(&corrupted).valid);

        let report = validate_url_with_limits(&corrupted, &DecodeLimits::strict());
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("checksum")));
    }

    #[test]
    fn test_validate_warns_on_uppercase_payload() {
        let report = validate_url(&GOLDEN_URL.to_uppercase());
        assert!(report.valid);
        assert!(!report.warnings.is_empty());
    }
}
