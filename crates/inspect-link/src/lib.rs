//! Encoder/decoder for game item inspect URLs.
//!
//! An inspect URL carries a compact binary description of an item's economic
//! and visual attributes — weapon skin, wear, pattern seed, stickers — either
//! embedded directly as a hex payload (*masked*) or as decimal identifiers
//! referencing an item held remotely (*unmasked*).
//!
//! # Quick Start
//!
//! ```rust
//! use inspect_link::{EconItem, Decoration};
//! use inspect_link::url::{build_masked_url, decode_masked_url};
//!
//! let mut item = EconItem::new(7, 44, 661, 0.1523);
//! item.stickers.push(Decoration::new(0, 5032));
//!
//! let url = build_masked_url(&item).unwrap();
//! let decoded = decode_masked_url(&url).unwrap();
//! assert_eq!(decoded, item);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types ([`EconItem`], [`Decoration`])
//! - [`codec`]: The protobuf-subset wire codec (varints, tags, nested messages)
//! - [`frame`]: Type marker + CRC32 + lowercase hex framing
//! - [`url`]: Building, parsing, classifying, and normalizing inspect URLs
//! - [`validate`]: Advisory domain validation (collected errors + warnings)
//! - [`resolve`]: The interface boundary for the out-of-scope remote lookup
//! - [`error`]: Error types
//! - [`limits`]: Security limits for decoding
//!
//! # Security
//!
//! The decoder treats its input as attacker-controlled text extracted from a
//! URL:
//! - All allocations are bounded by configurable limits
//! - Varints are length-limited per integer width, never silently truncated
//! - The total field count per decode is budgeted
//! - Unknown field numbers are skipped (forward compatibility), everything
//!   else malformed is rejected with a descriptive error
//!
//! # Wire Format
//!
//! `[type_marker:1][serialized_record:N][crc32:4 LE]`, hex-encoded lowercase.
//! The record is a stream of protobuf-style tagged fields whose field-number
//! assignment is a compatibility contract with the consuming game client,
//! pinned by golden-byte tests.
//!
//! The codec is synchronous and side-effect-free per call; concurrent calls
//! from independent call sites need no locking.

pub mod codec;
pub mod error;
pub mod frame;
pub mod limits;
pub mod model;
pub mod resolve;
pub mod url;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{decode_item, decode_item_with_limits, encode_item};
pub use error::{DecodeError, EncodeError, ErrorKind};
pub use limits::DecodeLimits;
pub use model::{rarity_from_name, Decoration, EconItem};
pub use resolve::ResolveReference;
pub use url::{
    build_masked_url, build_unmasked_url, classify_url, decode_masked_url,
    decode_masked_url_with_limits, normalize_url, parse_url, parse_url_with_limits, validate_url,
    validate_url_with_limits, InspectLink, UnmaskedRef, UrlClass,
};
pub use validate::{
    validate_item, validate_item_shape, validate_item_with_options, ValidateOptions,
    ValidationReport,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encodes an item record into a masked inspect URL.
///
/// Convenience alias spanning the full pipeline; see
/// [`url::build_masked_url`].
pub fn encode_item_url(item: &EconItem) -> Result<String, EncodeError> {
    url::build_masked_url(item)
}

/// Decodes a masked inspect URL into an item record with default limits.
///
/// Convenience alias spanning the full pipeline; see
/// [`url::decode_masked_url`].
pub fn decode_item_url(url_text: &str) -> Result<EconItem, DecodeError> {
    url::decode_masked_url(url_text)
}
