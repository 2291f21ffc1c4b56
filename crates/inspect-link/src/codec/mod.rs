//! Binary encoding/decoding for item records.
//!
//! Implements the protobuf-subset wire format: base-128 varints, field tags,
//! fixed-width 32/64-bit fields, and length-delimited nested messages.

pub mod item;
pub mod primitives;

pub use item::{decode_item, decode_item_with_limits, encode_item};
pub use primitives::{Reader, WireType, Writer};
