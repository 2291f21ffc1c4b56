//! The item record that masked payloads serialize.

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;
use crate::model::Decoration;

/// A game item's economic and visual attributes.
///
/// Every field is tracked with explicit presence so that "absent" and "zero"
/// stay distinguishable both in memory and on the wire: an absent field is
/// never written, and the reader only fills in fields it actually saw.
///
/// `defindex`, `paintindex`, `paintseed`, and `paintwear` are required for a
/// record to be *valid*, but the codec round-trips partial records unchanged;
/// required-ness is enforced by [`crate::validate::validate_item`], not here.
///
/// `itemid` and `musicindex` are 64-bit end-to-end. Values near `2^64 - 1`
/// must survive a round trip without precision loss.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EconItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accountid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itemid: Option<u64>,
    /// Weapon/item type identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defindex: Option<u32>,
    /// Finish/skin identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paintindex: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    /// Wear value, nominally in `[0.0, 1.0]`.
    ///
    /// The codec faithfully round-trips any 32-bit float bit pattern,
    /// including out-of-domain values from malformed input; the domain
    /// check lives in the validation layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paintwear: Option<f32>,
    /// Pattern seed, domain `0..=1000`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paintseed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub killeaterscoretype: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub killeatervalue: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customname: Option<String>,
    /// Stickers in slot order. Order is preserved through a round trip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stickers: Vec<Decoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropreason: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub musicindex: Option<u64>,
    /// Entity index, signed. Encoded via its raw two's-complement bit
    /// pattern (sign-extended varint), not zigzag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entindex: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub petindex: Option<u32>,
    /// Keychains in slot order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keychains: Vec<Decoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_level: Option<u32>,
    /// Style variations in slot order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<Decoration>,
}

impl EconItem {
    /// Creates a record with only the four required fields present.
    pub fn new(defindex: u32, paintindex: u32, paintseed: u32, paintwear: f32) -> Self {
        Self {
            defindex: Some(defindex),
            paintindex: Some(paintindex),
            paintseed: Some(paintseed),
            paintwear: Some(paintwear),
            ..Self::default()
        }
    }

    /// Returns true if all four required fields are present.
    pub fn has_required_fields(&self) -> bool {
        self.defindex.is_some()
            && self.paintindex.is_some()
            && self.paintseed.is_some()
            && self.paintwear.is_some()
    }

    /// Sets `rarity` from a grade name, failing on unrecognized names.
    pub fn set_rarity_name(&mut self, name: &str) -> Result<(), EncodeError> {
        self.rarity = Some(rarity_from_name(name)?);
        Ok(())
    }
}

/// Maps a rarity grade name to its numeric identifier.
///
/// Unrecognized names fail loudly; silently substituting a default grade
/// would produce a payload describing a different item.
pub fn rarity_from_name(name: &str) -> Result<u32, EncodeError> {
    match name.to_ascii_lowercase().as_str() {
        "default" => Ok(0),
        "common" | "consumer" => Ok(1),
        "uncommon" | "industrial" => Ok(2),
        "rare" | "mil-spec" | "milspec" => Ok(3),
        "mythical" | "restricted" => Ok(4),
        "legendary" | "classified" => Ok(5),
        "ancient" | "covert" => Ok(6),
        "immortal" | "contraband" => Ok(7),
        _ => Err(EncodeError::UnknownRarity {
            name: name.to_string(),
        }),
    }
}
