//! Decoration sub-records attached to an item.
//!
//! Stickers, keychains, and style variations share one wire shape; only the
//! top-level field number introducing each sequence differs. A single type
//! covers all three.

use serde::{Deserialize, Serialize};

/// A single decoration applied to an item slot.
///
/// `slot` and `sticker_id` are always present; everything else is sparse.
/// An absent field is omitted from the wire form entirely, which is distinct
/// from encoding a zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decoration {
    /// Slot index on the item. Order within a sequence is meaningful.
    pub slot: u32,
    /// Decoration definition identifier.
    pub sticker_id: u32,
    /// Wear of the decoration, nominally in `[0.0, 1.0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wear: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// Rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_z: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_reel: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped_sticker: Option<u32>,
}

impl Decoration {
    /// Creates a decoration with only the two always-present fields.
    pub fn new(slot: u32, sticker_id: u32) -> Self {
        Self {
            slot,
            sticker_id,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_leaves_optionals_absent() {
        let d = Decoration::new(2, 5032);
        assert_eq!(d.slot, 2);
        assert_eq!(d.sticker_id, 5032);
        assert!(d.wear.is_none());
        assert!(d.offset_x.is_none());
        assert!(d.wrapped_sticker.is_none());
    }
}
