//! Item record encoding/decoding.
//!
//! Serializes an [`EconItem`] as a stream of tagged fields and parses it
//! back under adversarial-input assumptions. The field-number tables below
//! are a compatibility contract shared with the consuming game client; they
//! are pinned by golden-byte tests and must never be re-derived.

use crate::codec::primitives::{Reader, WireType, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{DecodeLimits, MAX_TEXT_LEN};
use crate::model::{Decoration, EconItem};

/// Item record field numbers.
mod field {
    pub const ACCOUNTID: u32 = 1;
    pub const ITEMID: u32 = 2;
    pub const DEFINDEX: u32 = 3;
    pub const PAINTINDEX: u32 = 4;
    pub const RARITY: u32 = 5;
    pub const QUALITY: u32 = 6;
    pub const PAINTWEAR: u32 = 7;
    pub const PAINTSEED: u32 = 8;
    pub const KILLEATERSCORETYPE: u32 = 9;
    pub const KILLEATERVALUE: u32 = 10;
    pub const CUSTOMNAME: u32 = 11;
    pub const STICKERS: u32 = 12;
    pub const INVENTORY: u32 = 13;
    pub const ORIGIN: u32 = 14;
    pub const QUESTID: u32 = 15;
    pub const DROPREASON: u32 = 16;
    pub const MUSICINDEX: u32 = 17;
    pub const ENTINDEX: u32 = 18;
    pub const PETINDEX: u32 = 19;
    pub const KEYCHAINS: u32 = 20;
    pub const STYLE: u32 = 21;
    pub const UPGRADE_LEVEL: u32 = 22;
    pub const VARIATIONS: u32 = 23;
}

/// Decoration sub-record field numbers.
mod deco_field {
    pub const SLOT: u32 = 1;
    pub const STICKER_ID: u32 = 2;
    pub const WEAR: u32 = 3;
    pub const SCALE: u32 = 4;
    pub const ROTATION: u32 = 5;
    pub const TINT_ID: u32 = 6;
    pub const OFFSET_X: u32 = 7;
    pub const OFFSET_Y: u32 = 8;
    pub const OFFSET_Z: u32 = 9;
    pub const PATTERN: u32 = 10;
    pub const HIGHLIGHT_REEL: u32 = 11;
    pub const WRAPPED_STICKER: u32 = 12;
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes an item record to its raw byte sequence (no framing).
///
/// Only present fields are written, in ascending field-number order so the
/// output is deterministic. Out-of-domain numeric values are written as-is;
/// domain enforcement belongs to [`crate::validate::validate_item`].
pub fn encode_item(item: &EconItem) -> Result<Vec<u8>, EncodeError> {
    if let Some(name) = &item.customname {
        let len = name.len();
        if len > MAX_TEXT_LEN {
            return Err(EncodeError::LengthExceedsLimit {
                field: "customname",
                len,
                max: MAX_TEXT_LEN,
            });
        }
    }

    let mut writer = Writer::with_capacity(64);

    write_u32(&mut writer, field::ACCOUNTID, item.accountid);
    write_u64(&mut writer, field::ITEMID, item.itemid);
    write_u32(&mut writer, field::DEFINDEX, item.defindex);
    write_u32(&mut writer, field::PAINTINDEX, item.paintindex);
    write_u32(&mut writer, field::RARITY, item.rarity);
    write_u32(&mut writer, field::QUALITY, item.quality);
    write_f32(&mut writer, field::PAINTWEAR, item.paintwear);
    write_u32(&mut writer, field::PAINTSEED, item.paintseed);
    write_u32(&mut writer, field::KILLEATERSCORETYPE, item.killeaterscoretype);
    write_u32(&mut writer, field::KILLEATERVALUE, item.killeatervalue);
    if let Some(name) = &item.customname {
        writer.write_tag(field::CUSTOMNAME, WireType::LengthDelimited);
        writer.write_string(name);
    }
    write_decorations(&mut writer, field::STICKERS, &item.stickers);
    write_u32(&mut writer, field::INVENTORY, item.inventory);
    write_u32(&mut writer, field::ORIGIN, item.origin);
    write_u32(&mut writer, field::QUESTID, item.questid);
    write_u32(&mut writer, field::DROPREASON, item.dropreason);
    write_u64(&mut writer, field::MUSICINDEX, item.musicindex);
    if let Some(entindex) = item.entindex {
        writer.write_tag(field::ENTINDEX, WireType::Varint);
        // Raw two's complement, sign-extended to 64 bits. Not zigzag.
        writer.write_varint(entindex as i64 as u64);
    }
    write_u32(&mut writer, field::PETINDEX, item.petindex);
    write_decorations(&mut writer, field::KEYCHAINS, &item.keychains);
    write_u32(&mut writer, field::STYLE, item.style);
    write_u32(&mut writer, field::UPGRADE_LEVEL, item.upgrade_level);
    write_decorations(&mut writer, field::VARIATIONS, &item.variations);

    Ok(writer.into_bytes())
}

fn write_u32(writer: &mut Writer, field: u32, value: Option<u32>) {
    if let Some(v) = value {
        writer.write_tag(field, WireType::Varint);
        writer.write_varint(u64::from(v));
    }
}

fn write_u64(writer: &mut Writer, field: u32, value: Option<u64>) {
    if let Some(v) = value {
        writer.write_tag(field, WireType::Varint);
        writer.write_varint(v);
    }
}

fn write_f32(writer: &mut Writer, field: u32, value: Option<f32>) {
    if let Some(v) = value {
        writer.write_tag(field, WireType::Fixed32);
        writer.write_f32(v);
    }
}

fn write_decorations(writer: &mut Writer, field: u32, decorations: &[Decoration]) {
    for decoration in decorations {
        let nested = encode_decoration(decoration);
        writer.write_tag(field, WireType::LengthDelimited);
        writer.write_len_delimited(&nested);
    }
}

/// Encodes one decoration as a nested message body.
fn encode_decoration(decoration: &Decoration) -> Vec<u8> {
    let mut writer = Writer::with_capacity(32);

    writer.write_tag(deco_field::SLOT, WireType::Varint);
    writer.write_varint(u64::from(decoration.slot));
    writer.write_tag(deco_field::STICKER_ID, WireType::Varint);
    writer.write_varint(u64::from(decoration.sticker_id));
    write_f32(&mut writer, deco_field::WEAR, decoration.wear);
    write_f32(&mut writer, deco_field::SCALE, decoration.scale);
    write_f32(&mut writer, deco_field::ROTATION, decoration.rotation);
    write_u32(&mut writer, deco_field::TINT_ID, decoration.tint_id);
    write_f32(&mut writer, deco_field::OFFSET_X, decoration.offset_x);
    write_f32(&mut writer, deco_field::OFFSET_Y, decoration.offset_y);
    write_f32(&mut writer, deco_field::OFFSET_Z, decoration.offset_z);
    write_u32(&mut writer, deco_field::PATTERN, decoration.pattern);
    write_u32(&mut writer, deco_field::HIGHLIGHT_REEL, decoration.highlight_reel);
    write_u32(&mut writer, deco_field::WRAPPED_STICKER, decoration.wrapped_sticker);

    writer.into_bytes()
}

// =============================================================================
// DECODING
// =============================================================================

/// Tracks the total number of fields processed across one decode call,
/// nested messages included. Defends against payloads stuffed with
/// trivially-encoded repeated fields.
struct FieldBudget {
    used: usize,
    max: usize,
}

impl FieldBudget {
    fn new(max: usize) -> Self {
        Self { used: 0, max }
    }

    fn charge(&mut self) -> Result<(), DecodeError> {
        self.used += 1;
        if self.used > self.max {
            return Err(DecodeError::FieldBudgetExceeded { max: self.max });
        }
        Ok(())
    }
}

/// Decodes an item record from its raw byte sequence, using default limits.
pub fn decode_item(input: &[u8]) -> Result<EconItem, DecodeError> {
    decode_item_with_limits(input, &DecodeLimits::default())
}

/// Decodes an item record with explicit limits.
///
/// The input is treated as untrusted: every length is bounds-checked, the
/// total field count is budgeted, and unknown field numbers are skipped
/// (logged as an advisory) rather than rejected.
pub fn decode_item_with_limits(input: &[u8], limits: &DecodeLimits) -> Result<EconItem, DecodeError> {
    if input.len() > limits.max_payload_size {
        return Err(DecodeError::BufferOverflow {
            len: input.len(),
            max: limits.max_payload_size,
        });
    }

    let mut reader = Reader::new(input);
    let mut budget = FieldBudget::new(limits.max_fields);
    let mut item = EconItem::default();

    while !reader.is_empty() {
        budget.charge()?;
        let tag_pos = reader.position();
        let (field_number, wire) = reader.read_tag()?;
        match field_number {
            field::ACCOUNTID => item.accountid = Some(read_u32(&mut reader, wire, "accountid")?),
            field::ITEMID => item.itemid = Some(read_u64(&mut reader, wire, "itemid")?),
            field::DEFINDEX => item.defindex = Some(read_u32(&mut reader, wire, "defindex")?),
            field::PAINTINDEX => item.paintindex = Some(read_u32(&mut reader, wire, "paintindex")?),
            field::RARITY => item.rarity = Some(read_u32(&mut reader, wire, "rarity")?),
            field::QUALITY => item.quality = Some(read_u32(&mut reader, wire, "quality")?),
            field::PAINTWEAR => item.paintwear = Some(read_f32(&mut reader, wire, "paintwear")?),
            field::PAINTSEED => item.paintseed = Some(read_u32(&mut reader, wire, "paintseed")?),
            field::KILLEATERSCORETYPE => {
                item.killeaterscoretype = Some(read_u32(&mut reader, wire, "killeaterscoretype")?)
            }
            field::KILLEATERVALUE => {
                item.killeatervalue = Some(read_u32(&mut reader, wire, "killeatervalue")?)
            }
            field::CUSTOMNAME => {
                expect_wire(wire, WireType::LengthDelimited, "customname")?;
                item.customname = Some(reader.read_string(limits.max_text_len, "customname")?);
            }
            field::STICKERS => {
                item.stickers
                    .push(read_decoration(&mut reader, wire, "sticker", limits, &mut budget)?)
            }
            field::INVENTORY => item.inventory = Some(read_u32(&mut reader, wire, "inventory")?),
            field::ORIGIN => item.origin = Some(read_u32(&mut reader, wire, "origin")?),
            field::QUESTID => item.questid = Some(read_u32(&mut reader, wire, "questid")?),
            field::DROPREASON => item.dropreason = Some(read_u32(&mut reader, wire, "dropreason")?),
            field::MUSICINDEX => item.musicindex = Some(read_u64(&mut reader, wire, "musicindex")?),
            field::ENTINDEX => {
                expect_wire(wire, WireType::Varint, "entindex")?;
                // Sign-extended on the wire; the signed value lives in the
                // low 32 bits.
                let raw = reader.read_varint("entindex")?;
                item.entindex = Some(raw as u32 as i32);
            }
            field::PETINDEX => item.petindex = Some(read_u32(&mut reader, wire, "petindex")?),
            field::KEYCHAINS => {
                item.keychains
                    .push(read_decoration(&mut reader, wire, "keychain", limits, &mut budget)?)
            }
            field::STYLE => item.style = Some(read_u32(&mut reader, wire, "style")?),
            field::UPGRADE_LEVEL => {
                item.upgrade_level = Some(read_u32(&mut reader, wire, "upgrade_level")?)
            }
            field::VARIATIONS => {
                item.variations
                    .push(read_decoration(&mut reader, wire, "variation", limits, &mut budget)?)
            }
            unknown => {
                log::debug!(
                    "skipping unknown field {unknown} (wire type {wire:?}) at byte {tag_pos}"
                );
                reader.skip_field(wire)?;
            }
        }
    }

    Ok(item)
}

fn expect_wire(found: WireType, expected: WireType, field: &'static str) -> Result<(), DecodeError> {
    if found != expected {
        return Err(DecodeError::WireTypeMismatch {
            field,
            expected: match expected {
                WireType::Varint => "varint",
                WireType::Fixed64 => "fixed64",
                WireType::LengthDelimited => "length-delimited",
                WireType::Fixed32 => "fixed32",
            },
            found: found as u8,
        });
    }
    Ok(())
}

fn read_u32(reader: &mut Reader<'_>, wire: WireType, field: &'static str) -> Result<u32, DecodeError> {
    expect_wire(wire, WireType::Varint, field)?;
    reader.read_varint_u32(field)
}

fn read_u64(reader: &mut Reader<'_>, wire: WireType, field: &'static str) -> Result<u64, DecodeError> {
    expect_wire(wire, WireType::Varint, field)?;
    reader.read_varint(field)
}

fn read_f32(reader: &mut Reader<'_>, wire: WireType, field: &'static str) -> Result<f32, DecodeError> {
    expect_wire(wire, WireType::Fixed32, field)?;
    reader.read_f32(field)
}

fn read_decoration(
    reader: &mut Reader<'_>,
    wire: WireType,
    field: &'static str,
    limits: &DecodeLimits,
    budget: &mut FieldBudget,
) -> Result<Decoration, DecodeError> {
    expect_wire(wire, WireType::LengthDelimited, field)?;
    let nested = reader.read_len_delimited(limits.max_text_len, field)?;
    decode_decoration(nested, budget)
}

/// Decodes one decoration from a nested message body.
fn decode_decoration(input: &[u8], budget: &mut FieldBudget) -> Result<Decoration, DecodeError> {
    let mut reader = Reader::new(input);
    let mut decoration = Decoration::default();

    while !reader.is_empty() {
        budget.charge()?;
        let tag_pos = reader.position();
        let (field_number, wire) = reader.read_tag()?;
        match field_number {
            deco_field::SLOT => decoration.slot = read_u32(&mut reader, wire, "slot")?,
            deco_field::STICKER_ID => {
                decoration.sticker_id = read_u32(&mut reader, wire, "sticker_id")?
            }
            deco_field::WEAR => decoration.wear = Some(read_f32(&mut reader, wire, "wear")?),
            deco_field::SCALE => decoration.scale = Some(read_f32(&mut reader, wire, "scale")?),
            deco_field::ROTATION => {
                decoration.rotation = Some(read_f32(&mut reader, wire, "rotation")?)
            }
            deco_field::TINT_ID => decoration.tint_id = Some(read_u32(&mut reader, wire, "tint_id")?),
            deco_field::OFFSET_X => {
                decoration.offset_x = Some(read_f32(&mut reader, wire, "offset_x")?)
            }
            deco_field::OFFSET_Y => {
                decoration.offset_y = Some(read_f32(&mut reader, wire, "offset_y")?)
            }
            deco_field::OFFSET_Z => {
                decoration.offset_z = Some(read_f32(&mut reader, wire, "offset_z")?)
            }
            deco_field::PATTERN => decoration.pattern = Some(read_u32(&mut reader, wire, "pattern")?),
            deco_field::HIGHLIGHT_REEL => {
                decoration.highlight_reel = Some(read_u32(&mut reader, wire, "highlight_reel")?)
            }
            deco_field::WRAPPED_STICKER => {
                decoration.wrapped_sticker = Some(read_u32(&mut reader, wire, "wrapped_sticker")?)
            }
            unknown => {
                log::debug!(
                    "skipping unknown decoration field {unknown} (wire type {wire:?}) at byte {tag_pos}"
                );
                reader.skip_field(wire)?;
            }
        }
    }

    Ok(decoration)
}
