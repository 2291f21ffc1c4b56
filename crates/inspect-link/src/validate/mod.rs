//! Domain validation for item records.
//!
//! Validation is advisory and separate from the codec: the wire layer
//! faithfully round-trips out-of-domain values, while this module reports
//! which of them break the rules. All violations are collected into one
//! report instead of failing on the first.

use serde_json::Value;

use crate::limits::{MAX_CUSTOM_NAME_LEN, MAX_PAINT_SEED};
use crate::model::{Decoration, EconItem};

/// Result of validating a record or URL.
///
/// `errors` are hard rule violations; `warnings` are unusual but legal
/// values. `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    /// Creates an empty (valid) report.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Records a hard violation.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.valid = false;
    }

    /// Records a soft concern.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Options for the domain rules applied by [`validate_item_with_options`].
///
/// The defaults mirror the constants in [`crate::limits`].
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    /// Maximum custom name length in characters.
    pub max_custom_name_len: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            max_custom_name_len: MAX_CUSTOM_NAME_LEN,
        }
    }
}

/// Validates an item record prior to encoding, with default options.
///
/// Checks required fields, numeric domains, and text lengths. Does not
/// short-circuit: every violation is reported together.
pub fn validate_item(item: &EconItem) -> ValidationReport {
    validate_item_with_options(item, &ValidateOptions::default())
}

/// Validates an item record under the given domain rules.
pub fn validate_item_with_options(item: &EconItem, options: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    if item.defindex.is_none() {
        report.error("required field missing: defindex");
    }
    if item.paintindex.is_none() {
        report.error("required field missing: paintindex");
    }
    if item.paintseed.is_none() {
        report.error("required field missing: paintseed");
    }
    match item.paintwear {
        None => report.error("required field missing: paintwear"),
        Some(wear) if wear.is_nan() => report.error("paintwear is NaN"),
        Some(wear) if !(0.0..=1.0).contains(&wear) => {
            report.error(format!("paintwear {wear} outside [0.0, 1.0]"));
        }
        Some(wear) if wear == 0.0 => {
            report.warn("paintwear is exactly 0.0, which no dropped item has");
        }
        Some(_) => {}
    }
    if let Some(seed) = item.paintseed {
        if seed > MAX_PAINT_SEED {
            report.error(format!("paintseed {seed} outside 0..={MAX_PAINT_SEED}"));
        }
    }
    if let Some(name) = &item.customname {
        if name.chars().count() > options.max_custom_name_len {
            report.error(format!(
                "customname of {} characters exceeds maximum {}",
                name.chars().count(),
                options.max_custom_name_len
            ));
        }
    }
    if let Some(entindex) = item.entindex {
        if entindex < -1 {
            report.warn(format!("entindex {entindex} below -1 is unusual"));
        }
    }

    validate_decorations(&mut report, "stickers", &item.stickers);
    validate_decorations(&mut report, "keychains", &item.keychains);
    validate_decorations(&mut report, "variations", &item.variations);

    report
}

fn validate_decorations(report: &mut ValidationReport, sequence: &str, decorations: &[Decoration]) {
    for (index, decoration) in decorations.iter().enumerate() {
        if let Some(wear) = decoration.wear {
            if wear.is_nan() || !(0.0..=1.0).contains(&wear) {
                report.error(format!("{sequence}[{index}] wear {wear} outside [0.0, 1.0]"));
            }
        }
        if let Some(scale) = decoration.scale {
            if scale <= 0.0 || scale > 10.0 {
                report.warn(format!("{sequence}[{index}] scale {scale} is unusual"));
            }
        }
        if let Some(rotation) = decoration.rotation {
            if !(-360.0..=360.0).contains(&rotation) {
                report.warn(format!("{sequence}[{index}] rotation {rotation} is unusual"));
            }
        }
    }
}

/// Fields accepted by [`validate_item_shape`], with their expected shapes.
const ITEM_U32_KEYS: &[&str] = &[
    "accountid",
    "defindex",
    "paintindex",
    "rarity",
    "quality",
    "paintseed",
    "killeaterscoretype",
    "killeatervalue",
    "inventory",
    "origin",
    "questid",
    "dropreason",
    "petindex",
    "style",
    "upgrade_level",
];
const ITEM_U64_KEYS: &[&str] = &["itemid", "musicindex"];
const ITEM_SEQ_KEYS: &[&str] = &["stickers", "keychains", "variations"];

/// Structurally validates a loosely-typed candidate before it is trusted as
/// an [`EconItem`].
///
/// Intended for values deserialized from configuration or network responses.
/// Only shape is checked here (types, integer ranges, sequence element
/// shapes); domain rules remain [`validate_item`]'s job.
pub fn validate_item_shape(value: &Value) -> ValidationReport {
    let mut report = ValidationReport::new();

    let Some(object) = value.as_object() else {
        report.error("item candidate is not an object");
        return report;
    };

    for (key, field) in object {
        if ITEM_U32_KEYS.contains(&key.as_str()) {
            match field.as_u64() {
                Some(v) if v <= u64::from(u32::MAX) => {}
                Some(v) => report.error(format!("{key} value {v} exceeds u32 range")),
                None => report.error(format!("{key} is not an unsigned integer")),
            }
        } else if ITEM_U64_KEYS.contains(&key.as_str()) {
            if field.as_u64().is_none() {
                report.error(format!("{key} is not an unsigned 64-bit integer"));
            }
        } else if ITEM_SEQ_KEYS.contains(&key.as_str()) {
            validate_decoration_shapes(&mut report, key, field);
        } else {
            match key.as_str() {
                "paintwear" => {
                    if field.as_f64().is_none() {
                        report.error("paintwear is not a number");
                    }
                }
                "customname" => {
                    if !field.is_string() {
                        report.error("customname is not a string");
                    }
                }
                "entindex" => match field.as_i64() {
                    Some(v) if i32::try_from(v).is_ok() => {}
                    Some(v) => report.error(format!("entindex value {v} exceeds i32 range")),
                    None => report.error("entindex is not an integer"),
                },
                unknown => report.warn(format!("unknown field: {unknown}")),
            }
        }
    }

    report
}

fn validate_decoration_shapes(report: &mut ValidationReport, sequence: &str, value: &Value) {
    let Some(entries) = value.as_array() else {
        report.error(format!("{sequence} is not an array"));
        return;
    };
    for (index, entry) in entries.iter().enumerate() {
        let Some(object) = entry.as_object() else {
            report.error(format!("{sequence}[{index}] is not an object"));
            continue;
        };
        for required in ["slot", "sticker_id"] {
            match object.get(required) {
                Some(v) if v.as_u64().is_some_and(|v| v <= u64::from(u32::MAX)) => {}
                Some(_) => report.error(format!(
                    "{sequence}[{index}].{required} is not an unsigned integer"
                )),
                None => report.error(format!("{sequence}[{index}] missing {required}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_item_passes() {
        let report = validate_item(&EconItem::new(7, 44, 661, 0.15));
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_all_violations_collected() {
        // Required fields missing and a domain violation must all be
        // reported in one pass, not first-failure-only.
        let mut item = EconItem::default();
        item.paintseed = Some(4000);
        item.paintwear = Some(1.5);
        let report = validate_item(&item);
        assert!(!report.valid);
        assert!(report.errors.len() >= 4, "got: {:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.contains("defindex")));
        assert!(report.errors.iter().any(|e| e.contains("paintindex")));
        assert!(report.errors.iter().any(|e| e.contains("paintseed 4000")));
        assert!(report.errors.iter().any(|e| e.contains("paintwear 1.5")));
    }

    #[test]
    fn test_nan_paintwear_is_error() {
        let item = EconItem::new(7, 44, 661, f32::NAN);
        let report = validate_item(&item);
        assert!(report.errors.iter().any(|e| e.contains("NaN")));
    }

    #[test]
    fn test_customname_length_is_characters_not_bytes() {
        let mut item = EconItem::new(7, 44, 661, 0.15);
        item.customname = Some("\u{2605}".repeat(MAX_CUSTOM_NAME_LEN));
        assert!(validate_item(&item).valid);
        item.customname = Some("\u{2605}".repeat(MAX_CUSTOM_NAME_LEN + 1));
        assert!(!validate_item(&item).valid);
    }

    #[test]
    fn test_customname_limit_is_configurable() {
        let mut item = EconItem::new(7, 44, 661, 0.15);
        item.customname = Some("a".repeat(120));

        assert!(!validate_item(&item).valid);

        let roomy = ValidateOptions {
            max_custom_name_len: 128,
        };
        assert!(validate_item_with_options(&item, &roomy).valid);

        let tight = ValidateOptions {
            max_custom_name_len: 8,
        };
        item.customname = Some("ten chars!".to_string());
        let report = validate_item_with_options(&item, &tight);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("maximum 8")));
    }

    #[test]
    fn test_decoration_wear_domain() {
        let mut item = EconItem::new(7, 44, 661, 0.15);
        let mut sticker = Decoration::new(0, 5032);
        sticker.wear = Some(2.0);
        item.stickers.push(sticker);
        let report = validate_item(&item);
        assert!(report.errors.iter().any(|e| e.contains("stickers[0] wear")));
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut item = EconItem::new(7, 44, 661, 0.15);
        item.entindex = Some(-5);
        let report = validate_item(&item);
        assert!(report.valid);
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn test_shape_accepts_well_formed_candidate() {
        let candidate = json!({
            "defindex": 7,
            "paintindex": 44,
            "paintseed": 661,
            "paintwear": 0.15,
            "itemid": 18446744073709551615u64,
            "customname": "my ak",
            "stickers": [{"slot": 0, "sticker_id": 5032, "wear": 0.15}],
        });
        let report = validate_item_shape(&candidate);
        assert!(report.valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn test_shape_rejects_wrong_types() {
        let candidate = json!({
            "defindex": "seven",
            "paintwear": "wet",
            "entindex": 3000000000u64,
            "stickers": [{"wear": 0.15}],
        });
        let report = validate_item_shape(&candidate);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("defindex")));
        assert!(report.errors.iter().any(|e| e.contains("paintwear")));
        assert!(report.errors.iter().any(|e| e.contains("entindex")));
        assert!(report.errors.iter().any(|e| e.contains("missing slot")));
    }

    #[test]
    fn test_shape_rejects_non_object() {
        let report = validate_item_shape(&json!([1, 2, 3]));
        assert!(!report.valid);
    }

    #[test]
    fn test_shape_warns_on_unknown_field() {
        let report = validate_item_shape(&json!({"defindex": 7, "floatvalue": 0.15}));
        assert!(report.valid);
        assert!(report.warnings.iter().any(|w| w.contains("floatvalue")));
    }
}
