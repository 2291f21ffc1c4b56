//! Data model types for item records.
//!
//! - [`EconItem`]: the item record, a struct of sparse optional fields
//! - [`Decoration`]: the shared shape for stickers, keychains, and variations

pub mod decoration;
pub mod item;

pub use decoration::Decoration;
pub use item::{rarity_from_name, EconItem};
