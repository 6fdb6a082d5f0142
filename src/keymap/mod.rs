//! Sparse keymap engine: scancode-to-keycode entries and their mutation
//!
//! This module owns the ordered table of scancode→keycode entries and the
//! operations over it:
//! - Index- and scancode-based lookup (first match wins on scancode)
//! - In-place rewrites with the reserved-keycode type transition
//! - A derived set of actively mapped keycodes, kept exact after every edit
//!
//! # Architecture
//!
//! ```text
//! KeymapRecord → KeymapEngine::get/set → KeyEntryTable + ActiveKeycodes
//! ```

mod engine;
mod entry;
mod table;
mod tracker;

pub use engine::{EntryInfo, KeymapEngine, Locator, MapError};
pub use entry::{EntryType, KeyEntry, Scancode, KEY_RESERVED, MAX_SCANCODE_LEN};
pub use table::{KeyEntryTable, MAX_TABLE_LEN};
pub use tracker::ActiveKeycodes;
