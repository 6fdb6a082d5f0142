//! Lookup and mutate operations over a key entry table

use std::fmt;

use tracing::debug;

use super::entry::{EntryType, KeyEntry, Scancode, KEY_RESERVED, MAX_SCANCODE_LEN};
use super::table::KeyEntryTable;
use super::tracker::ActiveKeycodes;

/// How a request addresses an entry: by position or by scancode bytes
///
/// Dispatch is exclusive; a request locates one way or the other, never both.
#[derive(Clone, Copy, Debug)]
pub enum Locator<'a> {
    ByIndex(u16),
    ByScancode(&'a [u8]),
}

/// Engine failure modes
///
/// Both are recoverable and leave the table untouched; the engine never
/// partially commits a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapError {
    /// The locator resolved to no entry
    NotFound,
    /// The requested scancode exceeds the maximum byte width
    InvalidLength,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::NotFound => write!(f, "no matching keymap entry"),
            MapError::InvalidLength => {
                write!(f, "scancode exceeds {} bytes", MAX_SCANCODE_LEN)
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Side-effect-free view of one entry, as resolved by a get
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    pub index: usize,
    pub scancode: Scancode,
    pub keycode: u32,
}

/// Owns a [`KeyEntryTable`] and its derived [`ActiveKeycodes`] set and keeps
/// the two consistent across mutations
///
/// One engine exclusively owns one table; get and set run to completion
/// before the next request is issued.
#[derive(Debug, Clone)]
pub struct KeymapEngine {
    table: KeyEntryTable,
    active: ActiveKeycodes,
}

impl KeymapEngine {
    pub fn new(table: KeyEntryTable) -> Self {
        let active = ActiveKeycodes::from_table(&table);
        Self { table, active }
    }

    pub fn table(&self) -> &KeyEntryTable {
        &self.table
    }

    pub fn active_keycodes(&self) -> &ActiveKeycodes {
        &self.active
    }

    /// Resolve a locator to an entry and its index
    ///
    /// A by-scancode locator longer than 32 bytes can match nothing.
    fn locate(&self, locator: Locator<'_>) -> Option<(usize, KeyEntry)> {
        match locator {
            Locator::ByIndex(index) => self
                .table
                .entry_at(index as usize)
                .map(|entry| (index as usize, *entry)),
            Locator::ByScancode(bytes) => {
                if bytes.len() > MAX_SCANCODE_LEN {
                    return None;
                }
                self.table
                    .find_by_scancode(bytes)
                    .map(|(index, entry)| (index, *entry))
            }
        }
    }

    /// Look up one entry without mutating anything
    pub fn get(&self, locator: Locator<'_>) -> Result<EntryInfo, MapError> {
        let (index, entry) = self.locate(locator).ok_or(MapError::NotFound)?;
        Ok(EntryInfo {
            index,
            scancode: entry.scancode,
            keycode: entry.keycode,
        })
    }

    /// Rewrite one entry in place, returning its previous keycode
    ///
    /// The located entry's scancode and keycode are overwritten with the new
    /// values; its type transitions per the reserved-keycode rule:
    /// assigning keycode 0 demotes a `Key` entry to `Ignored`, while any
    /// assignment to an `Ignored` entry promotes it to `Key`. The active
    /// keycode set is updated afterwards, old code first, against the
    /// already-rewritten table. Failures commit nothing.
    pub fn set(
        &mut self,
        locator: Locator<'_>,
        new_scancode: &[u8],
        new_keycode: u32,
    ) -> Result<u32, MapError> {
        let (index, entry) = self.locate(locator).ok_or(MapError::NotFound)?;
        let scancode = Scancode::from_bytes(new_scancode).ok_or(MapError::InvalidLength)?;

        let old_type = entry.entry_type;
        let old_keycode = entry.keycode;

        let new_type = if new_keycode == KEY_RESERVED && old_type == EntryType::Key {
            EntryType::Ignored
        } else if old_type == EntryType::Ignored {
            EntryType::Key
        } else {
            old_type
        };

        self.table
            .replace_at(index, KeyEntry::new(new_type, scancode, new_keycode));

        // The rewritten entry must no longer count as a reference to the
        // old keycode, so the re-scan runs against the updated table.
        if old_type == EntryType::Key {
            self.active
                .clear_active_if_unreferenced(old_keycode, &self.table);
        }
        if new_type == EntryType::Key {
            self.active.set_active(new_keycode);
        }

        debug!(
            index,
            scancode = %scancode,
            old_keycode,
            new_keycode,
            ?old_type,
            ?new_type,
            "rewrote keymap entry"
        );

        Ok(old_keycode)
    }
}
