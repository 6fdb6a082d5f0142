//! Ordered table of scancode-to-keycode entries

use super::entry::KeyEntry;

/// Hard cap on table length, bounded by the 2-byte wire index field.
pub const MAX_TABLE_LEN: usize = 0x10000;

/// Ordered sequence of [`KeyEntry`] rows
///
/// An entry's index is its 0-based position in the table. Mutation never
/// reorders entries, so indices are stable across edits. Entries are created
/// at construction time and only ever overwritten in place afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeyEntryTable {
    entries: Vec<KeyEntry>,
}

impl KeyEntryTable {
    /// Build a table from its entries, in index order
    ///
    /// Returns `None` if more than 65536 entries are given.
    pub fn new(entries: Vec<KeyEntry>) -> Option<Self> {
        if entries.len() > MAX_TABLE_LEN {
            return None;
        }
        Some(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positional access; out-of-range indices are simply absent
    pub fn entry_at(&self, index: usize) -> Option<&KeyEntry> {
        self.entries.get(index)
    }

    /// Linear scan in table order, returning the first entry whose scancode
    /// equals `bytes` at its exact configured length
    ///
    /// Later duplicates are reachable only by index; downstream logic
    /// depends on first-match semantics.
    pub fn find_by_scancode(&self, bytes: &[u8]) -> Option<(usize, &KeyEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.scancode.matches(bytes))
    }

    /// Overwrite the entry at `index` in place
    ///
    /// Out-of-range indices are ignored; callers locate first.
    pub fn replace_at(&mut self, index: usize, entry: KeyEntry) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = entry;
        }
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }
}
