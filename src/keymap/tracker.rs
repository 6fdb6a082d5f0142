//! Derived set of keycodes referenced by at least one active entry

use std::collections::HashSet;

use super::entry::EntryType;
use super::table::KeyEntryTable;

/// The set of keycodes for which some `Key`-type entry exists
///
/// Several entries may reference the same keycode, so clearing a code on one
/// entry's edit is only correct when no other entry still references it;
/// [`ActiveKeycodes::clear_active_if_unreferenced`] re-scans the table before
/// clearing instead of trusting a cached count. Only the mutate engine
/// touches this set.
#[derive(Debug, Clone, Default)]
pub struct ActiveKeycodes {
    active: HashSet<u32>,
}

impl ActiveKeycodes {
    /// Derive the set from a freshly constructed table
    pub fn from_table(table: &KeyEntryTable) -> Self {
        let active = table
            .entries()
            .iter()
            .filter(|entry| entry.is_key())
            .map(|entry| entry.keycode)
            .collect();
        Self { active }
    }

    pub fn is_active(&self, keycode: u32) -> bool {
        self.active.contains(&keycode)
    }

    pub fn set_active(&mut self, keycode: u32) {
        self.active.insert(keycode);
    }

    /// Clear `keycode` only if no `Key`-type entry in `table` still
    /// references it
    pub fn clear_active_if_unreferenced(&mut self, keycode: u32, table: &KeyEntryTable) {
        let referenced = table
            .entries()
            .iter()
            .any(|entry| entry.entry_type == EntryType::Key && entry.keycode == keycode);
        if !referenced {
            self.active.remove(&keycode);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.active.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::entry::{KeyEntry, Scancode};

    fn sc(hex: &str) -> Scancode {
        Scancode::from_hex(hex).unwrap()
    }

    #[test]
    fn test_from_table_ignores_suppressed_entries() {
        let table = KeyEntryTable::new(vec![
            KeyEntry::key(sc("1122"), 5),
            KeyEntry::ignored(sc("3344"), 9),
        ])
        .unwrap();
        let tracker = ActiveKeycodes::from_table(&table);
        assert!(tracker.is_active(5));
        assert!(!tracker.is_active(9));
    }

    #[test]
    fn test_clear_keeps_shared_keycode() {
        let mut table = KeyEntryTable::new(vec![
            KeyEntry::key(sc("1122"), 5),
            KeyEntry::key(sc("3344"), 5),
        ])
        .unwrap();
        let mut tracker = ActiveKeycodes::from_table(&table);

        // First referencing entry goes away; the second still holds the code
        table.replace_at(0, KeyEntry::ignored(sc("1122"), 0));
        tracker.clear_active_if_unreferenced(5, &table);
        assert!(tracker.is_active(5));

        table.replace_at(1, KeyEntry::ignored(sc("3344"), 0));
        tracker.clear_active_if_unreferenced(5, &table);
        assert!(!tracker.is_active(5));
    }
}
