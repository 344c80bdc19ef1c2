//! Volatile in-process entry store.
//!
//! Entries live only as long as the store value. Used for tests and for
//! the explicitly degraded `backend = "memory"` mode.

use super::{EntryStore, StoreResult};
use crate::model::entry::{Entry, EntryId, NewEntry};
use chrono::{DateTime, Utc};
use std::cell::RefCell;

#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: RefCell<Vec<Entry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn next_id(&self) -> EntryId {
        self.entries.borrow().last().map_or(1, |entry| entry.id + 1)
    }
}

impl EntryStore for MemoryEntryStore {
    fn insert(&self, entry: &NewEntry, created_at: DateTime<Utc>) -> StoreResult<Entry> {
        let stored = entry.clone().into_entry(self.next_id(), created_at);
        self.entries.borrow_mut().push(stored.clone());
        Ok(stored)
    }

    fn list_newest_first(&self) -> StoreResult<Vec<Entry>> {
        let mut entries = self.entries.borrow().clone();
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEntryStore;
    use crate::model::entry::NewEntry;
    use crate::store::EntryStore;
    use chrono::{TimeZone, Utc};

    #[test]
    fn assigns_increasing_ids_starting_at_one() {
        let store = MemoryEntryStore::new();
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let first = store.insert(&NewEntry::new("a", 1).unwrap(), at).unwrap();
        let second = store.insert(&NewEntry::new("b", 2).unwrap(), at).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn equal_timestamps_list_later_insert_first() {
        let store = MemoryEntryStore::new();
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        store.insert(&NewEntry::new("a", 1).unwrap(), at).unwrap();
        store.insert(&NewEntry::new("b", 2).unwrap(), at).unwrap();

        let listed = store.list_newest_first().unwrap();
        assert_eq!(listed[0].task, "b");
        assert_eq!(listed[1].task, "a");
    }
}
