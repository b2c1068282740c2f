//! In-memory entry store with optional JSON file persistence.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use chrono::Utc;
use parking_lot::RwLock;

use crate::entry::{Entry, EntryFilter, NewEntry, Page, PageRequest};
use crate::error::{LexisError, Result};
use crate::store::EntryStore;

/// An in-memory entry store.
///
/// Entries are kept in id order. Ids are never reused within one store
/// instance, including after a reload from file.
#[derive(Debug)]
pub struct MemoryEntryStore {
    entries: RwLock<BTreeMap<u64, Entry>>,
    next_id: AtomicU64,
}

impl MemoryEntryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        MemoryEntryStore {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a store holding the given entries as-is.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let max_id = entries.iter().map(|entry| entry.id).max().unwrap_or(0);
        let entries = entries.into_iter().map(|entry| (entry.id, entry)).collect();
        MemoryEntryStore {
            entries: RwLock::new(entries),
            next_id: AtomicU64::new(max_id + 1),
        }
    }

    /// Load a store from a JSON array of entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let entries: Vec<Entry> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_entries(entries))
    }

    /// Load a store from `path`, or start empty if the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Write every entry, in id order, as a JSON array.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let entries: Vec<Entry> = self.entries.read().values().cloned().collect();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &entries)?;
        writer.flush()?;
        Ok(())
    }

    fn matching(&self, filter: &EntryFilter) -> Vec<Entry> {
        let guard = self.entries.read();
        let mut found: Vec<Entry> = guard
            .values()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        drop(guard);

        if filter.order_by_word {
            // Ids already ascending, so a stable sort keeps them as the tie-break.
            found.sort_by(|a, b| a.word.cmp(&b.word));
        }
        found
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryEntryStore {
    fn insert(&self, entry: NewEntry) -> Result<Entry> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let stored = Entry {
            id,
            word: entry.word,
            word_type: entry.word_type,
            definition: entry.definition,
            created_at: now,
            updated_at: now,
        };
        self.entries.write().insert(id, stored.clone());
        Ok(stored)
    }

    fn get(&self, id: u64) -> Result<Option<Entry>> {
        Ok(self.entries.read().get(&id).cloned())
    }

    fn exists(&self, id: u64) -> Result<bool> {
        Ok(self.entries.read().contains_key(&id))
    }

    fn find(&self, filter: &EntryFilter, request: PageRequest) -> Result<Page<Entry>> {
        Ok(Page::from_all(self.matching(filter), request))
    }

    fn find_all(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        Ok(self.matching(filter))
    }

    fn update(&self, mut entry: Entry) -> Result<Entry> {
        let mut guard = self.entries.write();
        let previous = guard.get(&entry.id).cloned().ok_or_else(|| {
            LexisError::not_found(format!("Entry not found with id \"{}\"", entry.id))
        })?;
        entry.created_at = previous.created_at;
        entry.updated_at = Utc::now();
        guard.insert(entry.id, entry);
        Ok(previous)
    }

    fn delete(&self, id: u64) -> Result<Entry> {
        self.entries
            .write()
            .remove(&id)
            .ok_or_else(|| LexisError::not_found(format!("Entry not found with id \"{id}\"")))
    }

    fn word_counts(&self) -> Result<Vec<(String, u32)>> {
        let guard = self.entries.read();
        let mut counts: AHashMap<&str, u32> = AHashMap::new();
        for entry in guard.values() {
            *counts.entry(entry.word.as_str()).or_insert(0) += 1;
        }

        let mut result: Vec<(String, u32)> = counts
            .into_iter()
            .map(|(word, count)| (word.to_string(), count))
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(result)
    }

    fn entry_count(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn seeded() -> MemoryEntryStore {
        let store = MemoryEntryStore::new();
        store.insert(NewEntry::new("cat", "n.", "A small feline")).unwrap();
        store.insert(NewEntry::new("Apple", "n.", "A fruit")).unwrap();
        store.insert(NewEntry::new("cat", "v.", "To vomit")).unwrap();
        store
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = seeded();
        let ids: Vec<u64> = store
            .find_all(&EntryFilter::all())
            .unwrap()
            .iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(store.exists(2).unwrap());
        assert!(!store.exists(4).unwrap());
    }

    #[test]
    fn test_word_counts_group_by_exact_word() {
        let store = seeded();
        store.insert(NewEntry::new("Cat", "n.", "Capitalised")).unwrap();

        let counts = store.word_counts().unwrap();
        assert_eq!(
            counts,
            vec![
                ("Apple".to_string(), 1),
                ("Cat".to_string(), 1),
                ("cat".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_update_returns_previous_version() {
        let store = seeded();
        let mut entry = store.get(1).unwrap().unwrap();
        entry.word = "dog".to_string();

        let previous = store.update(entry).unwrap();
        assert_eq!(previous.word, "cat");
        assert_eq!(store.get(1).unwrap().unwrap().word, "dog");

        let mut missing = previous.clone();
        missing.id = 99;
        assert!(store.update(missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_returns_removed_entry() {
        let store = seeded();
        let removed = store.delete(3).unwrap();
        assert_eq!(removed.word_type, "v.");
        assert_eq!(store.entry_count().unwrap(), 2);

        let err = store.delete(3).unwrap_err();
        assert_eq!(err.to_string(), "Entry not found with id \"3\"");
    }

    #[test]
    fn test_find_ordered_and_paged() {
        let store = seeded();
        let filter = EntryFilter::all().ordered_by_word();

        let page = store.find(&filter, PageRequest::new(0, 2)).unwrap();
        let words: Vec<&str> = page.content.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["Apple", "cat"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.content[1].id, 1);
    }

    #[test]
    fn test_save_and_load() {
        let store = seeded();
        let temp_file = NamedTempFile::new().unwrap();
        store.save(temp_file.path()).unwrap();

        let loaded = MemoryEntryStore::load(temp_file.path()).unwrap();
        assert_eq!(loaded.entry_count().unwrap(), 3);
        assert_eq!(loaded.word_counts().unwrap(), store.word_counts().unwrap());

        // Ids continue after the highest loaded id.
        let next = loaded.insert(NewEntry::new("dog", "n.", "A canine")).unwrap();
        assert_eq!(next.id, 4);
    }
}
