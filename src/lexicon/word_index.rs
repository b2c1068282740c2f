//! Process-wide distinct-word index.
//!
//! Maps every distinct headword to the number of stored entries sharing that
//! exact (case-sensitive) word. The index is a derived cache: it is rebuilt
//! from the entry store at startup and then kept in step by the mutating
//! service operations. There is no transaction tying it to the store, so a
//! crash between a store write and the matching index update leaves the index
//! stale until the next [`WordIndex::rebuild`].
//!
//! Readers take a [`WordSnapshot`], a cheap `Arc` clone of the current map.
//! Writers copy the map on write when a snapshot is still alive, so a scan in
//! progress never observes a partially applied update.

use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, error};
use parking_lot::RwLock;

use crate::error::{LexisError, Result};
use crate::store::EntryStore;

/// Word to entry-count map. Counts are always strictly positive.
pub type WordCounts = AHashMap<String, u32>;

/// Monotonic counter bumped by every index mutation.
pub type IndexVersion = u64;

#[derive(Debug)]
struct IndexState {
    counts: Arc<WordCounts>,
    version: IndexVersion,
}

/// A read-only, point-in-time view of the word index.
#[derive(Debug, Clone)]
pub struct WordSnapshot {
    counts: Arc<WordCounts>,
    version: IndexVersion,
}

impl WordSnapshot {
    /// Number of entries stored for `word`, if any.
    pub fn count(&self, word: &str) -> Option<u32> {
        self.counts.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of stored entries.
    pub fn total_entries(&self) -> u64 {
        self.counts.values().map(|&count| count as u64).sum()
    }

    /// Index version this snapshot was taken at.
    pub fn version(&self) -> IndexVersion {
        self.version
    }

    /// Iterate over `(word, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts
            .iter()
            .map(|(word, &count)| (word.as_str(), count))
    }

    /// The words with the highest counts, ties broken by word.
    pub fn most_frequent(&self, limit: usize) -> Vec<(String, u32)> {
        let mut ranked: Vec<(&str, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(limit)
            .map(|(word, count)| (word.to_string(), count))
            .collect()
    }
}

/// The shared word index.
///
/// Starts uninitialized; every read or incremental write before the first
/// successful [`rebuild`](WordIndex::rebuild) fails with
/// [`LexisError::Uninitialized`].
#[derive(Debug, Default)]
pub struct WordIndex {
    state: RwLock<Option<IndexState>>,
}

fn not_ready() -> LexisError {
    LexisError::uninitialized("the word index has not been built from the entry store yet")
}

fn bump(counts: &mut WordCounts, word: &str) -> u32 {
    let count = counts.entry(word.to_string()).or_insert(0);
    *count = count.saturating_add(1);
    *count
}

fn drop_one(counts: &mut WordCounts, word: &str) -> u32 {
    match counts.get_mut(word) {
        Some(count) if *count > 1 => {
            *count -= 1;
            *count
        }
        _ => {
            counts.remove(word);
            0
        }
    }
}

fn missing_word(word: &str) -> LexisError {
    error!("word index out of sync with entry store: decrement of absent word {word:?}");
    LexisError::consistency(format!(
        "word \"{word}\" is not in the index; a rebuild is required"
    ))
}

impl WordIndex {
    /// Create a new uninitialized index.
    pub fn new() -> Self {
        WordIndex {
            state: RwLock::new(None),
        }
    }

    /// Whether a rebuild has completed.
    pub fn is_initialized(&self) -> bool {
        self.state.read().is_some()
    }

    /// Replace the index contents with the per-word counts of `store`.
    ///
    /// On failure the previous contents (or the uninitialized state) are kept.
    /// Returns the number of distinct words.
    pub fn rebuild(&self, store: &dyn EntryStore) -> Result<usize> {
        let counts = store.word_counts().inspect_err(|e| {
            error!("word index rebuild failed, keeping previous contents: {e}");
        })?;
        self.replace(counts)
    }

    /// Atomically replace the index contents.
    ///
    /// Repeated words are summed; zero counts are dropped.
    pub fn replace<I>(&self, counts: I) -> Result<usize>
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let mut fresh = WordCounts::new();
        for (word, count) in counts {
            if count == 0 {
                continue;
            }
            let slot = fresh.entry(word).or_insert(0);
            *slot = slot.checked_add(count).ok_or_else(|| {
                LexisError::other("word count overflow while rebuilding the index")
            })?;
        }
        let distinct = fresh.len();

        let mut guard = self.state.write();
        let version = guard.as_ref().map_or(0, |state| state.version) + 1;
        *guard = Some(IndexState {
            counts: Arc::new(fresh),
            version,
        });
        drop(guard);

        debug!("word index rebuilt: {distinct} distinct words (version {version})");
        Ok(distinct)
    }

    /// Add one entry for `word`, inserting it at count 1 if absent.
    ///
    /// Returns the new count.
    pub fn increment(&self, word: &str) -> Result<u32> {
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or_else(not_ready)?;
        let count = bump(Arc::make_mut(&mut state.counts), word);
        state.version += 1;
        Ok(count)
    }

    /// Remove one entry for `word`, dropping the word when none remain.
    ///
    /// Returns the remaining count (0 when the word was removed). A word that
    /// is not in the index is a consistency fault: it is logged and reported,
    /// and the index is left unchanged.
    pub fn decrement(&self, word: &str) -> Result<u32> {
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or_else(not_ready)?;
        if !state.counts.contains_key(word) {
            return Err(missing_word(word));
        }
        let remaining = drop_one(Arc::make_mut(&mut state.counts), word);
        state.version += 1;
        Ok(remaining)
    }

    /// Move one entry from `old_word` to `new_word` in a single critical section.
    ///
    /// `new_word` is incremented even when `old_word` is missing; the missing
    /// word is still reported as a consistency fault.
    pub fn rename(&self, old_word: &str, new_word: &str) -> Result<()> {
        if old_word == new_word {
            return Ok(());
        }

        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or_else(not_ready)?;
        let had_old = state.counts.contains_key(old_word);

        let counts = Arc::make_mut(&mut state.counts);
        bump(counts, new_word);
        if had_old {
            drop_one(counts, old_word);
        }
        state.version += 1;

        if had_old {
            Ok(())
        } else {
            Err(missing_word(old_word))
        }
    }

    /// Take a point-in-time view of all words and counts.
    pub fn snapshot(&self) -> Result<WordSnapshot> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or_else(not_ready)?;
        Ok(WordSnapshot {
            counts: Arc::clone(&state.counts),
            version: state.version,
        })
    }

    /// Number of entries for `word`, if any.
    pub fn count(&self, word: &str) -> Result<Option<u32>> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or_else(not_ready)?;
        Ok(state.counts.get(word).copied())
    }

    /// Number of distinct words.
    pub fn len(&self) -> Result<usize> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or_else(not_ready)?;
        Ok(state.counts.len())
    }

    /// Current index version, if initialized.
    pub fn version(&self) -> Option<IndexVersion> {
        self.state.read().as_ref().map(|state| state.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, EntryFilter, NewEntry, Page, PageRequest};
    use crate::store::memory::MemoryEntryStore;
    use std::thread;

    #[derive(Debug)]
    struct UnavailableStore;

    impl EntryStore for UnavailableStore {
        fn insert(&self, _entry: NewEntry) -> Result<Entry> {
            Err(LexisError::storage("connection refused"))
        }
        fn get(&self, _id: u64) -> Result<Option<Entry>> {
            Err(LexisError::storage("connection refused"))
        }
        fn find(&self, _filter: &EntryFilter, _request: PageRequest) -> Result<Page<Entry>> {
            Err(LexisError::storage("connection refused"))
        }
        fn find_all(&self, _filter: &EntryFilter) -> Result<Vec<Entry>> {
            Err(LexisError::storage("connection refused"))
        }
        fn update(&self, _entry: Entry) -> Result<Entry> {
            Err(LexisError::storage("connection refused"))
        }
        fn delete(&self, _id: u64) -> Result<Entry> {
            Err(LexisError::storage("connection refused"))
        }
        fn word_counts(&self) -> Result<Vec<(String, u32)>> {
            Err(LexisError::storage("connection refused"))
        }
    }

    fn index_with(counts: &[(&str, u32)]) -> WordIndex {
        let index = WordIndex::new();
        index
            .replace(counts.iter().map(|(w, c)| (w.to_string(), *c)))
            .unwrap();
        index
    }

    #[test]
    fn test_uninitialized_index_fails_fast() {
        let index = WordIndex::new();
        assert!(!index.is_initialized());
        assert!(matches!(index.snapshot(), Err(LexisError::Uninitialized(_))));
        assert!(matches!(index.increment("cat"), Err(LexisError::Uninitialized(_))));
        assert!(matches!(index.decrement("cat"), Err(LexisError::Uninitialized(_))));
        assert!(matches!(index.len(), Err(LexisError::Uninitialized(_))));
        assert_eq!(index.version(), None);
    }

    #[test]
    fn test_empty_rebuild_is_initialized() {
        let index = WordIndex::new();
        assert_eq!(index.rebuild(&MemoryEntryStore::new()).unwrap(), 0);
        assert!(index.is_initialized());
        assert!(index.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_increment_and_decrement() {
        let index = index_with(&[]);

        assert_eq!(index.increment("cat").unwrap(), 1);
        assert_eq!(index.increment("cat").unwrap(), 2);
        assert_eq!(index.increment("Cat").unwrap(), 1);
        assert_eq!(index.count("cat").unwrap(), Some(2));

        assert_eq!(index.decrement("cat").unwrap(), 1);
        assert_eq!(index.decrement("cat").unwrap(), 0);
        // Absence, never a stored zero
        assert_eq!(index.count("cat").unwrap(), None);
        assert!(!index.snapshot().unwrap().contains("cat"));
        assert_eq!(index.len().unwrap(), 1);
    }

    #[test]
    fn test_decrement_absent_is_consistency_fault() {
        let index = index_with(&[("dog", 1)]);
        let before = index.version();

        let err = index.decrement("cat").unwrap_err();
        assert!(matches!(err, LexisError::Consistency(_)));
        assert_eq!(index.version(), before);
        assert_eq!(index.count("dog").unwrap(), Some(1));
    }

    #[test]
    fn test_rename_moves_one_entry() {
        let index = index_with(&[("colour", 2)]);

        index.rename("colour", "color").unwrap();
        assert_eq!(index.count("colour").unwrap(), Some(1));
        assert_eq!(index.count("color").unwrap(), Some(1));

        index.rename("colour", "color").unwrap();
        assert_eq!(index.count("colour").unwrap(), None);
        assert_eq!(index.count("color").unwrap(), Some(2));

        // Same word is a no-op
        let version = index.version();
        index.rename("color", "color").unwrap();
        assert_eq!(index.version(), version);
    }

    #[test]
    fn test_rename_from_absent_word_still_counts_new_word() {
        let index = index_with(&[]);
        let err = index.rename("ghost", "spirit").unwrap_err();
        assert!(matches!(err, LexisError::Consistency(_)));
        assert_eq!(index.count("spirit").unwrap(), Some(1));
    }

    #[test]
    fn test_rebuild_from_store() {
        let store = MemoryEntryStore::new();
        store.insert(NewEntry::new("cat", "n.", "A feline")).unwrap();
        store.insert(NewEntry::new("cat", "v.", "To vomit")).unwrap();
        store.insert(NewEntry::new("card", "n.", "Stiff paper")).unwrap();

        let index = WordIndex::new();
        assert_eq!(index.rebuild(&store).unwrap(), 2);
        let first: Vec<(String, u32)> = index.snapshot().unwrap().most_frequent(10);

        // Idempotent with no intervening store mutation
        index.rebuild(&store).unwrap();
        let second: Vec<(String, u32)> = index.snapshot().unwrap().most_frequent(10);
        assert_eq!(first, second);
        assert_eq!(first, vec![("cat".to_string(), 2), ("card".to_string(), 1)]);
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_state() {
        let index = WordIndex::new();
        assert!(matches!(
            index.rebuild(&UnavailableStore),
            Err(LexisError::Storage(_))
        ));
        assert!(!index.is_initialized());

        let index = index_with(&[("cat", 3)]);
        assert!(index.rebuild(&UnavailableStore).is_err());
        assert_eq!(index.count("cat").unwrap(), Some(3));
    }

    #[test]
    fn test_replace_sums_duplicates_and_drops_zero() {
        let index = index_with(&[("cat", 1), ("cat", 2), ("dog", 0)]);
        assert_eq!(index.count("cat").unwrap(), Some(3));
        assert_eq!(index.count("dog").unwrap(), None);

        let overflow = WordIndex::new();
        let result = overflow.replace(vec![("x".to_string(), u32::MAX), ("x".to_string(), 1)]);
        assert!(result.is_err());
        assert!(!overflow.is_initialized());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let index = index_with(&[("cat", 1)]);
        let snapshot = index.snapshot().unwrap();

        index.increment("cat").unwrap();
        index.increment("dog").unwrap();
        index.decrement("cat").unwrap();
        index.decrement("cat").unwrap();

        assert_eq!(snapshot.count("cat"), Some(1));
        assert!(!snapshot.contains("dog"));
        assert_eq!(snapshot.len(), 1);
        assert!(index.snapshot().unwrap().version() > snapshot.version());
    }

    #[test]
    fn test_concurrent_mutations_balance() {
        let index = index_with(&[("base", 1)]);
        let words = ["alpha", "beta", "gamma", "delta"];

        thread::scope(|scope| {
            for t in 0..8 {
                let index = &index;
                scope.spawn(move || {
                    let word = words[t % words.len()];
                    for _ in 0..500 {
                        index.increment(word).unwrap();
                    }
                    for _ in 0..250 {
                        index.decrement(word).unwrap();
                    }
                    for _ in 0..100 {
                        index.rename(word, "base").unwrap();
                        index.rename("base", word).unwrap();
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..200 {
                    let snapshot = index.snapshot().unwrap();
                    assert!(snapshot.iter().all(|(_, count)| count > 0));
                }
            });
        });

        let snapshot = index.snapshot().unwrap();
        for word in words {
            assert_eq!(snapshot.count(word), Some(500));
        }
        assert_eq!(snapshot.count("base"), Some(1));
        assert_eq!(snapshot.total_entries(), 2001);
    }
}
