//! Durable entry store interface.
//!
//! The word index and the dictionary service only talk to persistence through
//! the [`EntryStore`] trait, so a relational backend can be swapped in without
//! touching higher-level code. [`memory::MemoryEntryStore`] is the bundled
//! backend, used by the CLI (with JSON file persistence) and by tests.
//!
//! # Example
//!
//! ```
//! use lexis::entry::{EntryFilter, NewEntry};
//! use lexis::store::EntryStore;
//! use lexis::store::memory::MemoryEntryStore;
//!
//! # fn main() -> lexis::error::Result<()> {
//! let store = MemoryEntryStore::new();
//! store.insert(NewEntry::new("Spring", "n.", "The season after winter"))?;
//! store.insert(NewEntry::new("Spring", "v.", "To leap"))?;
//!
//! assert_eq!(store.word_counts()?, vec![("Spring".to_string(), 2)]);
//! assert_eq!(store.find_all(&EntryFilter::all().with_word("spring"))?.len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::entry::{Entry, EntryFilter, NewEntry, Page, PageRequest};
use crate::error::Result;

pub mod memory;

/// CRUD and bulk-read operations over stored entries.
///
/// Implementations must be safe to share between request-handling threads.
pub trait EntryStore: Send + Sync + std::fmt::Debug {
    /// Store a new entry and return it with its assigned id.
    fn insert(&self, entry: NewEntry) -> Result<Entry>;

    /// Fetch one entry by id.
    fn get(&self, id: u64) -> Result<Option<Entry>>;

    /// Check whether an entry with the given id exists.
    fn exists(&self, id: u64) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Fetch one page of entries matching `filter`.
    fn find(&self, filter: &EntryFilter, request: PageRequest) -> Result<Page<Entry>>;

    /// Fetch every entry matching `filter`.
    fn find_all(&self, filter: &EntryFilter) -> Result<Vec<Entry>>;

    /// Replace a stored entry, returning the version it replaced.
    ///
    /// Fails with a not-found error if no entry has `entry.id`.
    fn update(&self, entry: Entry) -> Result<Entry>;

    /// Remove an entry, returning what was removed.
    ///
    /// Fails with a not-found error if no entry has `id`.
    fn delete(&self, id: u64) -> Result<Entry>;

    /// Number of stored entries per distinct (case-sensitive) word.
    fn word_counts(&self) -> Result<Vec<(String, u32)>>;

    /// Total number of stored entries.
    fn entry_count(&self) -> Result<usize> {
        Ok(self.find_all(&EntryFilter::all())?.len())
    }
}
