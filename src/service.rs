//! Dictionary service: entry CRUD kept in step with the lexicon.
//!
//! Every mutating operation writes to the [`EntryStore`] first and, once the
//! write succeeded, reports the change to the [`Lexicon`] in the same call.
//! Mutations are serialized by a service-wide write lock, so the lexicon sees
//! word changes in the order the store applied them. Reads never take it.
//! Consistency between the two is best effort: a fault on the lexicon side is
//! logged and left for the next [`DictionaryService::rebuild_index`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lexis::config::ServiceConfig;
//! use lexis::entry::NewEntry;
//! use lexis::service::{DictionaryService, LookupOutcome};
//! use lexis::store::memory::MemoryEntryStore;
//!
//! # fn main() -> lexis::error::Result<()> {
//! let service = DictionaryService::new(Arc::new(MemoryEntryStore::new()), ServiceConfig::default());
//! service.initialize()?;
//! service.add_entry(NewEntry::new("Spring", "n.", "The season after winter"))?;
//!
//! match service.lookup_word("Sprnig", 0)? {
//!     LookupOutcome::NotFoundFallback { suggestions, .. } => assert_eq!(suggestions, vec!["Spring"]),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::entry::{
    Entry, EntryFilter, MAX_TYPE_LENGTH, MAX_WORD_LENGTH, NewEntry, Page, PageRequest,
};
use crate::error::{LexisError, Result};
use crate::lexicon::{Lexicon, WordSuggestion};
use crate::store::EntryStore;

/// Number of top words reported by [`DictionaryService::stats`].
const TOP_WORDS: usize = 10;

/// Result of an exact word lookup with fuzzy fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Entries with exactly this word exist.
    Found(Page<Entry>),
    /// No entries for the word, but similar words are known.
    NotFoundFallback {
        query: String,
        suggestions: Vec<String>,
    },
    /// No entries for the word and nothing similar.
    NotFoundNoSuggestions { query: String },
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }
}

/// Aggregate figures about the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryStats {
    pub distinct_words: usize,
    pub total_entries: u64,
    pub top_words: Vec<(String, u32)>,
}

fn validate_fields(word: &str, word_type: &str, definition: &str) -> Result<()> {
    if word.trim().is_empty() || word_type.trim().is_empty() || definition.trim().is_empty() {
        return Err(LexisError::bad_resource(
            "Entry has empty word, type or definition",
        ));
    }
    if word.chars().count() > MAX_WORD_LENGTH {
        return Err(LexisError::bad_resource(format!(
            "Entry word must be at most {MAX_WORD_LENGTH} characters"
        )));
    }
    if word_type.chars().count() > MAX_TYPE_LENGTH {
        return Err(LexisError::bad_resource(format!(
            "Entry type must be at most {MAX_TYPE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn entry_not_found(id: u64) -> LexisError {
    LexisError::not_found(format!("Entry not found with id \"{id}\""))
}

/// CRUD over dictionary entries plus suggestion and fallback search.
#[derive(Debug)]
pub struct DictionaryService {
    store: Arc<dyn EntryStore>,
    lexicon: Lexicon,
    config: ServiceConfig,
    /// Held across each store write and its lexicon update.
    write_lock: Mutex<()>,
}

impl DictionaryService {
    /// Create a service whose lexicon is not built yet; call
    /// [`initialize`](Self::initialize) before serving requests.
    pub fn new(store: Arc<dyn EntryStore>, config: ServiceConfig) -> Self {
        DictionaryService {
            store,
            lexicon: Lexicon::new(),
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Build the lexicon from the store. Returns the number of distinct words.
    pub fn initialize(&self) -> Result<usize> {
        let _guard = self.write_lock.lock();
        self.lexicon.initialize(self.store.as_ref())
    }

    /// Resynchronize the lexicon with the store.
    pub fn rebuild_index(&self) -> Result<usize> {
        let _guard = self.write_lock.lock();
        self.lexicon.initialize(self.store.as_ref())
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn store(&self) -> &Arc<dyn EntryStore> {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn page(&self, page: usize) -> PageRequest {
        PageRequest::new(page, self.config.entries_per_page)
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.lexicon.index().is_initialized() {
            Ok(())
        } else {
            Err(LexisError::uninitialized(
                "dictionary service is starting up; entries cannot be modified yet",
            ))
        }
    }

    /// Lexicon faults after a successful store write are reported, not returned.
    fn report_index_fault<T>(&self, operation: &str, result: Result<T>) {
        if let Err(e) = result {
            warn!("{operation}: entry stored but word index not updated: {e}");
        }
    }

    pub fn find_by_id(&self, id: u64) -> Result<Entry> {
        self.store.get(id)?.ok_or_else(|| entry_not_found(id))
    }

    /// Validate and store a new entry.
    pub fn add_entry(&self, entry: NewEntry) -> Result<Entry> {
        validate_fields(&entry.word, &entry.word_type, &entry.definition)?;
        self.ensure_ready()?;

        let _guard = self.write_lock.lock();
        let same_word = self
            .store
            .find_all(&EntryFilter::all().with_word(entry.word.as_str()))?;
        if same_word.iter().any(|stored| stored.same_content(&entry)) {
            return Err(LexisError::already_exists(format!(
                "Entry for word \"{}\" with specified definition already exists",
                entry.word
            )));
        }

        let stored = self.store.insert(entry)?;
        self.report_index_fault("add_entry", self.lexicon.on_entry_created(&stored.word));
        debug!("stored entry {} for word {:?}", stored.id, stored.word);
        Ok(stored)
    }

    /// Replace an existing entry's word, type and definition.
    pub fn update_entry(&self, entry: Entry) -> Result<()> {
        validate_fields(&entry.word, &entry.word_type, &entry.definition)?;
        self.ensure_ready()?;

        let _guard = self.write_lock.lock();
        let new_word = entry.word.clone();
        let previous = self.store.update(entry)?;
        if previous.word != new_word {
            self.report_index_fault(
                "update_entry",
                self.lexicon.on_entry_word_changed(&previous.word, &new_word),
            );
        }
        Ok(())
    }

    /// Replace only the definition of an existing entry.
    pub fn update_definition(&self, id: u64, definition: &str) -> Result<()> {
        if definition.trim().is_empty() {
            return Err(LexisError::bad_resource("Definition is empty"));
        }
        self.ensure_ready()?;

        let _guard = self.write_lock.lock();
        let mut entry = self.find_by_id(id)?;
        entry.definition = definition.to_string();
        let word = entry.word.clone();

        // The store may still be written by other handles.
        let previous = self.store.update(entry)?;
        if previous.word != word {
            self.report_index_fault(
                "update_definition",
                self.lexicon.on_entry_word_changed(&previous.word, &word),
            );
        }
        Ok(())
    }

    /// Delete an entry.
    pub fn delete_by_id(&self, id: u64) -> Result<()> {
        self.ensure_ready()?;
        let _guard = self.write_lock.lock();
        let removed = self.store.delete(id)?;
        self.report_index_fault("delete_by_id", self.lexicon.on_entry_deleted(&removed.word));
        debug!("deleted entry {id} for word {:?}", removed.word);
        Ok(())
    }

    /// All entries, ordered by word.
    pub fn find_all(&self, page: usize) -> Result<Page<Entry>> {
        self.store
            .find(&EntryFilter::all().ordered_by_word(), self.page(page))
    }

    /// Entries whose word starts with `letter`, ordered by word.
    pub fn find_by_letter(&self, letter: char, page: usize) -> Result<Page<Entry>> {
        self.store.find(
            &EntryFilter::all().with_letter(letter).ordered_by_word(),
            self.page(page),
        )
    }

    /// Entries with exactly this word (ignoring case).
    pub fn find_by_word(&self, word: &str, page: usize) -> Result<Page<Entry>> {
        let found = self
            .store
            .find(&EntryFilter::all().with_word(word), self.page(page))?;
        if found.total_elements == 0 {
            return Err(LexisError::not_found(format!(
                "Entries not found with word \"{word}\""
            )));
        }
        Ok(found)
    }

    /// Entries of one word type, ordered by word.
    pub fn find_by_type(&self, word_type: &str, page: usize) -> Result<Page<Entry>> {
        let found = self.store.find(
            &EntryFilter::all().with_type(word_type).ordered_by_word(),
            self.page(page),
        )?;
        if found.is_empty() {
            return Err(LexisError::not_found(format!(
                "Entries not found with type \"{word_type}\""
            )));
        }
        Ok(found)
    }

    /// Entries with this word and word type.
    pub fn find_by_word_and_type(
        &self,
        word: &str,
        word_type: &str,
        page: usize,
    ) -> Result<Page<Entry>> {
        let found = self.store.find(
            &EntryFilter::all()
                .with_word(word)
                .with_type(word_type)
                .ordered_by_word(),
            self.page(page),
        )?;
        if found.is_empty() {
            return Err(LexisError::not_found(format!(
                "Entries not found with word \"{word}\" and type \"{word_type}\""
            )));
        }
        Ok(found)
    }

    /// Exact lookup, falling back to similar words when the word is unknown.
    pub fn lookup_word(&self, word: &str, page: usize) -> Result<LookupOutcome> {
        match self.find_by_word(word, page) {
            Ok(found) => Ok(LookupOutcome::Found(found)),
            Err(LexisError::NotFound(message)) => {
                debug!("{message}; trying fuzzy fallback");
                match self.lexicon.fuzzy_find(word) {
                    Ok(suggestions) => Ok(LookupOutcome::NotFoundFallback {
                        query: word.to_string(),
                        suggestions,
                    }),
                    Err(LexisError::NoSimilarWord { query }) => {
                        Ok(LookupOutcome::NotFoundNoSuggestions { query })
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Autocomplete words for `prefix`.
    pub fn suggest(&self, prefix: &str) -> Result<Vec<String>> {
        self.lexicon.suggest(prefix)
    }

    /// Autocomplete words for `prefix`, with entry counts.
    pub fn suggest_ranked(&self, prefix: &str) -> Result<Vec<WordSuggestion>> {
        self.lexicon.suggestion_engine().suggest_ranked(prefix)
    }

    /// Words similar to `query`; `NoSimilarWord` when there are none.
    pub fn fuzzy_find(&self, query: &str) -> Result<Vec<String>> {
        self.lexicon.fuzzy_find(query)
    }

    pub fn stats(&self) -> Result<DictionaryStats> {
        let snapshot = self.lexicon.index().snapshot()?;
        Ok(DictionaryStats {
            distinct_words: snapshot.len(),
            total_entries: snapshot.total_entries(),
            top_words: snapshot.most_frequent(TOP_WORDS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryEntryStore;

    fn service() -> DictionaryService {
        let service =
            DictionaryService::new(Arc::new(MemoryEntryStore::new()), ServiceConfig::default());
        service.initialize().unwrap();
        service
    }

    #[test]
    fn test_add_entry_validation() {
        let service = service();

        let err = service
            .add_entry(NewEntry::new("", "n.", "Nothing"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Entry has empty word, type or definition");

        let err = service
            .add_entry(NewEntry::new("word", "n.", "   "))
            .unwrap_err();
        assert!(matches!(err, LexisError::BadResource(_)));

        let err = service
            .add_entry(NewEntry::new("a".repeat(26), "n.", "Too long"))
            .unwrap_err();
        assert!(matches!(err, LexisError::BadResource(_)));

        assert!(service.lexicon().index().snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let service = service();
        service
            .add_entry(NewEntry::new("TestEntry", "test.", "Test definition"))
            .unwrap();

        let err = service
            .add_entry(NewEntry::new("TestEntry", "test.", "Test definition"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entry for word \"TestEntry\" with specified definition already exists"
        );
        assert_eq!(err.status_code(), 409);

        // Same word, different definition is a new sense
        service
            .add_entry(NewEntry::new("TestEntry", "test.", "Another definition"))
            .unwrap();
        assert_eq!(service.lexicon().index().count("TestEntry").unwrap(), Some(2));
    }

    #[test]
    fn test_mutations_before_initialize_are_rejected() {
        let store = Arc::new(MemoryEntryStore::new());
        let service = DictionaryService::new(store.clone(), ServiceConfig::default());

        let err = service
            .add_entry(NewEntry::new("cat", "n.", "A feline"))
            .unwrap_err();
        assert!(matches!(err, LexisError::Uninitialized(_)));
        assert_eq!(err.status_code(), 503);
        assert_eq!(store.entry_count().unwrap(), 0);
        assert!(matches!(service.suggest("c"), Err(LexisError::Uninitialized(_))));
    }

    #[test]
    fn test_missing_entry_messages() {
        let service = service();
        let id = 1234567;

        let expected = "Entry not found with id \"1234567\"";
        assert_eq!(service.find_by_id(id).unwrap_err().to_string(), expected);
        assert_eq!(service.delete_by_id(id).unwrap_err().to_string(), expected);
        assert_eq!(
            service.update_definition(id, "Test definition").unwrap_err().to_string(),
            expected
        );

        assert_eq!(
            service.find_by_word("TestEntry", 0).unwrap_err().to_string(),
            "Entries not found with word \"TestEntry\""
        );
        assert_eq!(
            service.find_by_type("test.", 0).unwrap_err().to_string(),
            "Entries not found with type \"test.\""
        );
        assert_eq!(
            service
                .find_by_word_and_type("TestEntry", "test.", 0)
                .unwrap_err()
                .to_string(),
            "Entries not found with word \"TestEntry\" and type \"test.\""
        );
    }

    #[test]
    fn test_update_definition_keeps_index() {
        let service = service();
        let stored = service
            .add_entry(NewEntry::new("cat", "n.", "A feline"))
            .unwrap();
        let version = service.lexicon().index().version();

        let err = service.update_definition(stored.id, "").unwrap_err();
        assert_eq!(err.to_string(), "Definition is empty");

        service.update_definition(stored.id, "A small feline").unwrap();
        assert_eq!(
            service.find_by_id(stored.id).unwrap().definition,
            "A small feline"
        );
        assert_eq!(service.lexicon().index().version(), version);
    }

    #[test]
    fn test_update_entry_moves_word_count() {
        let service = service();
        let stored = service
            .add_entry(NewEntry::new("colour", "n.", "Hue"))
            .unwrap();

        let mut changed = stored.clone();
        changed.word = "color".to_string();
        service.update_entry(changed).unwrap();

        let index = service.lexicon().index();
        assert_eq!(index.count("colour").unwrap(), None);
        assert_eq!(index.count("color").unwrap(), Some(1));

        let mut missing = stored;
        missing.id = 99;
        assert!(service.update_entry(missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_lookup_outcomes() {
        let service = service();
        service
            .add_entry(NewEntry::new("Spring", "n.", "The season after winter"))
            .unwrap();

        match service.lookup_word("spring", 0).unwrap() {
            LookupOutcome::Found(page) => assert_eq!(page.content[0].word, "Spring"),
            other => panic!("expected Found, got {other:?}"),
        }

        // Past the last page is still a hit, not a fallback
        assert!(service.lookup_word("Spring", 5).unwrap().is_found());

        assert_eq!(
            service.lookup_word("Sprnig", 0).unwrap(),
            LookupOutcome::NotFoundFallback {
                query: "Sprnig".to_string(),
                suggestions: vec!["Spring".to_string()],
            }
        );

        assert_eq!(
            service.lookup_word("zzzzqq", 0).unwrap(),
            LookupOutcome::NotFoundNoSuggestions {
                query: "zzzzqq".to_string(),
            }
        );
    }

    #[test]
    fn test_lookup_outcome_serialization() {
        let outcome = LookupOutcome::NotFoundFallback {
            query: "Sprnig".to_string(),
            suggestions: vec!["Spring".to_string()],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "not_found_fallback");
        assert_eq!(json["suggestions"][0], "Spring");
    }

    #[test]
    fn test_listing_and_stats() {
        let service = service();
        for (word, word_type) in [("banana", "n."), ("Apple", "n."), ("apply", "v."), ("apple", "v.")] {
            service
                .add_entry(NewEntry::new(word, word_type, format!("{word} {word_type}")))
                .unwrap();
        }

        let all = service.find_all(0).unwrap();
        let words: Vec<&str> = all.content.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["Apple", "apple", "apply", "banana"]);

        assert_eq!(service.find_by_letter('A', 0).unwrap().total_elements, 3);
        assert_eq!(service.find_by_type("V.", 0).unwrap().total_elements, 2);
        assert_eq!(
            service.find_by_word_and_type("APPLE", "n.", 0).unwrap().content[0].word,
            "Apple"
        );

        let stats = service.stats().unwrap();
        assert_eq!(stats.distinct_words, 4);
        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.top_words[0], ("Apple".to_string(), 1));
    }
}
