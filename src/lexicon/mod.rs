//! In-memory vocabulary and approximate-match search.
//!
//! [`Lexicon`] is the component the CRUD layer talks to. It owns the
//! [`WordIndex`] and exposes:
//!
//! - change hooks (`on_entry_created`, `on_entry_word_changed`,
//!   `on_entry_deleted`) to be called right after the matching store write
//!   succeeds,
//! - [`Lexicon::suggest`] for prefix autocomplete,
//! - [`Lexicon::fuzzy_find`] for the fallback after an exact lookup missed.
//!
//! The index only reflects the store after the initiating mutation has
//! completed; it is not transactional with the store.

pub mod fuzzy;
pub mod similarity;
pub mod suggest;
pub mod word_index;

pub use fuzzy::{FUZZY_LIMIT, FUZZY_THRESHOLD, FuzzyEngine, FuzzyMatch};
pub use similarity::{SimilarityScorer, score};
pub use suggest::{SUGGESTION_LIMIT, SuggestionEngine, WordSuggestion};
pub use word_index::{WordIndex, WordSnapshot};

use log::info;

use crate::error::Result;
use crate::store::EntryStore;

/// The word index together with the engines that read it.
#[derive(Debug, Default)]
pub struct Lexicon {
    index: WordIndex,
}

impl Lexicon {
    /// Create a lexicon with an uninitialized index.
    pub fn new() -> Self {
        Lexicon {
            index: WordIndex::new(),
        }
    }

    /// Build (or rebuild) the index from the store's per-word counts.
    pub fn initialize(&self, store: &dyn EntryStore) -> Result<usize> {
        let distinct = self.index.rebuild(store)?;
        info!("lexicon initialized with {distinct} distinct words");
        Ok(distinct)
    }

    pub fn index(&self) -> &WordIndex {
        &self.index
    }

    /// A new entry for `word` was stored.
    pub fn on_entry_created(&self, word: &str) -> Result<u32> {
        self.index.increment(word)
    }

    /// A stored entry's word changed from `old_word` to `new_word`.
    pub fn on_entry_word_changed(&self, old_word: &str, new_word: &str) -> Result<()> {
        self.index.rename(old_word, new_word)
    }

    /// A stored entry for `word` was deleted.
    pub fn on_entry_deleted(&self, word: &str) -> Result<u32> {
        self.index.decrement(word)
    }

    /// Up to ten words starting with `prefix`, most entries first.
    pub fn suggest(&self, prefix: &str) -> Result<Vec<String>> {
        SuggestionEngine::new(&self.index).suggest(prefix)
    }

    /// Up to thirty words similar to `query`, most similar first.
    pub fn fuzzy_find(&self, query: &str) -> Result<Vec<String>> {
        FuzzyEngine::new(&self.index).find(query)
    }

    pub fn suggestion_engine(&self) -> SuggestionEngine<'_> {
        SuggestionEngine::new(&self.index)
    }

    pub fn fuzzy_engine(&self) -> FuzzyEngine<'_> {
        FuzzyEngine::new(&self.index)
    }
}
