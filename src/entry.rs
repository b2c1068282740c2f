//! Dictionary entry data model.
//!
//! An [`Entry`] is one stored definition of a headword. Several entries may
//! share the same word (different word types or senses); the word index counts
//! them per exact word string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a headword, in characters.
pub const MAX_WORD_LENGTH: usize = 25;

/// Maximum length of a word type label, in characters.
pub const MAX_TYPE_LENGTH: usize = 20;

/// A stored dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identifier.
    pub id: u64,
    /// The headword, case preserved.
    pub word: String,
    /// Part of speech or other type label (e.g. "n.", "v.").
    #[serde(rename = "wordtype")]
    pub word_type: String,
    /// Definition text.
    pub definition: String,
    /// When the entry was first stored.
    pub created_at: DateTime<Utc>,
    /// When the entry was last written.
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Whether this entry has the same content as `other`, ignoring id and timestamps.
    pub fn same_content(&self, other: &NewEntry) -> bool {
        self.word == other.word
            && self.word_type == other.word_type
            && self.definition == other.definition
    }
}

/// An entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub word: String,
    #[serde(rename = "wordtype")]
    pub word_type: String,
    pub definition: String,
}

impl NewEntry {
    pub fn new<W, T, D>(word: W, word_type: T, definition: D) -> Self
    where
        W: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        NewEntry {
            word: word.into(),
            word_type: word_type.into(),
            definition: definition.into(),
        }
    }
}

impl From<Entry> for NewEntry {
    fn from(entry: Entry) -> Self {
        NewEntry {
            word: entry.word,
            word_type: entry.word_type,
            definition: entry.definition,
        }
    }
}

/// Predicate over stored entries, as understood by an entry store.
///
/// Word, type and letter comparisons are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub word: Option<String>,
    pub word_type: Option<String>,
    pub first_letter: Option<char>,
    pub order_by_word: bool,
}

impl EntryFilter {
    /// Match every entry.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match entries whose word equals `word`, ignoring case.
    pub fn with_word<S: Into<String>>(mut self, word: S) -> Self {
        self.word = Some(word.into());
        self
    }

    /// Match entries whose word type equals `word_type`, ignoring case.
    pub fn with_type<S: Into<String>>(mut self, word_type: S) -> Self {
        self.word_type = Some(word_type.into());
        self
    }

    /// Match entries whose word starts with `letter`, ignoring case.
    pub fn with_letter(mut self, letter: char) -> Self {
        self.first_letter = Some(letter);
        self
    }

    /// Return results sorted by word ascending.
    pub fn ordered_by_word(mut self) -> Self {
        self.order_by_word = true;
        self
    }

    /// Evaluate the predicate against one entry.
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(word) = &self.word
            && entry.word.to_lowercase() != word.to_lowercase()
        {
            return false;
        }
        if let Some(word_type) = &self.word_type
            && entry.word_type.to_lowercase() != word_type.to_lowercase()
        {
            return false;
        }
        if let Some(letter) = self.first_letter {
            let prefix: String = letter.to_lowercase().collect();
            if !entry.word.to_lowercase().starts_with(&prefix) {
                return false;
            }
        }
        true
    }
}

/// Zero-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        PageRequest { page, size }
    }

    /// Index of the first element on this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus the size of the full result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Slice a fully materialized result set into the requested page.
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total_elements = all.len();
        let content = all
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Page {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size)
    }
}
