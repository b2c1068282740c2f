//! Prefix suggestions ranked by entry popularity.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lexicon::word_index::{WordIndex, WordSnapshot};

/// Maximum number of suggestions returned for one prefix.
pub const SUGGESTION_LIMIT: usize = 10;

/// One ranked autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSuggestion {
    /// The suggested headword.
    pub word: String,
    /// Number of stored entries for the word.
    pub count: u32,
}

/// Rank the snapshot's words starting with `prefix`.
///
/// Matching is case-sensitive. Results are ordered by descending count, then
/// by word, and capped at [`SUGGESTION_LIMIT`]. An empty prefix matches every
/// word.
pub fn rank_prefix(snapshot: &WordSnapshot, prefix: &str) -> Vec<WordSuggestion> {
    let mut matches: Vec<(&str, u32)> = snapshot
        .iter()
        .filter(|(word, _)| word.starts_with(prefix))
        .collect();

    matches.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    matches.truncate(SUGGESTION_LIMIT);

    matches
        .into_iter()
        .map(|(word, count)| WordSuggestion {
            word: word.to_string(),
            count,
        })
        .collect()
}

/// Autocomplete over the shared word index.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionEngine<'a> {
    index: &'a WordIndex,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(index: &'a WordIndex) -> Self {
        SuggestionEngine { index }
    }

    /// Ranked suggestions with their counts.
    pub fn suggest_ranked(&self, prefix: &str) -> Result<Vec<WordSuggestion>> {
        let snapshot = self.index.snapshot()?;
        let ranked = rank_prefix(&snapshot, prefix);
        debug!(
            "prefix {prefix:?}: {} suggestions from {} words",
            ranked.len(),
            snapshot.len()
        );
        Ok(ranked)
    }

    /// Ranked suggested words. Empty, not an error, when nothing matches.
    pub fn suggest(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .suggest_ranked(prefix)?
            .into_iter()
            .map(|suggestion| suggestion.word)
            .collect())
    }
}
