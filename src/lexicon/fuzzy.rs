//! Similarity-ranked fallback search.
//!
//! Used only after an exact word lookup against the entry store came back
//! empty. Every word in the index is scored against the query; candidates
//! that are not similar enough, or that are short near-coincidences, are
//! dropped.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LexisError, Result};
use crate::lexicon::similarity::SimilarityScorer;
use crate::lexicon::word_index::{WordIndex, WordSnapshot};

/// Minimum similarity score for a fallback candidate.
pub const FUZZY_THRESHOLD: u8 = 80;

/// Maximum number of fallback candidates returned.
pub const FUZZY_LIMIT: usize = 30;

/// Candidates no longer than the query must be longer than this many chars.
pub const SHORT_WORD_LENGTH: usize = 5;

/// Vocabulary size from which scoring is spread over the rayon pool.
pub const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// One fallback candidate and its similarity to the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    pub word: String,
    pub score: u8,
}

fn keeps_length(candidate: &str, query_len: usize) -> bool {
    let len = candidate.chars().count();
    len > query_len || len > SHORT_WORD_LENGTH
}

fn score_candidate<'w>(
    scorer: &SimilarityScorer,
    query_len: usize,
    word: &&'w str,
) -> Option<(&'w str, u8)> {
    let score = scorer.score(word);
    (score >= FUZZY_THRESHOLD && keeps_length(word, query_len)).then_some((*word, score))
}

/// Score and filter the snapshot's words against `query`.
///
/// Results are ordered by descending score, then by word, and capped at
/// [`FUZZY_LIMIT`]. Fails with [`LexisError::NoSimilarWord`] when nothing
/// survives the filters.
pub fn rank_similar(snapshot: &WordSnapshot, query: &str) -> Result<Vec<FuzzyMatch>> {
    let scorer = SimilarityScorer::new(query);
    let query_len = query.chars().count();
    let words: Vec<&str> = snapshot.iter().map(|(word, _)| word).collect();

    let mut matches: Vec<(&str, u8)> = if words.len() >= PARALLEL_SCAN_THRESHOLD {
        words
            .par_iter()
            .filter_map(|word| score_candidate(&scorer, query_len, word))
            .collect()
    } else {
        words
            .iter()
            .filter_map(|word| score_candidate(&scorer, query_len, word))
            .collect()
    };

    if matches.is_empty() {
        debug!("no similar word for {query:?} among {} words", words.len());
        return Err(LexisError::no_similar_word(query));
    }

    matches.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    matches.truncate(FUZZY_LIMIT);

    Ok(matches
        .into_iter()
        .map(|(word, score)| FuzzyMatch {
            word: word.to_string(),
            score,
        })
        .collect())
}

/// Fuzzy fallback over the shared word index.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyEngine<'a> {
    index: &'a WordIndex,
}

impl<'a> FuzzyEngine<'a> {
    pub fn new(index: &'a WordIndex) -> Self {
        FuzzyEngine { index }
    }

    /// Similar words with their scores.
    pub fn find_scored(&self, query: &str) -> Result<Vec<FuzzyMatch>> {
        let snapshot = self.index.snapshot()?;
        rank_similar(&snapshot, query)
    }

    /// Similar words, best first.
    pub fn find(&self, query: &str) -> Result<Vec<String>> {
        Ok(self
            .find_scored(query)?
            .into_iter()
            .map(|found| found.word)
            .collect())
    }
}
