//! Similarity scoring between a query and a vocabulary word.
//!
//! Scores are integers in `0..=100`, 100 meaning identical after
//! normalization. The top-level [`score`] is a weighted ratio: it takes the
//! best of a plain edit ratio, token-order-insensitive ratios and, when the
//! two strings differ a lot in length, substring ("partial") ratios scaled
//! down so they never outrank a full match.
//!
//! All ratios are built on the insertion/deletion edit distance, where a
//! substitution counts as one deletion plus one insertion.

use std::cmp::max;
use std::collections::BTreeSet;

/// Score of two strings that are identical after normalization.
pub const MAX_SCORE: u8 = 100;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.90;
const LONG_PARTIAL_SCALE: f64 = 0.60;

/// Calculate the insertion/deletion edit distance between two strings.
///
/// Equivalent to `len(s1) + len(s2) - 2 * lcs(s1, s2)`, lengths in chars.
pub fn indel_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    indel_chars(&s1_chars, &s2_chars)
}

#[allow(clippy::needless_range_loop)]
fn indel_chars(s1: &[char], s2: &[char]) -> usize {
    let len1 = s1.len();
    let len2 = s2.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Longest common subsequence, two rows
    let mut prev_row = vec![0usize; len2 + 1];
    let mut curr_row = vec![0usize; len2 + 1];

    for i in 1..=len1 {
        for j in 1..=len2 {
            curr_row[j] = if s1[i - 1] == s2[j - 1] {
                prev_row[j - 1] + 1
            } else {
                max(prev_row[j], curr_row[j - 1])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    len1 + len2 - 2 * prev_row[len2]
}

fn ratio_chars(s1: &[char], s2: &[char]) -> u8 {
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    let lensum = s1.len() + s2.len();
    let distance = indel_chars(s1, s2);
    (100.0 * (lensum - distance) as f64 / lensum as f64).round() as u8
}

fn partial_ratio_chars(s1: &[char], s2: &[char]) -> u8 {
    let (shorter, longer) = if s1.len() <= s2.len() {
        (s1, s2)
    } else {
        (s2, s1)
    };
    if shorter.is_empty() {
        return 0;
    }

    let mut best = 0;
    for window in longer.windows(shorter.len()) {
        best = max(best, ratio_chars(shorter, window));
        if best == MAX_SCORE {
            break;
        }
    }
    best
}

/// Edit ratio of two strings as given, without normalization.
pub fn ratio(s1: &str, s2: &str) -> u8 {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    ratio_chars(&s1_chars, &s2_chars)
}

/// Best ratio of the shorter string against any equally long window of the longer.
pub fn partial_ratio(s1: &str, s2: &str) -> u8 {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    partial_ratio_chars(&s1_chars, &s2_chars)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_sorted<'a, 'b: 'a, I: Iterator<Item = &'a &'b str>>(tokens: I) -> String {
    // BTreeSet iteration is already sorted
    tokens.copied().collect::<Vec<&str>>().join(" ")
}

fn token_sort(s1: &str, s2: &str, partial: bool) -> u8 {
    let sorted1: Vec<char> = sorted_tokens(s1).chars().collect();
    let sorted2: Vec<char> = sorted_tokens(s2).chars().collect();
    if partial {
        partial_ratio_chars(&sorted1, &sorted2)
    } else {
        ratio_chars(&sorted1, &sorted2)
    }
}

fn token_set(s1: &str, s2: &str, partial: bool) -> u8 {
    let tokens1: BTreeSet<&str> = s1.split_whitespace().collect();
    let tokens2: BTreeSet<&str> = s2.split_whitespace().collect();

    let intersection = join_sorted(tokens1.intersection(&tokens2));
    let diff1 = join_sorted(tokens1.difference(&tokens2));
    let diff2 = join_sorted(tokens2.difference(&tokens1));

    let combined1 = format!("{intersection} {diff1}");
    let combined2 = format!("{intersection} {diff2}");

    let t0: Vec<char> = intersection.trim().chars().collect();
    let t1: Vec<char> = combined1.trim().chars().collect();
    let t2: Vec<char> = combined2.trim().chars().collect();

    let pair: fn(&[char], &[char]) -> u8 = if partial {
        partial_ratio_chars
    } else {
        ratio_chars
    };
    max(max(pair(&t0, &t1), pair(&t0, &t2)), pair(&t1, &t2))
}

/// Ratio after sorting whitespace-separated tokens.
pub fn token_sort_ratio(s1: &str, s2: &str) -> u8 {
    token_sort(s1, s2, false)
}

/// Ratio over the shared and the differing token sets.
pub fn token_set_ratio(s1: &str, s2: &str) -> u8 {
    token_set(s1, s2, false)
}

/// Normalize a string for scoring: non-word characters become spaces, the
/// result is lower-cased and trimmed.
pub fn normalize(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();
    replaced.to_lowercase().trim().to_string()
}

fn weighted_ratio(p1: &str, p2: &str) -> u8 {
    // Strings with nothing left after normalization carry no signal.
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }
    if p1 == p2 {
        return MAX_SCORE;
    }

    let p1_chars: Vec<char> = p1.chars().collect();
    let p2_chars: Vec<char> = p2.chars().collect();

    let base = ratio_chars(&p1_chars, &p2_chars) as f64;
    let longer = p1_chars.len().max(p2_chars.len()) as f64;
    let shorter = p1_chars.len().min(p2_chars.len()) as f64;
    let len_ratio = longer / shorter;

    let best = if len_ratio < 1.5 {
        let tsor = token_sort(p1, p2, false) as f64 * UNBASE_SCALE;
        let tser = token_set(p1, p2, false) as f64 * UNBASE_SCALE;
        base.max(tsor).max(tser)
    } else {
        let partial_scale = if len_ratio > 8.0 {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let partial = partial_ratio_chars(&p1_chars, &p2_chars) as f64 * partial_scale;
        let ptsor = token_sort(p1, p2, true) as f64 * UNBASE_SCALE * partial_scale;
        let ptser = token_set(p1, p2, true) as f64 * UNBASE_SCALE * partial_scale;
        base.max(partial).max(ptsor).max(ptser)
    };

    best.round().min(MAX_SCORE as f64) as u8
}

/// Similarity of `query` and `candidate` in `0..=100`.
///
/// Case-insensitive, symmetric and deterministic; `score(x, x) == 100`.
pub fn score(query: &str, candidate: &str) -> u8 {
    if query == candidate {
        return MAX_SCORE;
    }
    weighted_ratio(&normalize(query), &normalize(candidate))
}

/// Scores many candidates against one query, normalizing the query once.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    query: String,
    normalized: String,
}

impl SimilarityScorer {
    /// Create a new scorer for the given query string.
    pub fn new<S: Into<String>>(query: S) -> Self {
        let query = query.into();
        let normalized = normalize(&query);
        SimilarityScorer { query, normalized }
    }

    /// Get the original query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Similarity of the query and `candidate` in `0..=100`.
    pub fn score(&self, candidate: &str) -> u8 {
        if self.query == candidate {
            return MAX_SCORE;
        }
        weighted_ratio(&self.normalized, &normalize(candidate))
    }
}
