//! Bag-of-words near-duplicate scoring.
//!
//! A document is reduced to the set of its lowercase ASCII words of three or
//! more letters, minus a German stopword list, and two documents are scored
//! by the Jaccard index of those sets. The score is total: empty or
//! stopword-only text scores 0.0 against anything, itself included.

pub mod stopwords;
pub mod tokenizer;

use serde::Serialize;

pub use stopwords::StopwordPolicy;
pub use tokenizer::TokenSet;

const DEFAULT_DETECTOR: DuplicateDetector = DuplicateDetector {
    stopwords: StopwordPolicy::Extended,
};

/// Result of comparing two documents.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Comparison {
    pub score: f64,
    /// Size of the intersection of both token sets.
    pub shared: usize,
    /// Size of the union of both token sets.
    pub union: usize,
    pub left_tokens: usize,
    pub right_tokens: usize,
    /// Shared tokens, sorted.
    pub shared_tokens: Vec<String>,
}

/// Scores pairs of documents. Holds nothing but the stopword policy, so one
/// instance can be shared freely across threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DuplicateDetector {
    stopwords: StopwordPolicy,
}

impl DuplicateDetector {
    pub fn new(stopwords: StopwordPolicy) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> StopwordPolicy {
        self.stopwords
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenizer::tokenize(text, self.stopwords)
    }

    pub fn token_set(&self, text: &str) -> TokenSet {
        tokenizer::token_set(text, self.stopwords)
    }

    /// Jaccard similarity of the two texts' token sets, in `[0.0, 1.0]`.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity_of_sets(&self.token_set(a), &self.token_set(b))
    }

    /// Like [`similarity`](Self::similarity), with `None` read as empty text.
    pub fn similarity_opt(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        self.similarity(a.unwrap_or_default(), b.unwrap_or_default())
    }

    pub fn compare(&self, a: &str, b: &str) -> Comparison {
        compare_sets(&self.token_set(a), &self.token_set(b))
    }
}

/// Score two texts with the default (extended) stopword list.
pub fn similarity(a: &str, b: &str) -> f64 {
    DEFAULT_DETECTOR.similarity(a, b)
}

pub fn similarity_of_sets(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    shared as f64 / union as f64
}

pub fn compare_sets(a: &TokenSet, b: &TokenSet) -> Comparison {
    let mut shared_tokens: Vec<String> = a.intersection(b).cloned().collect();
    shared_tokens.sort();
    let shared = shared_tokens.len();
    let union = a.len() + b.len() - shared;

    Comparison {
        score: similarity_of_sets(a, b),
        shared,
        union,
        left_tokens: a.len(),
        right_tokens: b.len(),
        shared_tokens,
    }
}
