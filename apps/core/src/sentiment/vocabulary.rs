//! Token ↔ class frequency table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::label::Label;

/// Per-class token occurrence counts.
///
/// Entries are only ever added or incremented; the table shrinks only through
/// [`Vocabulary::clear`], which the destructive `train` path uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    counts: HashMap<String, [u64; Label::COUNT]>,
    /// Sum of all token occurrences per class
    class_token_totals: [u64; Label::COUNT],
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `token` under `label`
    pub fn add(&mut self, token: &str, label: Label) {
        self.counts.entry(token.to_string()).or_default()[label.index()] += 1;
        self.class_token_totals[label.index()] += 1;
    }

    /// Occurrences of `token` under `label`
    pub fn count(&self, token: &str, label: Label) -> u64 {
        self.counts
            .get(token)
            .map(|counts| counts[label.index()])
            .unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total token occurrences recorded under `label`
    pub fn total_tokens(&self, label: Label) -> u64 {
        self.class_token_totals[label.index()]
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.class_token_totals = [0; Label::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_count() {
        let mut vocab = Vocabulary::new();
        vocab.add("great", Label::Positive);
        vocab.add("great", Label::Positive);
        vocab.add("great", Label::Negative);

        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.count("great", Label::Positive), 2);
        assert_eq!(vocab.count("great", Label::Negative), 1);
        assert_eq!(vocab.count("great", Label::Neutral), 0);
        assert_eq!(vocab.total_tokens(Label::Positive), 2);
    }

    #[test]
    fn test_unknown_token_counts_zero() {
        let vocab = Vocabulary::new();
        assert!(!vocab.contains("missing"));
        assert_eq!(vocab.count("missing", Label::Neutral), 0);
    }

    #[test]
    fn test_clear() {
        let mut vocab = Vocabulary::new();
        vocab.add("meh", Label::Neutral);
        vocab.clear();
        assert!(vocab.is_empty());
        assert_eq!(vocab.total_tokens(Label::Neutral), 0);
    }
}
