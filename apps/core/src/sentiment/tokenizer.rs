//! Text normalization into a bag of tokens.
//!
//! Lowercases input and extracts runs of letters and digits, keeping inner
//! apostrophes so contractions like "don't" stay one token. Negation words
//! carry sentiment, so no stopwords are removed unless explicitly configured.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

// NOTE: the pattern is a literal, so compilation cannot fail at runtime.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}]+)*").expect("Invalid regex: token pattern")
});

/// Tokenizer configuration and behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokenizer {
    min_token_length: usize,
    #[serde(default)]
    stopwords: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a tokenizer that keeps every token
    pub fn new() -> Self {
        Self::with_config(1, &[])
    }

    /// Create a tokenizer with a minimum token length and a stopword list
    pub fn with_config(min_token_length: usize, stopwords: &[&str]) -> Self {
        Self {
            min_token_length: min_token_length.max(1),
            stopwords: stopwords.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Split text into normalized tokens, preserving repetitions
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str().replace('’', "'"))
            .filter(|token| {
                token.chars().count() >= self.min_token_length && !self.stopwords.contains(token)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize("I love it!"), vec!["i", "love", "it"]);
    }

    #[test]
    fn test_contractions_are_kept() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize("I don’t like it, it's BAD"),
            vec!["i", "don't", "like", "it", "it's", "bad"]
        );
    }

    #[test]
    fn test_repetitions_are_preserved() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize("good good good"), vec!["good"; 3]);
    }

    #[test]
    fn test_stopwords_and_min_length() {
        let tokenizer = Tokenizer::with_config(2, &["the"]);
        assert_eq!(tokenizer.tokenize("The movie was a hit"), vec!["movie", "was", "hit"]);
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("!!! ... ???").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize("Très bien, génial"), vec!["très", "bien", "génial"]);
    }
}
