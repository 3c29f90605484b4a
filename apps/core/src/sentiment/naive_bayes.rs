//! Multinomial Naive Bayes sentiment classifier.
//!
//! Scores each label as
//! `ln P(label) + Σ ln((count(token, label) + α) / (tokens(label) + α·|V|))`
//! with additive smoothing over the full vocabulary. Tokens never seen in
//! training are skipped: they would add the same amount to every label.
//! Confidence is the soft-max of the three log-scores.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::label::{Label, SentimentPrediction, TrainingExample};
use super::tokenizer::Tokenizer;
use super::vocabulary::Vocabulary;
use crate::error::AppError;

/// Default additive smoothing (Laplace)
pub const DEFAULT_SMOOTHING: f64 = 1.0;

/// Training example counts per label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPriors {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl ClassPriors {
    fn from_counts(counts: &[u64; Label::COUNT]) -> Self {
        Self {
            positive: counts[Label::Positive.index()],
            negative: counts[Label::Negative.index()],
            neutral: counts[Label::Neutral.index()],
        }
    }

    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

/// Introspectable counts of a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierStats {
    pub vocabulary_size: usize,
    pub class_priors: ClassPriors,
    pub total_examples: u64,
    pub total_tokens: u64,
    pub smoothing: f64,
}

/// Opaque model snapshot for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesSnapshot {
    pub vocabulary: Vocabulary,
    pub class_counts: [u64; Label::COUNT],
    pub smoothing: f64,
    pub tokenizer: Tokenizer,
}

/// Multinomial Naive Bayes over the three sentiment labels
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    class_counts: [u64; Label::COUNT],
    smoothing: f64,
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NaiveBayesClassifier {
    /// Create an untrained classifier with Laplace smoothing
    pub fn new() -> Self {
        Self::with_config(Tokenizer::new(), DEFAULT_SMOOTHING)
    }

    /// Create an untrained classifier with a custom tokenizer and smoothing.
    ///
    /// Smoothing must be finite and positive; anything else falls back to Laplace.
    pub fn with_config(tokenizer: Tokenizer, smoothing: f64) -> Self {
        let smoothing = if smoothing.is_finite() && smoothing > 0.0 {
            smoothing
        } else {
            warn!("Invalid smoothing {}, using {}", smoothing, DEFAULT_SMOOTHING);
            DEFAULT_SMOOTHING
        };
        Self {
            tokenizer,
            vocabulary: Vocabulary::new(),
            class_counts: [0; Label::COUNT],
            smoothing,
        }
    }

    /// Replace all knowledge with counts from `examples`.
    ///
    /// Empty input is a no-op: the current model is kept.
    pub fn train(&mut self, examples: &[TrainingExample]) {
        if examples.is_empty() {
            warn!("train called with no examples, keeping current model");
            return;
        }

        self.vocabulary.clear();
        self.class_counts = [0; Label::COUNT];
        self.accumulate(examples);

        info!(
            "Trained on {} examples, vocabulary size {}",
            examples.len(),
            self.vocabulary.len()
        );
    }

    /// Merge counts from `examples` into the existing model.
    pub fn incremental_train(&mut self, examples: &[TrainingExample]) {
        if examples.is_empty() {
            warn!("incremental_train called with no examples, skipping");
            return;
        }

        let before = self.vocabulary.len();
        self.accumulate(examples);

        info!(
            "Incrementally trained on {} examples, vocabulary {} -> {}",
            examples.len(),
            before,
            self.vocabulary.len()
        );
    }

    fn accumulate(&mut self, examples: &[TrainingExample]) {
        for example in examples {
            self.class_counts[example.label.index()] += 1;
            for token in self.tokenizer.tokenize(&example.text) {
                self.vocabulary.add(&token, example.label);
            }
        }
    }

    /// Log-score of every label, `None` for labels without training examples
    fn log_scores(&self, tokens: &[String]) -> [Option<f64>; Label::COUNT] {
        let total_examples: u64 = self.class_counts.iter().sum();
        let vocab_size = self.vocabulary.len() as f64;
        let mut scores = [None; Label::COUNT];

        for label in Label::ALL {
            let examples = self.class_counts[label.index()];
            if examples == 0 {
                continue;
            }

            let denominator =
                self.vocabulary.total_tokens(label) as f64 + self.smoothing * vocab_size;
            let mut score = (examples as f64 / total_examples as f64).ln();

            for token in tokens.iter().filter(|t| self.vocabulary.contains(t)) {
                let count = self.vocabulary.count(token, label) as f64;
                score += ((count + self.smoothing) / denominator).ln();
            }

            scores[label.index()] = Some(score);
        }

        scores
    }

    /// Classify `text`.
    pub fn predict(&self, text: &str) -> SentimentPrediction {
        if !self.is_trained() {
            debug!("predict on untrained classifier, returning neutral");
            return SentimentPrediction::uninformed();
        }

        let tokens = self.tokenizer.tokenize(text);
        let scores = self.log_scores(&tokens);

        // Labels without examples are impossible, so they get zero mass.
        let max_score = scores
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let mut posteriors = [0.0; Label::COUNT];
        for (posterior, score) in posteriors.iter_mut().zip(scores.iter()) {
            if let Some(score) = score {
                *posterior = (score - max_score).exp();
            }
        }
        let total: f64 = posteriors.iter().sum();
        for posterior in posteriors.iter_mut() {
            *posterior /= total;
        }

        let mut best = Label::ALL[0];
        for label in Label::ALL {
            if posteriors[label.index()] > posteriors[best.index()] {
                best = label;
            }
        }

        SentimentPrediction {
            label: best,
            confidence: posteriors[best.index()],
            score: posteriors[Label::Positive.index()] - posteriors[Label::Negative.index()],
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn class_priors(&self) -> ClassPriors {
        ClassPriors::from_counts(&self.class_counts)
    }

    pub fn is_trained(&self) -> bool {
        self.class_counts.iter().any(|&c| c > 0)
    }

    pub fn stats(&self) -> ClassifierStats {
        ClassifierStats {
            vocabulary_size: self.vocabulary.len(),
            class_priors: self.class_priors(),
            total_examples: self.class_counts.iter().sum(),
            total_tokens: Label::ALL
                .iter()
                .map(|l| self.vocabulary.total_tokens(*l))
                .sum(),
            smoothing: self.smoothing,
        }
    }

    pub fn serialize(&self) -> NaiveBayesSnapshot {
        NaiveBayesSnapshot {
            vocabulary: self.vocabulary.clone(),
            class_counts: self.class_counts,
            smoothing: self.smoothing,
            tokenizer: self.tokenizer.clone(),
        }
    }

    /// Rebuild a classifier from a snapshot.
    pub fn deserialize(snapshot: NaiveBayesSnapshot) -> Result<Self, AppError> {
        if !(snapshot.smoothing.is_finite() && snapshot.smoothing > 0.0) {
            return Err(AppError::Validation(format!(
                "Invalid smoothing in model snapshot: {}",
                snapshot.smoothing
            )));
        }

        Ok(Self {
            tokenizer: snapshot.tokenizer,
            vocabulary: snapshot.vocabulary,
            class_counts: snapshot.class_counts,
            smoothing: snapshot.smoothing,
        })
    }
}
