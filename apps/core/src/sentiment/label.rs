//! Sentiment labels and the prediction/training value types built on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Sentiment class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Label::Positive),
            "negative" => Ok(Label::Negative),
            "neutral" => Ok(Label::Neutral),
            other => Err(AppError::Validation(format!("Unknown sentiment label: {}", other))),
        }
    }
}

impl Label {
    /// Number of sentiment classes
    pub const COUNT: usize = 3;

    /// All labels in tie-breaking order
    pub const ALL: [Label; Label::COUNT] = [Label::Positive, Label::Negative, Label::Neutral];

    /// Returns the wire name of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
            Label::Neutral => "neutral",
        }
    }

    /// Row/column index into fixed-size per-label tables
    pub fn index(&self) -> usize {
        match self {
            Label::Positive => 0,
            Label::Negative => 1,
            Label::Neutral => 2,
        }
    }
}

/// A labeled text used for training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: Label,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Result of classifying a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    /// Winning class
    pub label: Label,
    /// Normalized posterior of the winning class, in (0, 1]
    pub confidence: f64,
    /// Signed polarity: P(positive) - P(negative), in [-1, 1]
    pub score: f64,
}

impl SentimentPrediction {
    /// Prediction returned when nothing has been learned yet
    pub fn uninformed() -> Self {
        Self {
            label: Label::Neutral,
            confidence: 1.0 / Label::COUNT as f64,
            score: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_indices_are_distinct() {
        let indices: Vec<usize> = Label::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("Positive".parse::<Label>().unwrap(), Label::Positive);
        assert_eq!(" negative ".parse::<Label>().unwrap(), Label::Negative);
        assert!("angry".parse::<Label>().is_err());
    }

    #[test]
    fn test_label_serde_is_lowercase() {
        let json = serde_json::to_string(&Label::Neutral).unwrap();
        assert_eq!(json, "\"neutral\"");
    }
}
