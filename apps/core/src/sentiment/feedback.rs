//! Feedback records and the buffer they wait in until a learning pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::label::{Label, SentimentPrediction, TrainingExample};

/// One labeled observation of the classifier's behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackLoop {
    pub id: Uuid,
    pub text: String,
    /// What the classifier predicted when the feedback arrived
    pub prediction: SentimentPrediction,
    pub actual_label: Label,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FeedbackLoop {
    pub fn new(
        text: String,
        prediction: SentimentPrediction,
        actual_label: Label,
        user_id: Option<String>,
        source: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            confidence: prediction.confidence,
            text,
            prediction,
            actual_label,
            timestamp: Utc::now(),
            user_id,
            source,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.prediction.label == self.actual_label
    }

    pub fn as_training_example(&self) -> TrainingExample {
        TrainingExample::new(self.text.clone(), self.actual_label)
    }
}

/// Pending feedback awaiting the next learning pass
#[derive(Debug, Clone, Default)]
pub struct FeedbackBuffer {
    items: Vec<FeedbackLoop>,
    capacity: usize,
}

impl FeedbackBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, feedback: FeedbackLoop) {
        self.items.push(feedback);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> &[FeedbackLoop] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Wrong predictions made with confidence under `threshold`
    pub fn hard_examples(&self, threshold: f64) -> Vec<TrainingExample> {
        self.items
            .iter()
            .filter(|f| !f.is_correct() && f.confidence < threshold)
            .map(FeedbackLoop::as_training_example)
            .collect()
    }

    /// Right predictions made with confidence over `threshold`, first `limit` in arrival order
    pub fn reinforcement_examples(&self, threshold: f64, limit: usize) -> Vec<TrainingExample> {
        self.items
            .iter()
            .filter(|f| f.is_correct() && f.confidence > threshold)
            .take(limit)
            .map(FeedbackLoop::as_training_example)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(text: &str, predicted: Label, confidence: f64, actual: Label) -> FeedbackLoop {
        let prediction = SentimentPrediction {
            label: predicted,
            confidence,
            score: 0.0,
        };
        FeedbackLoop::new(text.to_string(), prediction, actual, None, None)
    }

    #[test]
    fn test_buffer_fills_at_capacity() {
        let mut buffer = FeedbackBuffer::new(2);
        buffer.push(feedback("a", Label::Positive, 0.9, Label::Positive));
        assert!(!buffer.is_full());
        buffer.push(feedback("b", Label::Positive, 0.9, Label::Positive));
        assert!(buffer.is_full());
    }

    #[test]
    fn test_hard_example_selection() {
        let mut buffer = FeedbackBuffer::new(10);
        buffer.push(feedback("wrong low", Label::Positive, 0.5, Label::Negative));
        buffer.push(feedback("wrong high", Label::Positive, 0.95, Label::Negative));
        buffer.push(feedback("right low", Label::Neutral, 0.4, Label::Neutral));

        let hard = buffer.hard_examples(0.7);
        assert_eq!(hard, vec![TrainingExample::new("wrong low", Label::Negative)]);
    }

    #[test]
    fn test_reinforcement_respects_limit_and_order() {
        let mut buffer = FeedbackBuffer::new(10);
        for text in ["first", "second", "third"] {
            buffer.push(feedback(text, Label::Positive, 0.9, Label::Positive));
        }

        let picked = buffer.reinforcement_examples(0.7, 2);
        let texts: Vec<&str> = picked.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(buffer.reinforcement_examples(0.7, 0).is_empty());
    }

    #[test]
    fn test_feedback_ids_are_unique() {
        let a = feedback("x", Label::Neutral, 0.5, Label::Neutral);
        let b = feedback("x", Label::Neutral, 0.5, Label::Neutral);
        assert_ne!(a.id, b.id);
    }
}
