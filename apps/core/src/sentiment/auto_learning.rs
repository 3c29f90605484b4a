//! Auto-learning controller.
//!
//! Wraps a [`NaiveBayesClassifier`] with a feedback buffer, running statistics,
//! a confusion matrix and a drift detector. Every call to
//! [`AutoLearningController::provide_feedback`] runs one full cycle:
//!
//! 1. predict the text and buffer the feedback
//! 2. update counters, the confidence EMA and the confusion matrix
//! 3. run a learning pass when the buffer is full
//! 4. check for drift, and flush the buffer early when it is detected
//!
//! The controller is synchronous. Reloading a persisted model after drift is
//! left to the owner, signaled through [`FeedbackOutcome::refresh_requested`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::drift::{push_bounded, DriftDetector, DriftReport};
use super::feedback::{FeedbackBuffer, FeedbackLoop};
use super::label::{Label, SentimentPrediction, TrainingExample};
use super::metrics::{ConfusionMatrix, PerformanceMetrics};
use super::naive_bayes::{ClassifierStats, NaiveBayesClassifier, NaiveBayesSnapshot};
use super::tokenizer::Tokenizer;
use crate::config::AutoLearningConfig;
use crate::error::AppError;

/// Running counters of the feedback loop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLearningStats {
    pub total_feedbacks: u64,
    pub correct_predictions: u64,
    pub wrong_predictions: u64,
    pub retraining_events: u64,
    /// Exponential moving average of prediction confidence
    pub average_confidence: f64,
    /// Accuracy recorded after each learning pass, oldest first
    pub performance_history: VecDeque<f64>,
    /// New vocabulary entries introduced by learning passes
    pub vocabulary_growth: u64,
    pub last_retraining: Option<DateTime<Utc>>,
}

/// Summary of one learning pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPassReport {
    pub hard_examples: usize,
    pub reinforcement_examples: usize,
    pub vocabulary_before: usize,
    pub vocabulary_after: usize,
    /// Accuracy appended to the performance history
    pub accuracy: f64,
    /// Feedback items removed from the buffer
    pub flushed: usize,
}

/// What a single `provide_feedback` call did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOutcome {
    pub feedback_id: Uuid,
    pub prediction: SentimentPrediction,
    pub correct: bool,
    pub learning_pass: Option<LearningPassReport>,
    pub drift_detected: bool,
    /// The owner should try to reload the persisted model
    pub refresh_requested: bool,
}

/// Full controller state as written by `serialize_with_auto_learning`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLearningSnapshot {
    pub model: NaiveBayesSnapshot,
    pub stats: AutoLearningStats,
    pub confusion_matrix: ConfusionMatrix,
    pub metrics: PerformanceMetrics,
    pub timestamp: DateTime<Utc>,
}

pub struct AutoLearningController {
    classifier: NaiveBayesClassifier,
    config: AutoLearningConfig,
    buffer: FeedbackBuffer,
    stats: AutoLearningStats,
    confusion: ConfusionMatrix,
    drift: DriftDetector,
}

impl Default for AutoLearningController {
    fn default() -> Self {
        Self::new(AutoLearningConfig::default())
    }
}

impl AutoLearningController {
    pub fn new(config: AutoLearningConfig) -> Self {
        let classifier = NaiveBayesClassifier::with_config(Tokenizer::new(), config.smoothing_alpha);
        Self::with_classifier(classifier, config)
    }

    /// Wrap an already trained classifier
    pub fn with_classifier(classifier: NaiveBayesClassifier, config: AutoLearningConfig) -> Self {
        Self {
            classifier,
            buffer: FeedbackBuffer::new(config.buffer_size),
            stats: AutoLearningStats::default(),
            confusion: ConfusionMatrix::new(),
            drift: DriftDetector::new(
                config.performance_window_size,
                config.retraining_threshold,
                config.recent_window_ratio,
            ),
            config,
        }
    }

    pub fn config(&self) -> &AutoLearningConfig {
        &self.config
    }

    pub fn predict(&self, text: &str) -> SentimentPrediction {
        self.classifier.predict(text)
    }

    pub fn train(&mut self, examples: &[TrainingExample]) {
        self.classifier.train(examples);
    }

    pub fn incremental_train(&mut self, examples: &[TrainingExample]) {
        self.classifier.incremental_train(examples);
    }

    pub fn provide_feedback(
        &mut self,
        text: &str,
        actual_label: Label,
        user_id: Option<String>,
        source: Option<String>,
    ) -> FeedbackOutcome {
        let prediction = self.classifier.predict(text);
        let feedback = FeedbackLoop::new(
            text.to_string(),
            prediction.clone(),
            actual_label,
            user_id,
            source,
        );
        let feedback_id = feedback.id;
        let correct = feedback.is_correct();
        self.buffer.push(feedback);

        self.stats.total_feedbacks += 1;
        if correct {
            self.stats.correct_predictions += 1;
        } else {
            self.stats.wrong_predictions += 1;
        }
        let alpha = self.config.ema_alpha;
        self.stats.average_confidence =
            alpha * prediction.confidence + (1.0 - alpha) * self.stats.average_confidence;
        self.confusion.record(actual_label, prediction.label);

        debug!(
            "Feedback {}: predicted {} ({:.3}), actual {}",
            feedback_id, prediction.label, prediction.confidence, actual_label
        );

        let mut learning_pass = None;
        if self.buffer.is_full() {
            learning_pass = Some(self.process_automatic_learning());
        }

        let drift_detected = self.detect_performance_drift();
        if drift_detected {
            if let Some(report) = self.trigger_model_refresh() {
                learning_pass = Some(report);
            }
        }

        FeedbackOutcome {
            feedback_id,
            prediction,
            correct,
            learning_pass,
            drift_detected,
            refresh_requested: drift_detected,
        }
    }

    /// Learn from the buffered feedback and clear the buffer.
    fn process_automatic_learning(&mut self) -> LearningPassReport {
        let threshold = self.config.confidence_threshold;
        let hard = self.buffer.hard_examples(threshold);
        let cap = (self.config.reinforcement_ratio * hard.len() as f64).floor() as usize;
        let reinforcement = self.buffer.reinforcement_examples(threshold, cap);

        let vocabulary_before = self.classifier.vocabulary_size();
        let mut examples = hard;
        let hard_examples = examples.len();
        let reinforcement_examples = reinforcement.len();
        examples.extend(reinforcement);

        if examples.is_empty() {
            debug!("Learning pass found no hard or reinforcement examples");
        } else {
            self.classifier.incremental_train(&examples);
        }
        let vocabulary_after = self.classifier.vocabulary_size();

        let accuracy = self.confusion.accuracy();
        self.stats.retraining_events += 1;
        self.stats.last_retraining = Some(Utc::now());
        self.stats.vocabulary_growth += vocabulary_after.saturating_sub(vocabulary_before) as u64;
        push_bounded(
            &mut self.stats.performance_history,
            accuracy,
            self.config.performance_window_size,
        );

        let flushed = self.buffer.len();
        self.buffer.clear();

        info!(
            "Learning pass #{}: {} hard, {} reinforcement, vocabulary {} -> {}, accuracy {:.3}",
            self.stats.retraining_events,
            hard_examples,
            reinforcement_examples,
            vocabulary_before,
            vocabulary_after,
            accuracy
        );

        LearningPassReport {
            hard_examples,
            reinforcement_examples,
            vocabulary_before,
            vocabulary_after,
            accuracy,
            flushed,
        }
    }

    /// Run a learning pass now, regardless of buffer size. `None` when the buffer is empty.
    pub fn force_process_buffer(&mut self) -> Option<LearningPassReport> {
        if self.buffer.is_empty() {
            debug!("force_process_buffer: buffer empty, nothing to do");
            return None;
        }
        Some(self.process_automatic_learning())
    }

    /// Flush pending feedback after drift. Reloading the persisted model is up to the owner.
    pub fn trigger_model_refresh(&mut self) -> Option<LearningPassReport> {
        warn!(
            "Model refresh triggered with {} buffered feedback items",
            self.buffer.len()
        );
        self.force_process_buffer()
    }

    pub fn detect_performance_drift(&self) -> bool {
        let report = self.drift.report(&self.stats.performance_history);
        match report {
            Some(r) if r.drift_detected => {
                warn!(
                    "Performance drift: historical {:.3}, recent {:.3}, drop {:.3}",
                    r.historical_mean, r.recent_mean, r.drop
                );
                true
            }
            _ => false,
        }
    }

    pub fn drift_report(&self) -> Option<DriftReport> {
        self.drift.report(&self.stats.performance_history)
    }

    pub fn auto_learning_stats(&self) -> AutoLearningStats {
        self.stats.clone()
    }

    pub fn current_metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics::from_matrix(&self.confusion)
    }

    pub fn confusion_matrix(&self) -> &ConfusionMatrix {
        &self.confusion
    }

    pub fn buffered_feedback(&self) -> &[FeedbackLoop] {
        self.buffer.items()
    }

    pub fn classifier_stats(&self) -> ClassifierStats {
        self.classifier.stats()
    }

    /// Clear counters, history, confusion matrix and pending feedback. The model is kept.
    pub fn reset_auto_learning_stats(&mut self) {
        self.stats = AutoLearningStats::default();
        self.confusion.reset();
        self.buffer.clear();
        info!("Auto-learning statistics reset");
    }

    pub fn model_snapshot(&self) -> NaiveBayesSnapshot {
        self.classifier.serialize()
    }

    /// Swap in a persisted model; counters and history are left alone.
    pub fn restore_model(&mut self, snapshot: NaiveBayesSnapshot) -> Result<(), AppError> {
        self.classifier = NaiveBayesClassifier::deserialize(snapshot)?;
        info!(
            "Model restored, vocabulary size {}",
            self.classifier.vocabulary_size()
        );
        Ok(())
    }

    pub fn serialize_with_auto_learning(&self) -> Result<String, AppError> {
        let snapshot = AutoLearningSnapshot {
            model: self.classifier.serialize(),
            stats: self.stats.clone(),
            confusion_matrix: self.confusion,
            metrics: self.current_metrics(),
            timestamp: Utc::now(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Replace model, counters and confusion matrix from a serialized snapshot.
    ///
    /// Pending feedback is dropped since it was counted in the replaced stats.
    /// On error the controller is unchanged.
    pub fn deserialize_with_auto_learning(&mut self, data: &str) -> Result<(), AppError> {
        let snapshot: AutoLearningSnapshot = serde_json::from_str(data)?;

        if snapshot.confusion_matrix.total() != snapshot.stats.total_feedbacks {
            return Err(AppError::Validation(format!(
                "Snapshot confusion matrix holds {} outcomes but stats report {} feedbacks",
                snapshot.confusion_matrix.total(),
                snapshot.stats.total_feedbacks
            )));
        }

        let classifier = NaiveBayesClassifier::deserialize(snapshot.model)?;
        let mut stats = snapshot.stats;
        while stats.performance_history.len() > self.config.performance_window_size {
            stats.performance_history.pop_front();
        }

        if !self.buffer.is_empty() {
            warn!(
                "Discarding {} buffered feedback items on snapshot restore",
                self.buffer.len()
            );
        }
        self.classifier = classifier;
        self.stats = stats;
        self.confusion = snapshot.confusion_matrix;
        self.buffer.clear();

        info!(
            "Restored auto-learning snapshot from {} ({} feedbacks)",
            snapshot.timestamp, self.stats.total_feedbacks
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AutoLearningConfig {
        AutoLearningConfig {
            buffer_size: 3,
            performance_window_size: 4,
            ..AutoLearningConfig::default()
        }
    }

    fn trained(config: AutoLearningConfig) -> AutoLearningController {
        let mut controller = AutoLearningController::new(config);
        controller.train(&[
            TrainingExample::new("I love it", Label::Positive),
            TrainingExample::new("I hate it", Label::Negative),
            TrainingExample::new("it is ok", Label::Neutral),
        ]);
        controller
    }

    #[test]
    fn test_feedback_updates_counters() {
        let mut controller = trained(small_config());
        let outcome = controller.provide_feedback("I love it", Label::Positive, None, None);

        assert!(outcome.correct);
        assert!(outcome.learning_pass.is_none());
        let stats = controller.auto_learning_stats();
        assert_eq!(stats.total_feedbacks, 1);
        assert_eq!(stats.correct_predictions, 1);
        assert!((stats.average_confidence - 0.1 * outcome.prediction.confidence).abs() < 1e-12);
        assert_eq!(controller.buffered_feedback().len(), 1);
    }

    #[test]
    fn test_full_buffer_triggers_learning_pass() {
        let mut controller = trained(small_config());
        for _ in 0..2 {
            controller.provide_feedback("I love it", Label::Negative, None, None);
        }
        let outcome = controller.provide_feedback("I love it", Label::Negative, None, None);

        let report = outcome.learning_pass.unwrap();
        assert_eq!(report.hard_examples, 3);
        assert_eq!(report.reinforcement_examples, 0);
        assert_eq!(report.flushed, 3);
        assert!(controller.buffered_feedback().is_empty());
        assert_eq!(controller.auto_learning_stats().retraining_events, 1);
        assert!(controller.auto_learning_stats().last_retraining.is_some());
    }

    #[test]
    fn test_force_process_on_empty_buffer_is_noop() {
        let mut controller = trained(small_config());
        assert!(controller.force_process_buffer().is_none());
        assert_eq!(controller.auto_learning_stats().retraining_events, 0);
    }

    #[test]
    fn test_reset_clears_everything_but_model() {
        let mut controller = trained(small_config());
        controller.provide_feedback("I hate it", Label::Negative, None, None);
        controller.reset_auto_learning_stats();

        assert_eq!(controller.auto_learning_stats(), AutoLearningStats::default());
        assert_eq!(controller.confusion_matrix().total(), 0);
        assert!(controller.buffered_feedback().is_empty());
        assert_eq!(controller.classifier_stats().vocabulary_size, 6);
    }

    #[test]
    fn test_restore_rejects_inconsistent_snapshot() {
        let mut controller = trained(small_config());
        controller.provide_feedback("I hate it", Label::Negative, None, None);
        let data = controller.serialize_with_auto_learning().unwrap();
        let tampered = data.replace("\"totalFeedbacks\":1", "\"totalFeedbacks\":7");

        let mut fresh = AutoLearningController::new(small_config());
        assert!(fresh.deserialize_with_auto_learning(&tampered).is_err());
        assert_eq!(fresh.auto_learning_stats().total_feedbacks, 0);
    }
}
