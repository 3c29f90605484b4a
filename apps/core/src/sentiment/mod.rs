//! # Sentiment Module
//!
//! Synchronous core of the auto-learning sentiment classifier.
//!
//! ## Components
//! - `label`: Labels, training examples and predictions
//! - `tokenizer`: Text normalization
//! - `vocabulary`: Token/class frequency table
//! - `naive_bayes`: Multinomial Naive Bayes classifier
//! - `metrics`: Confusion matrix and derived precision/recall/F1
//! - `drift`: Accuracy-drift detection
//! - `feedback`: Feedback records and buffer
//! - `enhanced`: Output shape of the complex-case analyzer
//! - `auto_learning`: Controller tying the above together

pub mod auto_learning;
pub mod drift;
pub mod enhanced;
pub mod feedback;
pub mod label;
pub mod metrics;
pub mod naive_bayes;
pub mod tokenizer;
pub mod vocabulary;

pub use auto_learning::{
    AutoLearningController, AutoLearningSnapshot, AutoLearningStats, FeedbackOutcome,
    LearningPassReport,
};
pub use drift::{DriftDetector, DriftReport};
pub use enhanced::{ComplexityFeatures, EnhancedPrediction};
pub use feedback::{FeedbackBuffer, FeedbackLoop};
pub use label::{Label, SentimentPrediction, TrainingExample};
pub use metrics::{ConfusionMatrix, LabelMetrics, PerformanceMetrics};
pub use naive_bayes::{ClassPriors, ClassifierStats, NaiveBayesClassifier, NaiveBayesSnapshot};
pub use tokenizer::Tokenizer;
pub use vocabulary::Vocabulary;
