//! Test Module
//!
//! Test suite for the sentiment core.
//!
//! ## Test Categories
//! - `classifier_tests`: Naive Bayes training and prediction
//! - `auto_learning_tests`: Feedback cycle, learning passes, drift, snapshots
//! - `database_tests`: SQLite model store
//! - `actor_tests`: Sentiment actor with mock analyzer and persistence
