use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::sentiment::NaiveBayesSnapshot;

/// Descriptive data stored next to a persisted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// The name the model is stored under.
    pub target: String,
    pub saved_at: DateTime<Utc>,
    pub vocabulary_size: usize,
    /// Number of training examples folded into the model.
    pub training_examples: u64,
    /// Feedback accuracy at save time.
    pub accuracy: f64,
}

/// A model plus its metadata, as exchanged with a persistence adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedModel {
    pub model: NaiveBayesSnapshot,
    pub metadata: ModelMetadata,
}

/// A row of the `naive_bayes_models` table.
#[derive(Debug, FromRow)]
pub struct ModelRow {
    pub target: String,
    pub model: Json<NaiveBayesSnapshot>,
    pub metadata: Json<ModelMetadata>,
    /// Unix timestamp of the last save.
    pub saved_at: i64,
}

impl From<ModelRow> for PersistedModel {
    fn from(row: ModelRow) -> Self {
        Self {
            model: row.model.0,
            metadata: row.metadata.0,
        }
    }
}
