use serde::Serialize;
use tokio::sync::oneshot;

use crate::models::ModelMetadata;
use crate::sentiment::{
    AutoLearningStats, ClassifierStats, DriftReport, FeedbackOutcome, Label, LearningPassReport,
    PerformanceMetrics, SentimentPrediction, TrainingExample,
};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// An error originating from the complex-case analyzer.
    #[error("Analyzer request failed: {0}")]
    Analyzer(String),
    /// An error originating from the persistence adapter.
    #[error("Persistence request failed: {0}")]
    Persistence(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

type Responder<T> = oneshot::Sender<Result<T, AppError>>;

/// Messages that can be sent to the sentiment actor.
#[derive(Debug)]
pub enum SentimentMessage {
    Predict {
        text: String,
        responder: Responder<SentimentPrediction>,
    },
    /// Destructive retraining from scratch.
    Train {
        examples: Vec<TrainingExample>,
        responder: Responder<ClassifierStats>,
    },
    IncrementalTrain {
        examples: Vec<TrainingExample>,
        responder: Responder<ClassifierStats>,
    },
    ProvideFeedback {
        text: String,
        actual_label: Label,
        user_id: Option<String>,
        source: Option<String>,
        responder: Responder<FeedbackOutcome>,
    },
    /// Run a learning pass on whatever is buffered.
    ForceProcessBuffer {
        responder: Responder<Option<LearningPassReport>>,
    },
    GetStats {
        responder: Responder<AutoLearningStats>,
    },
    GetMetrics {
        responder: Responder<PerformanceMetrics>,
    },
    GetDriftReport {
        responder: Responder<Option<DriftReport>>,
    },
    GetClassifierStats {
        responder: Responder<ClassifierStats>,
    },
    ResetStats {
        responder: Responder<()>,
    },
    /// Serialize model, stats and confusion matrix to JSON.
    Snapshot {
        responder: Responder<String>,
    },
    Restore {
        data: String,
        responder: Responder<()>,
    },
    /// Persist the current model under the configured target.
    SaveModel {
        responder: Responder<ModelMetadata>,
    },
    /// Flush the buffer and reload the persisted model. Replies whether a model was loaded.
    RefreshModel {
        responder: Responder<bool>,
    },
    /// A command to stop the actor once earlier messages are handled.
    Shutdown { responder: oneshot::Sender<()> },
}
