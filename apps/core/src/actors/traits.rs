use crate::actors::messages::AppError;
use crate::models::PersistedModel;
use crate::sentiment::EnhancedPrediction;
use async_trait::async_trait;

/// Defines the interface of a richer, slower sentiment analyzer.
///
/// Implementations may detect sarcasm, negation or mixed languages. Any error
/// they return is absorbed by the caller, which falls back to the Naive Bayes
/// prediction.
#[async_trait]
pub trait ComplexCaseAnalyzer: Send + Sync + 'static {
    /// Analyzes a text that the base classifier may get wrong.
    async fn analyze_complex_case(&self, text: String) -> Result<EnhancedPrediction, AppError>;
}

/// Defines where trained models are stored between runs.
///
/// Both operations are best-effort from the controller's point of view: a
/// failure is logged and the in-memory model stays in use.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync + 'static {
    /// Loads the model saved under `target`, `None` if nothing was saved yet.
    async fn load_naive_bayes_model(&self, target: &str)
        -> Result<Option<PersistedModel>, AppError>;

    /// Saves `model` under `target`, replacing any previous one.
    async fn save_naive_bayes_model(
        &self,
        target: &str,
        model: &PersistedModel,
    ) -> Result<(), AppError>;
}
