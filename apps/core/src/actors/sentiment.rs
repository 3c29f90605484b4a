use crate::actors::messages::{ActorError, AppError, SentimentMessage};
use crate::actors::traits::{ComplexCaseAnalyzer, PersistenceAdapter};
use crate::config::ServiceConfig;
use crate::models::{ModelMetadata, PersistedModel};
use crate::sentiment::{
    AutoLearningController, AutoLearningStats, ClassifierStats, DriftReport, EnhancedPrediction,
    FeedbackOutcome, Label, LearningPassReport, PerformanceMetrics, SentimentPrediction,
    TrainingExample,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, instrument, warn};

/// A handle to the sentiment actor.
///
/// The actor owns one [`AutoLearningController`] and applies every request to
/// it in arrival order. Cloned handles talk to the same actor; separately
/// spawned handles are fully independent. The complex-case analyzer is called
/// from the handle, so a slow analyzer never holds up the actor.
#[derive(Clone)]
pub struct SentimentActorHandle {
    sender: mpsc::Sender<SentimentMessage>,
    request_timeout: Duration,
    analyzer: Option<Arc<dyn ComplexCaseAnalyzer>>,
    analyzer_timeout: Duration,
}

impl SentimentActorHandle {
    /// Spawns an actor with no analyzer and no persistence.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_collaborators(config, None, None)
    }

    /// Spawns an actor with optional collaborators.
    ///
    /// When a persistence adapter is given, the actor tries to load the model
    /// saved under `config.model_target` before handling its first message.
    pub fn with_collaborators(
        config: ServiceConfig,
        analyzer: Option<Arc<dyn ComplexCaseAnalyzer>>,
        persistence: Option<Arc<dyn PersistenceAdapter>>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.channel_capacity);
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let actor = SentimentRunner {
            receiver,
            controller: AutoLearningController::new(config.learning.clone()),
            persistence,
            model_target: config.model_target,
        };
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            request_timeout,
            analyzer,
            analyzer_timeout: Duration::from_millis(config.analyzer_timeout_ms),
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, AppError>>) -> SentimentMessage,
    ) -> Result<T, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(build(send))
            .await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?
    }

    #[instrument(skip(self, text))]
    pub async fn predict(&self, text: String) -> Result<SentimentPrediction, AppError> {
        self.request(|responder| SentimentMessage::Predict { text, responder })
            .await
    }

    /// Never fails. Analyzer errors and timeouts produce a fallback built from
    /// the base prediction; if the actor cannot answer either, the fallback
    /// carries an uninformed prediction.
    #[instrument(skip(self, text))]
    pub async fn predict_enhanced(&self, text: String) -> EnhancedPrediction {
        let reason = match &self.analyzer {
            None => "no analyzer configured".to_string(),
            Some(analyzer) => {
                match timeout(
                    self.analyzer_timeout,
                    analyzer.analyze_complex_case(text.clone()),
                )
                .await
                {
                    Ok(Ok(prediction)) => return prediction,
                    Ok(Err(e)) => {
                        warn!("Complex-case analyzer failed, using fallback: {}", e);
                        e.to_string()
                    }
                    Err(_) => {
                        warn!(
                            "Complex-case analyzer timed out after {:?}, using fallback",
                            self.analyzer_timeout
                        );
                        format!("timed out after {} ms", self.analyzer_timeout.as_millis())
                    }
                }
            }
        };

        let base = match self.predict(text).await {
            Ok(prediction) => prediction,
            Err(e) => {
                error!("Base prediction unavailable for fallback: {}", e);
                SentimentPrediction::uninformed()
            }
        };
        EnhancedPrediction::fallback(base, &reason)
    }

    #[instrument(skip(self, examples), fields(count = examples.len()))]
    pub async fn train(&self, examples: Vec<TrainingExample>) -> Result<ClassifierStats, AppError> {
        self.request(|responder| SentimentMessage::Train {
            examples,
            responder,
        })
        .await
    }

    #[instrument(skip(self, examples), fields(count = examples.len()))]
    pub async fn incremental_train(
        &self,
        examples: Vec<TrainingExample>,
    ) -> Result<ClassifierStats, AppError> {
        self.request(|responder| SentimentMessage::IncrementalTrain {
            examples,
            responder,
        })
        .await
    }

    #[instrument(skip(self, text))]
    pub async fn provide_feedback(
        &self,
        text: String,
        actual_label: Label,
        user_id: Option<String>,
        source: Option<String>,
    ) -> Result<FeedbackOutcome, AppError> {
        self.request(|responder| SentimentMessage::ProvideFeedback {
            text,
            actual_label,
            user_id,
            source,
            responder,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn force_process_buffer(&self) -> Result<Option<LearningPassReport>, AppError> {
        self.request(|responder| SentimentMessage::ForceProcessBuffer { responder })
            .await
    }

    pub async fn auto_learning_stats(&self) -> Result<AutoLearningStats, AppError> {
        self.request(|responder| SentimentMessage::GetStats { responder })
            .await
    }

    pub async fn current_metrics(&self) -> Result<PerformanceMetrics, AppError> {
        self.request(|responder| SentimentMessage::GetMetrics { responder })
            .await
    }

    pub async fn drift_report(&self) -> Result<Option<DriftReport>, AppError> {
        self.request(|responder| SentimentMessage::GetDriftReport { responder })
            .await
    }

    pub async fn classifier_stats(&self) -> Result<ClassifierStats, AppError> {
        self.request(|responder| SentimentMessage::GetClassifierStats { responder })
            .await
    }

    #[instrument(skip(self))]
    pub async fn reset_auto_learning_stats(&self) -> Result<(), AppError> {
        self.request(|responder| SentimentMessage::ResetStats { responder })
            .await
    }

    pub async fn serialize_with_auto_learning(&self) -> Result<String, AppError> {
        self.request(|responder| SentimentMessage::Snapshot { responder })
            .await
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn deserialize_with_auto_learning(&self, data: String) -> Result<(), AppError> {
        self.request(|responder| SentimentMessage::Restore { data, responder })
            .await
    }

    /// Persists the current model. Fails if no persistence adapter is configured.
    #[instrument(skip(self))]
    pub async fn save_model(&self) -> Result<ModelMetadata, AppError> {
        self.request(|responder| SentimentMessage::SaveModel { responder })
            .await
    }

    /// Flushes pending feedback and reloads the persisted model.
    ///
    /// Returns `true` when a persisted model replaced the in-memory one.
    #[instrument(skip(self))]
    pub async fn refresh_model(&self) -> Result<bool, AppError> {
        self.request(|responder| SentimentMessage::RefreshModel { responder })
            .await
    }

    /// Stops the actor after the messages already queued have been handled.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(SentimentMessage::Shutdown { responder: send })
            .await
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::Internal(e.to_string())))
    }
}

// --- Actor Runner ---
struct SentimentRunner {
    receiver: mpsc::Receiver<SentimentMessage>,
    controller: AutoLearningController,
    persistence: Option<Arc<dyn PersistenceAdapter>>,
    model_target: String,
}

impl SentimentRunner {
    async fn run(mut self) {
        info!("Sentiment actor started (target: {})", self.model_target);
        self.reload_persisted_model().await;

        while let Some(msg) = self.receiver.recv().await {
            if let SentimentMessage::Shutdown { responder } = msg {
                info!("Sentiment actor shutting down...");
                let _ = responder.send(());
                break;
            }
            self.handle_message(msg).await;
        }
        info!("Sentiment actor stopped");
    }

    async fn handle_message(&mut self, msg: SentimentMessage) {
        match msg {
            SentimentMessage::Predict { text, responder } => {
                let _ = responder.send(Ok(self.controller.predict(&text)));
            }
            SentimentMessage::Train {
                examples,
                responder,
            } => {
                self.controller.train(&examples);
                let _ = responder.send(Ok(self.controller.classifier_stats()));
            }
            SentimentMessage::IncrementalTrain {
                examples,
                responder,
            } => {
                self.controller.incremental_train(&examples);
                let _ = responder.send(Ok(self.controller.classifier_stats()));
            }
            SentimentMessage::ProvideFeedback {
                text,
                actual_label,
                user_id,
                source,
                responder,
            } => {
                let outcome =
                    self.controller
                        .provide_feedback(&text, actual_label, user_id, source);
                if outcome.refresh_requested {
                    self.reload_persisted_model().await;
                }
                let _ = responder.send(Ok(outcome));
            }
            SentimentMessage::ForceProcessBuffer { responder } => {
                let _ = responder.send(Ok(self.controller.force_process_buffer()));
            }
            SentimentMessage::GetStats { responder } => {
                let _ = responder.send(Ok(self.controller.auto_learning_stats()));
            }
            SentimentMessage::GetMetrics { responder } => {
                let _ = responder.send(Ok(self.controller.current_metrics()));
            }
            SentimentMessage::GetDriftReport { responder } => {
                let _ = responder.send(Ok(self.controller.drift_report()));
            }
            SentimentMessage::GetClassifierStats { responder } => {
                let _ = responder.send(Ok(self.controller.classifier_stats()));
            }
            SentimentMessage::ResetStats { responder } => {
                self.controller.reset_auto_learning_stats();
                let _ = responder.send(Ok(()));
            }
            SentimentMessage::Snapshot { responder } => {
                let _ = responder.send(self.controller.serialize_with_auto_learning());
            }
            SentimentMessage::Restore { data, responder } => {
                let result = self.controller.deserialize_with_auto_learning(&data);
                if let Err(e) = &result {
                    error!("Error restoring snapshot: {}", e);
                }
                let _ = responder.send(result);
            }
            SentimentMessage::SaveModel { responder } => {
                let result = self.save_model().await;
                if let Err(e) = &result {
                    error!("Error saving model: {}", e);
                }
                let _ = responder.send(result);
            }
            SentimentMessage::RefreshModel { responder } => {
                self.controller.trigger_model_refresh();
                let reloaded = self.reload_persisted_model().await;
                let _ = responder.send(Ok(reloaded));
            }
            SentimentMessage::Shutdown { responder } => {
                let _ = responder.send(());
            }
        }
    }

    /// Best-effort load of the persisted model. Any failure keeps the current model.
    async fn reload_persisted_model(&mut self) -> bool {
        let Some(persistence) = self.persistence.clone() else {
            debug!("No persistence adapter, skipping model reload");
            return false;
        };

        match persistence.load_naive_bayes_model(&self.model_target).await {
            Ok(Some(persisted)) => match self.controller.restore_model(persisted.model) {
                Ok(()) => {
                    info!(
                        "Loaded persisted model '{}' saved at {}",
                        self.model_target, persisted.metadata.saved_at
                    );
                    true
                }
                Err(e) => {
                    warn!("Persisted model '{}' is unusable: {}", self.model_target, e);
                    false
                }
            },
            Ok(None) => {
                info!("No persisted model under '{}'", self.model_target);
                false
            }
            Err(e) => {
                warn!("Failed to load model '{}': {}", self.model_target, e);
                false
            }
        }
    }

    async fn save_model(&self) -> Result<ModelMetadata, AppError> {
        let persistence = self.persistence.as_ref().ok_or(AppError::Config(
            "No persistence adapter configured".to_string(),
        ))?;

        let classifier = self.controller.classifier_stats();
        let metadata = ModelMetadata {
            target: self.model_target.clone(),
            saved_at: Utc::now(),
            vocabulary_size: classifier.vocabulary_size,
            training_examples: classifier.total_examples,
            accuracy: self.controller.current_metrics().accuracy,
        };
        let persisted = PersistedModel {
            model: self.controller.model_snapshot(),
            metadata: metadata.clone(),
        };

        persistence
            .save_naive_bayes_model(&self.model_target, &persisted)
            .await
            .map_err(|e| AppError::Actor(ActorError::Persistence(e.to_string())))?;
        info!("Saved model '{}'", self.model_target);
        Ok(metadata)
    }
}
