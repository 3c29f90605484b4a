//! JSON-lines command protocol spoken by the `sentiment-core` binary.
//!
//! Each input line is one [`Command`] tagged by `"op"`; each produces exactly
//! one [`Response`] line.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::actors::sentiment::SentimentActorHandle;
use crate::error::AppError;
use crate::sentiment::{Label, TrainingExample};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Predict {
        text: String,
    },
    PredictEnhanced {
        text: String,
    },
    Train {
        examples: Vec<TrainingExample>,
    },
    IncrementalTrain {
        examples: Vec<TrainingExample>,
    },
    Feedback {
        text: String,
        label: Label,
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        source: Option<String>,
    },
    Flush,
    Stats,
    Metrics,
    Reset,
    Snapshot,
    Restore {
        data: String,
    },
    Save,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Runs one command against the actor.
pub async fn dispatch(handle: &SentimentActorHandle, command: Command) -> Result<Value, AppError> {
    let value = match command {
        Command::Predict { text } => serde_json::to_value(handle.predict(text).await?)?,
        Command::PredictEnhanced { text } => {
            serde_json::to_value(handle.predict_enhanced(text).await)?
        }
        Command::Train { examples } => serde_json::to_value(handle.train(examples).await?)?,
        Command::IncrementalTrain { examples } => {
            serde_json::to_value(handle.incremental_train(examples).await?)?
        }
        Command::Feedback {
            text,
            label,
            user_id,
            source,
        } => serde_json::to_value(
            handle
                .provide_feedback(text, label, user_id, source)
                .await?,
        )?,
        Command::Flush => serde_json::to_value(handle.force_process_buffer().await?)?,
        Command::Stats => json!({
            "autoLearning": handle.auto_learning_stats().await?,
            "classifier": handle.classifier_stats().await?,
            "drift": handle.drift_report().await?,
        }),
        Command::Metrics => serde_json::to_value(handle.current_metrics().await?)?,
        Command::Reset => {
            handle.reset_auto_learning_stats().await?;
            Value::Null
        }
        Command::Snapshot => Value::String(handle.serialize_with_auto_learning().await?),
        Command::Restore { data } => {
            handle.deserialize_with_auto_learning(data).await?;
            Value::Null
        }
        Command::Save => serde_json::to_value(handle.save_model().await?)?,
        Command::Refresh => json!({ "reloaded": handle.refresh_model().await? }),
    };
    Ok(value)
}

/// Parses and runs one input line. Never fails: problems become error responses.
pub async fn handle_line(handle: &SentimentActorHandle, line: &str) -> Response {
    let command = match serde_json::from_str::<Command>(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("Rejected malformed command: {}", e);
            return Response::failure(format!("Malformed command: {}", e));
        }
    };

    debug!("Dispatching command: {:?}", command);
    match dispatch(handle, command).await {
        Ok(result) => Response::success(result),
        Err(e) => Response::failure(e),
    }
}
