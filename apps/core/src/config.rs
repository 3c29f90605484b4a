use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;
use validator::Validate;

use crate::error::AppError;

/// Tuning knobs of the auto-learning controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AutoLearningConfig {
    /// Feedback items collected before an automatic learning pass.
    #[validate(range(min = 1, max = 100_000))]
    pub buffer_size: usize,
    /// Confidence separating "hard" wrong predictions from "reinforcement" right ones.
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_threshold: f64,
    /// Accuracy drop between history windows that counts as drift.
    #[validate(range(min = 0.0, max = 1.0))]
    pub retraining_threshold: f64,
    /// Maximum length of the accuracy history, and the length required before drift checks.
    #[validate(range(min = 2))]
    pub performance_window_size: usize,
    /// Weight of the newest confidence in the running average.
    #[validate(range(min = 0.0, max = 1.0))]
    pub ema_alpha: f64,
    /// Reinforcement examples allowed per hard example.
    #[validate(range(min = 0.0, max = 1.0))]
    pub reinforcement_ratio: f64,
    /// Share of the history treated as "recent" by the drift detector.
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub recent_window_ratio: f64,
    /// Additive smoothing of token likelihoods.
    #[validate(range(exclusive_min = 0.0))]
    pub smoothing_alpha: f64,
}

impl Default for AutoLearningConfig {
    fn default() -> Self {
        Self {
            buffer_size: 100,
            confidence_threshold: 0.7,
            retraining_threshold: 0.05,
            performance_window_size: 50,
            ema_alpha: 0.1,
            reinforcement_ratio: 0.3,
            recent_window_ratio: 0.2,
            smoothing_alpha: 1.0,
        }
    }
}

/// Settings of the hosting actor and its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServiceConfig {
    #[validate(length(min = 1))]
    pub model_target: String,
    #[validate(range(min = 1))]
    pub analyzer_timeout_ms: u64,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1))]
    pub channel_capacity: usize,
    /// SQLite URL; `None` uses the file under the portable data directory.
    pub database_url: Option<String>,
    #[validate(nested)]
    pub learning: AutoLearningConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_target: "sentiment-default".to_string(),
            analyzer_timeout_ms: 5000,
            request_timeout_secs: 30,
            channel_capacity: 32,
            database_url: None,
            learning: AutoLearningConfig::default(),
        }
    }
}

fn env_override<T: FromStr>(key: &str, slot: &mut T) -> Result<(), AppError> {
    if let Ok(raw) = std::env::var(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw)))?;
        debug!("Config override from {}", key);
    }
    Ok(())
}

impl ServiceConfig {
    /// Defaults, overridden by `SENTIMENT_*` variables (a `.env` file is honored), then validated.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let mut config = Self::default();
        env_override("SENTIMENT_BUFFER_SIZE", &mut config.learning.buffer_size)?;
        env_override(
            "SENTIMENT_CONFIDENCE_THRESHOLD",
            &mut config.learning.confidence_threshold,
        )?;
        env_override(
            "SENTIMENT_RETRAINING_THRESHOLD",
            &mut config.learning.retraining_threshold,
        )?;
        env_override(
            "SENTIMENT_PERFORMANCE_WINDOW",
            &mut config.learning.performance_window_size,
        )?;
        env_override("SENTIMENT_MODEL_TARGET", &mut config.model_target)?;
        env_override(
            "SENTIMENT_ANALYZER_TIMEOUT_MS",
            &mut config.analyzer_timeout_ms,
        )?;
        if let Ok(url) = std::env::var("SENTIMENT_DATABASE_URL") {
            config.database_url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }
}
