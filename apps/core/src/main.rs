// Sentiment Core Entry Point
// Hosts one auto-learning controller and answers JSON-lines commands on stdin.

use anyhow::Context;
use sentiment_core::actors::sentiment::SentimentActorHandle;
use sentiment_core::actors::traits::PersistenceAdapter;
use sentiment_core::config::ServiceConfig;
use sentiment_core::database::{self, SqlitePersistenceAdapter};
use sentiment_core::fs_manager::PortablePathManager;
use sentiment_core::protocol;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries protocol responses, so logs go to stderr.
    let formatting_layer = BunyanFormattingLayer::new("sentiment-core".into(), std::io::stderr);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

/// Opens the model store. A failure leaves the actor without persistence.
async fn open_persistence(config: &ServiceConfig) -> Option<Arc<dyn PersistenceAdapter>> {
    let db_url = match &config.database_url {
        Some(url) => url.clone(),
        None => {
            if let Err(e) = PortablePathManager::init() {
                warn!("Failed to create data directories: {}", e);
                return None;
            }
            database::default_database_url()
        }
    };

    match SqlitePersistenceAdapter::connect(&db_url).await {
        Ok(adapter) => Some(Arc::new(adapter)),
        Err(e) => {
            warn!("Model store unavailable, running without persistence: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = ServiceConfig::from_env().context("Invalid configuration")?;
    info!(
        "Starting sentiment core (target: {}, buffer size: {})",
        config.model_target, config.learning.buffer_size
    );

    let persistence = open_persistence(&config).await;
    let handle = SentimentActorHandle::with_collaborators(config, None, persistence);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = protocol::handle_line(&handle, &line).await;
        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    handle.shutdown().await?;
    Ok(())
}
