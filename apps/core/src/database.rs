use crate::actors::messages::AppError;
use crate::actors::traits::PersistenceAdapter;
use crate::fs_manager::PortablePathManager;
use crate::models::{ModelRow, PersistedModel};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use tracing::{debug, info};

/// URL of the SQLite file under the portable data directory.
pub fn default_database_url() -> String {
    let db_path = PortablePathManager::db_dir().join("sentiment.sqlite");
    format!("sqlite://{}", db_path.to_string_lossy())
}

pub async fn init_db(db_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    info!("Initializing database at: {}", db_url);

    let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS naive_bayes_models (
            target TEXT PRIMARY KEY,
            model TEXT NOT NULL,
            metadata TEXT NOT NULL,
            saved_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// Stores one model per target in SQLite, as JSON.
#[derive(Clone)]
pub struct SqlitePersistenceAdapter {
    pool: SqlitePool,
}

impl SqlitePersistenceAdapter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (and creates if needed) the database at `db_url`.
    pub async fn connect(db_url: &str) -> Result<Self, AppError> {
        Ok(Self::new(init_db(db_url, 5).await?))
    }

}

#[async_trait]
impl PersistenceAdapter for SqlitePersistenceAdapter {
    async fn load_naive_bayes_model(
        &self,
        target: &str,
    ) -> Result<Option<PersistedModel>, AppError> {
        let row = sqlx::query_as::<_, ModelRow>(
            r#"
            SELECT target, model, metadata, saved_at
            FROM naive_bayes_models
            WHERE target = ?
            "#,
        )
        .bind(target)
        .fetch_optional(&self.pool)
        .await?;

        debug!("Loaded model row for '{}': {}", target, row.is_some());
        Ok(row.map(PersistedModel::from))
    }

    async fn save_naive_bayes_model(
        &self,
        target: &str,
        model: &PersistedModel,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO naive_bayes_models (target, model, metadata, saved_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(target) DO UPDATE SET
                model = excluded.model,
                metadata = excluded.metadata,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(target)
        .bind(Json(&model.model))
        .bind(Json(&model.metadata))
        .bind(model.metadata.saved_at.timestamp())
        .execute(&self.pool)
        .await?;

        debug!("Saved model row for '{}'", target);
        Ok(())
    }
}
