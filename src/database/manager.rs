use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Database pool not initialized")]
    NotInitialized,

    #[error("Migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Connection pool holder for the quotation store.
///
/// `init` runs once at process startup; a missing `DATABASE_URL` is a fatal
/// configuration error, never a per-request condition.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect to the store and apply pending migrations.
    pub async fn init() -> Result<(), StoreError> {
        let raw = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;
        let url = url::Url::parse(&raw).map_err(|_| StoreError::InvalidDatabaseUrl)?;

        let cfg = config::config();
        let pool = PgPoolOptions::new()
            .max_connections(cfg.database.max_connections)
            .acquire_timeout(Duration::from_secs(cfg.database.connect_timeout_secs))
            .connect(url.as_str())
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        // First writer wins; a second init is a no-op
        let _ = POOL.set(pool);
        info!("Connected to quotation store");
        Ok(())
    }

    /// Get the shared pool. Fails if `init` has not completed.
    pub fn pool() -> Result<PgPool, StoreError> {
        POOL.get().cloned().ok_or(StoreError::NotInitialized)
    }

    /// Pings the store to ensure connectivity
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool()?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}
