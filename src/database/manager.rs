use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("DATABASE_URL is not set")]
    ConfigMissing,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Process-wide connection pool. Ownership is row-level in this schema, so
/// one database serves every principal.
pub struct Database;

impl Database {
    /// Get the shared pool, creating it lazily on first use.
    pub async fn pool() -> Result<&'static PgPool, StoreError> {
        POOL.get_or_try_init(|| async {
            let database_url =
                std::env::var("DATABASE_URL").map_err(|_| StoreError::ConfigMissing)?;
            let db_config = &config::config().database;

            let pool = PgPoolOptions::new()
                .max_connections(db_config.max_connections)
                .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
                .connect(&database_url)
                .await?;

            info!("Created database pool");
            Ok(pool)
        })
        .await
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Apply pending migrations from the bundled migrations directory.
    pub async fn migrate() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Migrations are up to date");
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        if let Some(pool) = POOL.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
