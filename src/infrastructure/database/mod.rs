mod memory_repository;
mod postgres_repository;

pub use memory_repository::{create_memory_repository, MemoryRepository};
pub use postgres_repository::{create_postgres_repository, PostgresRepository};

use crate::config::{DatabaseConfig, StoreBackend};
use crate::domain::RepositoryPtr;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Delay between connection attempts while the database comes up.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Connects to PostgreSQL, retrying while the server is still starting,
/// then applies pending migrations.
///
/// # Errors
/// Returns the last connection error once `retry_count` attempts are spent,
/// or the migration error if the schema cannot be brought up to date.
pub async fn init_database_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let attempts = config.retry_count.max(1);
    let mut attempt = 0;

    let pool = loop {
        attempt += 1;
        let result = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await;

        match result {
            Ok(pool) => break pool,
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, "Database not ready: {err}");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                return Err(err).context(format!("Failed to connect after {attempts} attempts"))
            }
        }
    };

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database ready after {attempt} attempt(s)");
    Ok(pool)
}

/// Builds the repository selected by configuration.
pub async fn create_repository(backend: &StoreBackend) -> Result<RepositoryPtr> {
    // ---
    match backend {
        StoreBackend::Postgres(config) => {
            let pool = init_database_with_retry(config).await?;
            Ok(create_postgres_repository(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(create_memory_repository())
        }
    }
}
