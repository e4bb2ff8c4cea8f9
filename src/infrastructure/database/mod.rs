//! Database Module
//!
//! PostgreSQL connection pool, migrations and transaction scope.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::config::DatabaseSettings;
use crate::shared::error::AppError;

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Execute a closure within one transaction, committing on success.
///
/// Multi-row writes (room + membership batch creation, leave with room
/// garbage collection) go through this so partial state is never observable
/// to other readers.
///
/// # Example
/// ```ignore
/// let room = execute_in_transaction(&pool, |tx| Box::pin(async move {
///     sqlx::query("INSERT INTO chat_rooms ...").execute(&mut **tx).await?;
///     sqlx::query("INSERT INTO chat_room_members ...").execute(&mut **tx).await?;
///     Ok(room)
/// })).await?;
/// ```
pub async fn execute_in_transaction<F, T>(pool: &PgPool, f: F) -> Result<T, AppError>
where
    F: for<'c> FnOnce(
        &'c mut Transaction<'static, Postgres>,
    ) -> Pin<Box<dyn Future<Output = Result<T, sqlx::Error>> + Send + 'c>>,
{
    let mut tx = pool.begin().await.map_err(AppError::Database)?;

    // The transaction rolls back on drop if the closure fails.
    let result = f(&mut tx).await.map_err(AppError::Database)?;

    tx.commit().await.map_err(AppError::Database)?;

    Ok(result)
}
