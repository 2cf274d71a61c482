/// Database connection pool management
///
/// This module builds the SQLite connection pool used by the whole process.
/// The database is a single file opened once at startup; SQLite itself
/// serializes writes, so no locking beyond the pool is needed.
///
/// WAL journal mode is enabled so readers are not blocked by the writer,
/// and foreign keys are switched on (SQLite defaults them off).

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file (e.g., "./tasktrack.db")
    pub path: String,

    /// Maximum number of connections in the pool
    ///
    /// SQLite allows a single writer at a time; a handful of connections
    /// is enough for read concurrency.
    pub max_connections: u32,

    /// How long a connection waits on a locked database before failing (seconds)
    pub busy_timeout_seconds: u64,

    /// Create the database file if it does not exist
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./tasktrack.db".to_string(),
            max_connections: 5,
            busy_timeout_seconds: 5,
            create_if_missing: true,
        }
    }
}

/// Creates and initializes the SQLite connection pool
///
/// This function:
/// 1. Opens (or creates) the database file with WAL journaling
/// 2. Performs a health check to verify the database is usable
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the health check fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(
        path = %config.path,
        max_connections = config.max_connections,
        "Opening database"
    );

    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(config.create_if_missing)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_seconds))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// Executes a trivial query to verify the database is reachable and responding.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        Ok(())
    } else {
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool
///
/// Called during shutdown so WAL checkpointing can finish cleanly.
pub async fn close_pool(pool: &SqlitePool) {
    info!("Closing database connection pool");
    pool.close().await;
}
