//! Request history persistence.
//!
//! Stores one row per permission that has been dispatched at least once, so
//! a later status check can tell "never requested" apart from "permanently
//! denied". Backed by `SQLite` with an in-memory mode for tests.

use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Request history errors.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),
}

impl From<sqlx::Error> for HistoryError {
    fn from(e: sqlx::Error) -> Self {
        Self::Query(e.to_string())
    }
}

/// Persistent "was this permission requested before" flags.
#[derive(Clone)]
pub struct HistoryStore {
    pool: Pool<Sqlite>,
}

impl HistoryStore {
    /// Open or create a history store at the given file path.
    ///
    /// Creates the parent directory if it does not exist, enables WAL journal
    /// mode, foreign keys, and sets a 5-second busy timeout.
    pub async fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HistoryError::Io(e.to_string()))?;
        }

        let options =
            SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))
                .map_err(|e| HistoryError::Connection(e.to_string()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .foreign_keys(true)
                .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| HistoryError::Connection(e.to_string()))?;

        info!(path = %path.display(), "Request history opened");

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Open an in-memory history store (for testing).
    pub async fn open_in_memory() -> Result<Self, HistoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| HistoryError::Connection(e.to_string()))?
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| HistoryError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), HistoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| HistoryError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Flag a permission as requested. Idempotent.
    pub async fn mark_requested(&self, permission: &str) -> Result<(), HistoryError> {
        let now = unix_timestamp();

        sqlx::query(
            r"
            INSERT INTO request_log (permission, first_requested_at, last_requested_at)
            VALUES (?, ?, ?)
            ON CONFLICT(permission) DO UPDATE SET last_requested_at = excluded.last_requested_at
            ",
        )
        .bind(permission)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Whether a permission was ever flagged as requested.
    pub async fn was_requested(&self, permission: &str) -> Result<bool, HistoryError> {
        let row = sqlx::query("SELECT 1 FROM request_log WHERE permission = ?")
            .bind(permission)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}

/// Current time as a Unix timestamp (seconds since epoch).
#[allow(clippy::cast_possible_wrap)]
fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
