//! SQLite persistence for the local analytics cache and the analysis audit
//! trail.
//!
//! There is no pool: every operation opens its own short-lived connection,
//! so concurrent analyses never share a handle and a refresh race resolves as
//! last writer wins.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::ConnectOptions;
use thiserror::Error;

use tgcpm_core::{AnalysisRecord, AuditSink, ChannelStatsRow, ChannelStatsStore, StoreError};

pub mod analyses;
pub mod channel_stats;

pub use analyses::StoredAnalysis;

// Path relative to crates/tgcpm-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("corrupt value in {column} for {handle}: {reason}")]
    Corrupt {
        handle: String,
        column: &'static str,
        reason: String,
    },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Corrupt {
                handle,
                column,
                reason,
            } => StoreError::Corrupt {
                handle,
                reason: format!("{column}: {reason}"),
            },
            other => StoreError::backend(other),
        }
    }
}

/// Connection factory plus the store seams the pipeline consumes.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    options: SqliteConnectOptions,
}

impl SqliteStore {
    /// Parses `database_url`. The database file is created on first connect
    /// if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the URL is not a valid SQLite URL.
    pub fn new(database_url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Ok(Self { options })
    }

    /// Opens a fresh connection for a single operation.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the database cannot be opened.
    pub async fn connect(&self) -> Result<SqliteConnection, DbError> {
        Ok(self.options.connect().await?)
    }

    /// Run all pending migrations. Returns the number applied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or any migration fails.
    pub async fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connect().await?;

        // _sqlx_migrations does not exist on a fresh database; treat as zero.
        let applied_before = applied_migrations(&mut conn).await;
        MIGRATOR.run(&mut conn).await?;
        let applied_after = applied_migrations(&mut conn).await;

        let delta = (applied_after - applied_before).max(0);
        let applied = usize::try_from(delta).unwrap_or(0);
        tracing::info!(applied, "database migrations complete");
        Ok(applied)
    }

    /// `SELECT 1` on a fresh connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the database cannot be reached.
    pub async fn health_check(&self) -> Result<(), DbError> {
        let mut conn = self.connect().await?;
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&mut conn)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or write fails.
    pub async fn upsert_channel_stats(&self, row: &ChannelStatsRow) -> Result<(), DbError> {
        let mut conn = self.connect().await?;
        channel_stats::upsert(&mut conn, row).await
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or read fails, or a stored row
    /// holds a value that cannot be represented.
    pub async fn list_recent_analyses(&self, limit: u32) -> Result<Vec<StoredAnalysis>, DbError> {
        let mut conn = self.connect().await?;
        analyses::list_recent(&mut conn, limit).await
    }
}

async fn applied_migrations(conn: &mut SqliteConnection) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(conn)
        .await
        .unwrap_or(0)
}

#[async_trait]
impl ChannelStatsStore for SqliteStore {
    async fn load(&self, handle: &str) -> Result<Option<ChannelStatsRow>, StoreError> {
        let mut conn = self.connect().await?;
        Ok(channel_stats::load(&mut conn, handle).await?)
    }
}

#[async_trait]
impl AuditSink for SqliteStore {
    async fn record(&self, record: &AnalysisRecord) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        analyses::record(&mut conn, record, chrono::Utc::now()).await?;
        Ok(())
    }
}

/// Stored integers are signed; counts read back must be non-negative.
pub(crate) fn to_count(handle: &str, column: &'static str, value: i64) -> Result<u64, DbError> {
    u64::try_from(value).map_err(|_| DbError::Corrupt {
        handle: handle.to_string(),
        column,
        reason: format!("negative count {value}"),
    })
}

/// Counts above `i64::MAX` are stored saturated.
pub(crate) fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
