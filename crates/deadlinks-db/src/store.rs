use std::path::{Path, PathBuf};

use deadlinks_core::error::AppError;
use deadlinks_core::outcome::{Availability, Outcome, Success};
use deadlinks_core::traits::OutcomeStore;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};

/// SQLite-backed outcome store.
///
/// Every call opens its own connection and lets it close on drop; a missing
/// database file is created transparently, so each call is self-contained.
/// There is no coordination between concurrent writers — the row-level
/// upsert means last write wins. Hosts processing documents concurrently
/// should serialize passes or use distinct cache files.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, AppError> {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);
        SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| {
                AppError::CacheError(format!("Failed to open {}: {e}", self.path.display()))
            })
    }

    /// Create the url_cache table if it does not exist yet. Idempotent.
    pub async fn initialize(&self) -> Result<(), AppError> {
        let mut conn = self.connect().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS url_cache (
                url TEXT PRIMARY KEY,
                availability INTEGER,
                success INTEGER,
                code INTEGER
            )
            "#,
        )
        .execute(&mut conn)
        .await
        .map_err(|e| AppError::CacheError(e.to_string()))?;
        Ok(())
    }

    /// Stored outcome for a URL, if any.
    pub async fn load(&self, url: &str) -> Result<Option<Outcome>, AppError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, OutcomeRow>(
            "SELECT availability, success, code FROM url_cache WHERE url = ?",
        )
        .bind(url)
        .fetch_optional(&mut conn)
        .await
        .map_err(|e| AppError::CacheError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// Upsert the outcome for a URL. Last write wins.
    pub async fn store(&self, url: &str, outcome: &Outcome) -> Result<(), AppError> {
        let mut conn = self.connect().await?;
        sqlx::query("REPLACE INTO url_cache (url, availability, success, code) VALUES (?, ?, ?, ?)")
            .bind(url)
            .bind(encode_availability(outcome.availability))
            .bind(encode_success(outcome.success))
            .bind(outcome.code.map(i64::from))
            .execute(&mut conn)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))?;
        Ok(())
    }
}

// -- Internal row type for sqlx deserialization --

/// Tri-states persist as nullable integers: 1/0 for the definite states,
/// NULL for unknown, so a stored outcome round-trips exactly.
#[derive(sqlx::FromRow)]
struct OutcomeRow {
    availability: Option<i64>,
    success: Option<i64>,
    code: Option<i64>,
}

impl From<OutcomeRow> for Outcome {
    fn from(row: OutcomeRow) -> Self {
        Outcome {
            availability: match row.availability {
                Some(0) => Availability::Unreachable,
                Some(_) => Availability::Reachable,
                None => Availability::Unknown,
            },
            success: match row.success {
                Some(0) => Success::NotOk,
                Some(_) => Success::Ok,
                None => Success::Unknown,
            },
            code: row.code.map(|code| code as u16),
        }
    }
}

fn encode_availability(availability: Availability) -> Option<i64> {
    match availability {
        Availability::Reachable => Some(1),
        Availability::Unreachable => Some(0),
        Availability::Unknown => None,
    }
}

fn encode_success(success: Success) -> Option<i64> {
    match success {
        Success::Ok => Some(1),
        Success::NotOk => Some(0),
        Success::Unknown => None,
    }
}

// -- Trait implementation --

impl OutcomeStore for SqliteStore {
    async fn initialize(&self) -> Result<(), AppError> {
        SqliteStore::initialize(self).await
    }

    async fn load(&self, url: &str) -> Result<Option<Outcome>, AppError> {
        SqliteStore::load(self, url).await
    }

    async fn store(&self, url: &str, outcome: &Outcome) -> Result<(), AppError> {
        SqliteStore::store(self, url, outcome).await
    }
}
