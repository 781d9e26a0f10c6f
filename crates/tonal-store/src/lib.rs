//! Tonal Storage Layer
//!
//! Implements the HistoryStore trait over a single SQLite table.
//!
//! # Architecture
//!
//! - One `analysis_results` table, append-only: the store exposes INSERT
//!   and SELECT-by-recency and nothing else
//! - Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text; the implicit
//!   autoincrement id breaks ordering ties when timestamps collide
//!
//! # Examples
//!
//! ```no_run
//! use tonal_store::SqliteStore;
//!
//! let store = SqliteStore::open(":memory:").unwrap();
//! // Store is now ready for append/recent calls
//! ```

#![warn(missing_docs)]

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::path::Path;
use thiserror::Error;
use tonal_domain::traits::HistoryStore;
use tonal_domain::{AnalysisRecord, ScoreSet, Sentiment, TIMESTAMP_FORMAT};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data found in a stored row
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of HistoryStore
///
/// Provides persistent, append-only storage for completed analyses.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. The session layer serializes
/// access behind a mutex; the connection is opened once per session and
/// closed exactly once when the store is dropped.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store at the given database path, creating the schema if needed.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tonal_store::SqliteStore;
    ///
    /// let store = SqliteStore::open("tonal.db").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Parse a stored timestamp column back into a date-time
    fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, StoreError> {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| StoreError::InvalidData(format!("bad timestamp {:?}: {}", raw, e)))
    }

    /// Parse a stored predicted-label column back into a sentiment
    fn parse_label(raw: &str) -> Result<Sentiment, StoreError> {
        Sentiment::from_label(raw)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown predicted label: {}", raw)))
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnalysisRecord> {
        let timestamp: String = row.get(0)?;
        let text: String = row.get(1)?;
        let scores = ScoreSet::new(row.get(2)?, row.get(3)?, row.get(4)?);
        let label: String = row.get(5)?;

        let completed_at = Self::parse_timestamp(&timestamp).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let predicted = Self::parse_label(&label).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(AnalysisRecord {
            completed_at,
            text,
            scores,
            predicted,
        })
    }
}

impl HistoryStore for SqliteStore {
    type Error = StoreError;

    fn append(&mut self, record: &AnalysisRecord) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO analysis_results
             (timestamp, text_content, positive_score, negative_score, neutral_score, predicted_label)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.timestamp(),
                &record.text,
                record.scores.positive,
                record.scores.negative,
                record.scores.neutral,
                record.predicted.label(),
            ],
        )?;

        tracing::debug!(predicted = record.predicted.label(), "analysis appended");
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AnalysisRecord>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, text_content, positive_score, negative_score, neutral_score, predicted_label
             FROM analysis_results
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;

        let records = stmt
            .query_map(params![limit as i64], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
