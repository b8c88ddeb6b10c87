//! SQLite implementation of LogRecordRepository.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devlogs_core::{LogRecord, LogRecordRepository};
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::Database;

const SELECT_COLUMNS: &str =
    "SELECT id, record_type, title, slug, body, created_at, updated_at FROM log_records";

/// SQLite-backed implementation of LogRecordRepository.
pub struct SqliteLogRecordRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteLogRecordRepository {
    /// Create a new SQLite log record repository.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Parse a datetime string to DateTime<Utc>.
    /// Handles both RFC3339 format and SQLite's `datetime('now')` format.
    fn parse_datetime(s: &str) -> DateTime<Utc> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return dt.with_timezone(&Utc);
        }

        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return dt.and_utc();
        }

        Utc::now()
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<LogRecord> {
        let id_str: String = row.get(0)?;
        Ok(LogRecord {
            id: id_str.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "[LogRecordRepository] Failed to parse UUID '{}': {}",
                    id_str,
                    e
                );
                Uuid::nil()
            }),
            record_type: row.get(1)?,
            title: row.get(2)?,
            slug: row.get(3)?,
            body: row.get(4)?,
            created_at: Self::parse_datetime(&row.get::<_, String>(5)?),
            updated_at: Self::parse_datetime(&row.get::<_, String>(6)?),
        })
    }

    fn select_by_slug(
        conn: &rusqlite::Connection,
        slug: &str,
        record_type: &str,
    ) -> Result<Option<LogRecord>> {
        let record = conn
            .query_row(
                &format!("{} WHERE slug = ?1 AND record_type = ?2", SELECT_COLUMNS),
                params![slug, record_type],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }
}

#[async_trait]
impl LogRecordRepository for SqliteLogRecordRepository {
    async fn list(&self, record_type: &str) -> Result<Vec<LogRecord>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn.prepare(&format!(
            "{} WHERE record_type = ?1 ORDER BY title ASC",
            SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![record_type], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("[LogRecordRepository::list] Returning {} records", records.len());

        Ok(records)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<LogRecord>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let record = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id.to_string()],
                Self::row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    async fn find_by_slug(&self, slug: &str, record_type: &str) -> Result<Option<LogRecord>> {
        let db = self.db.lock().await;
        Self::select_by_slug(db.connection(), slug, record_type)
    }

    async fn create(&self, record: &LogRecord) -> Result<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        conn.execute(
            "INSERT INTO log_records (id, record_type, title, slug, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.to_string(),
                record.record_type,
                record.title,
                record.slug,
                record.body,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )
        .with_context(|| format!("Failed to create log record {}", record.slug))?;

        Ok(())
    }

    /// Atomic under the `(record_type, slug)` UNIQUE constraint, across
    /// processes sharing the database file.
    async fn insert_if_absent(&self, record: &LogRecord) -> Result<LogRecord> {
        let db = self.db.lock().await;

        db.transaction(|conn| {
            let inserted = conn.execute(
                "INSERT INTO log_records (id, record_type, title, slug, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(record_type, slug) DO NOTHING",
                params![
                    record.id.to_string(),
                    record.record_type,
                    record.title,
                    record.slug,
                    record.body,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;

            if inserted == 0 {
                tracing::debug!(
                    "[LogRecordRepository::insert_if_absent] {} already exists",
                    record.slug
                );
            }

            Self::select_by_slug(conn, &record.slug, &record.record_type)?.with_context(|| {
                format!("Log record {} vanished after insert", record.slug)
            })
        })
    }

    async fn update_body(&self, id: &Uuid, body: &str) -> Result<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let rows_affected = conn.execute(
            "UPDATE log_records SET body = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.to_string(), body, Utc::now().to_rfc3339()],
        )?;

        if rows_affected == 0 {
            anyhow::bail!("Log record not found: {}", id);
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let rows_affected =
            conn.execute("DELETE FROM log_records WHERE id = ?1", params![id.to_string()])?;

        Ok(rows_affected > 0)
    }
}
