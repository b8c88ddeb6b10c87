//! Repository traits for data access
//!
//! These traits define the storage contract the logging core needs without
//! specifying the implementation (SQLite, in-memory, etc.)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::LogRecord;

mod memory;

pub use memory::MemoryLogRecordRepository;

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// LogRecord repository trait
#[async_trait]
pub trait LogRecordRepository: Send + Sync {
    /// List all records of a record type, ordered by title
    async fn list(&self, record_type: &str) -> RepoResult<Vec<LogRecord>>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> RepoResult<Option<LogRecord>>;

    /// Find a record by slug within a record type
    async fn find_by_slug(&self, slug: &str, record_type: &str) -> RepoResult<Option<LogRecord>>;

    /// Create a new record
    async fn create(&self, record: &LogRecord) -> RepoResult<()>;

    /// Insert `record` unless one with the same `(record_type, slug)` exists,
    /// returning whichever record is stored afterwards.
    ///
    /// The default is a plain lookup followed by a create, which leaves a
    /// window where two concurrent first writers can both create. Backends
    /// with a uniqueness constraint should override this with an upsert.
    async fn insert_if_absent(&self, record: &LogRecord) -> RepoResult<LogRecord> {
        if let Some(existing) = self.find_by_slug(&record.slug, &record.record_type).await? {
            return Ok(existing);
        }
        self.create(record).await?;
        Ok(record.clone())
    }

    /// Replace the body of a record
    async fn update_body(&self, id: &Uuid, body: &str) -> RepoResult<()>;

    /// Delete a record. Returns `false` when it did not exist.
    async fn delete(&self, id: &Uuid) -> RepoResult<bool>;
}
