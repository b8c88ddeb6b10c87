//! Log admin service - operator access to stored log records

use std::sync::Arc;
use tracing::info;

use crate::domain::{LogRecord, LOG_RECORD_TYPE};
use crate::error::{DevLogError, Result};
use crate::repository::LogRecordRepository;

/// Service for viewing and maintaining log records
pub struct LogAdminService {
    repository: Arc<dyn LogRecordRepository>,
}

impl LogAdminService {
    /// Create a new LogAdminService
    pub fn new(repository: Arc<dyn LogRecordRepository>) -> Self {
        Self { repository }
    }

    /// List all log records, ordered by slug
    pub async fn list(&self) -> Result<Vec<LogRecord>> {
        let mut records = self
            .repository
            .list(LOG_RECORD_TYPE)
            .await
            .map_err(DevLogError::list)?;
        records.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(records)
    }

    /// Get one record by slug
    pub async fn view(&self, slug: &str) -> Result<LogRecord> {
        self.repository
            .find_by_slug(slug, LOG_RECORD_TYPE)
            .await
            .map_err(|e| DevLogError::lookup(slug, e))?
            .ok_or_else(|| DevLogError::RecordNotFound(slug.to_string()))
    }

    /// Body of a record with its download filename
    pub async fn download(&self, slug: &str) -> Result<(String, String)> {
        let record = self.view(slug).await?;
        Ok((record.download_filename(), record.body))
    }

    /// Clear a record's body, keeping the record
    pub async fn empty(&self, slug: &str) -> Result<LogRecord> {
        let mut record = self.view(slug).await?;
        self.repository
            .update_body(&record.id, "")
            .await
            .map_err(|e| DevLogError::write(slug, e))?;
        info!("[LogAdminService] Emptied {}", slug);
        record.body.clear();
        Ok(record)
    }

    /// Remove a record entirely
    pub async fn delete(&self, slug: &str) -> Result<()> {
        let record = self.view(slug).await?;
        let deleted = self
            .repository
            .delete(&record.id)
            .await
            .map_err(|e| DevLogError::write(slug, e))?;
        if !deleted {
            return Err(DevLogError::RecordNotFound(slug.to_string()));
        }
        info!("[LogAdminService] Deleted {}", slug);
        Ok(())
    }
}
