//! In-memory LogRecordRepository, for tests and throwaway processes

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LogRecordRepository, RepoResult};
use crate::domain::LogRecord;

/// Map-backed repository.
///
/// `insert_if_absent` runs under one write lock, so it is race-free within
/// the process.
#[derive(Default)]
pub struct MemoryLogRecordRepository {
    records: RwLock<HashMap<Uuid, LogRecord>>,
}

impl MemoryLogRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl LogRecordRepository for MemoryLogRecordRepository {
    async fn list(&self, record_type: &str) -> RepoResult<Vec<LogRecord>> {
        let mut records: Vec<LogRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.record_type == record_type)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(records)
    }

    async fn get(&self, id: &Uuid) -> RepoResult<Option<LogRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str, record_type: &str) -> RepoResult<Option<LogRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.slug == slug && r.record_type == record_type)
            .cloned())
    }

    async fn create(&self, record: &LogRecord) -> RepoResult<()> {
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|r| r.slug == record.slug && r.record_type == record.record_type)
        {
            anyhow::bail!("Log record already exists: {}", record.slug);
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, record: &LogRecord) -> RepoResult<LogRecord> {
        let mut records = self.records.write().await;
        if let Some(existing) = records
            .values()
            .find(|r| r.slug == record.slug && r.record_type == record.record_type)
        {
            return Ok(existing.clone());
        }
        records.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn update_body(&self, id: &Uuid, body: &str) -> RepoResult<()> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(id) else {
            anyhow::bail!("Log record not found: {}", id);
        };
        record.body = body.to_string();
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> RepoResult<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}
