//! Error types of the logging core

use thiserror::Error;

/// Boxed source error coming from a storage collaborator
pub type StorageError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced per logger by the store and the operator service.
///
/// A denied log call is not an error; it is dropped silently.
#[derive(Debug, Error)]
pub enum DevLogError {
    /// Looking up or creating the logger's record failed
    #[error("failed to resolve log record for logger '{logger}': {source}")]
    StorageLookup {
        logger: String,
        #[source]
        source: StorageError,
    },

    /// Reading back or writing the record body failed
    #[error("failed to write log record '{slug}': {source}")]
    StorageWrite {
        slug: String,
        #[source]
        source: StorageError,
    },

    /// Listing the stored records failed
    #[error("failed to list log records: {source}")]
    StorageList {
        #[source]
        source: StorageError,
    },

    /// No record exists under the given slug
    #[error("log record not found: {0}")]
    RecordNotFound(String),
}

impl DevLogError {
    pub(crate) fn lookup(logger: impl Into<String>, source: anyhow::Error) -> Self {
        Self::StorageLookup {
            logger: logger.into(),
            source: source.into(),
        }
    }

    pub(crate) fn list(source: anyhow::Error) -> Self {
        Self::StorageList {
            source: source.into(),
        }
    }

    pub(crate) fn write(slug: impl Into<String>, source: anyhow::Error) -> Self {
        Self::StorageWrite {
            slug: slug.into(),
            source: source.into(),
        }
    }
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, DevLogError>;
