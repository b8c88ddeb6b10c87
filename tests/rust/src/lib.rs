//! Shared test utilities and fixtures for DevLogs integration tests.

pub use devlogs_core::domain::{LogLine, LogRecord, LoggerName, RequestId, LOG_RECORD_TYPE};
pub use devlogs_core::{AccessPolicy, DevLogs, EnvSnapshot, Environment, LogOverride};

pub use mocks::{FlakyLogRecordRepository, RecordingLogRecordRepository, RepoCall};

/// Test fixture utilities
pub mod fixtures {
    use super::*;
    use std::sync::Arc;

    use devlogs_core::LogRecordRepository;

    /// Snapshot standing in for one incoming request
    pub fn request_snapshot(uri: &str) -> EnvSnapshot {
        EnvSnapshot::new()
            .with("REQUEST_METHOD", "GET")
            .with("REQUEST_URI", uri)
            .with("HTTP_HOST", "example.test")
    }

    /// Policy with a fixed environment mode
    pub fn policy(environment: Environment, enabled: LogOverride) -> AccessPolicy {
        AccessPolicy::new(environment, enabled)
    }

    /// DevLogs over `repository` in development mode with no override
    pub fn development_devlogs(repository: Arc<dyn LogRecordRepository>) -> DevLogs {
        DevLogs::new(
            policy(Environment::Development, LogOverride::Unset),
            repository,
        )
    }

    /// Stored, empty record for `name`
    pub fn record(name: &str) -> LogRecord {
        LogRecord::for_logger(&LoggerName::new(name))
    }
}

/// Line format assertions
pub mod lines {
    use regex::Regex;

    /// `[YYYY-MM-DD HH:MM:SS rid] ` prefix of every stored line
    pub fn prefix_pattern() -> Regex {
        Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} [0-9a-f]{6}\] ").unwrap()
    }

    /// Split a stored body into its lines, dropping the prefix of each
    /// line that carries one
    pub fn messages(body: &str) -> Vec<String> {
        let prefix = prefix_pattern();
        body.lines()
            .filter(|line| prefix.is_match(line))
            .map(|line| prefix.replace(line, "").into_owned())
            .collect()
    }
}

/// Database test helpers
pub mod db {
    use devlogs_storage::{Database, SqliteLogRecordRepository};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// Database file name
    const DB_FILE: &str = "devlogs.db";

    /// Temporary on-disk database
    pub struct TestDatabase {
        pub db: Arc<Mutex<Database>>,
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        /// Create a new test database in a temporary directory
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join(DB_FILE);
            let db = Database::open(&db_path).expect("Failed to open test database");
            Self {
                db: Arc::new(Mutex::new(db)),
                db_path,
                _temp_dir: temp_dir,
            }
        }

        /// Create an in-memory database for fast tests
        pub fn in_memory() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db = Database::open_in_memory().expect("Failed to open in-memory database");
            Self {
                db: Arc::new(Mutex::new(db)),
                db_path: PathBuf::new(),
                _temp_dir: temp_dir,
            }
        }

        /// Repository over this database
        pub fn repository(&self) -> Arc<SqliteLogRecordRepository> {
            Arc::new(SqliteLogRecordRepository::new(self.db.clone()))
        }

        /// Get the database directory path
        pub fn path(&self) -> &Path {
            self._temp_dir.path()
        }

        /// Get the full database file path
        pub fn db_path(&self) -> &Path {
            &self.db_path
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Tracing output captured on the current thread
pub mod capture {
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::dispatcher::DefaultGuard;
    use tracing_subscriber::util::SubscriberInitExt;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Formatted events at `DEBUG` and above, until dropped.
    ///
    /// Only events emitted on the creating thread are seen, which covers
    /// `#[tokio::test]` on its default current-thread runtime.
    pub struct CapturedLogs {
        buffer: SharedBuffer,
        _guard: DefaultGuard,
    }

    impl CapturedLogs {
        pub fn start() -> Self {
            let buffer = SharedBuffer::default();
            let writer = buffer.clone();
            let guard = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish()
                .set_default();
            Self {
                buffer,
                _guard: guard,
            }
        }

        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.buffer.0.lock().unwrap()).into_owned()
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.contents().contains(needle)
        }
    }
}

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
