//! SqliteLogRecordRepository against an on-disk database

use pretty_assertions::assert_eq;
use std::sync::Arc;

use devlogs_core::{LogRecordRepository, LogStore, LoggerName, LOG_RECORD_TYPE};
use devlogs_storage::{Database, SqliteLogRecordRepository};
use tests::db::TestDatabase;
use tests::fixtures::record;

#[tokio::test]
async fn insert_if_absent_twice_yields_one_row() {
    let test_db = TestDatabase::new();
    let repo = test_db.repository();

    let first = repo.insert_if_absent(&record("billing")).await.unwrap();
    let second = repo.insert_if_absent(&record("billing")).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(repo.list(LOG_RECORD_TYPE).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_first_writers_share_one_record() {
    let test_db = TestDatabase::new();
    let repo: Arc<dyn LogRecordRepository> = test_db.repository();
    let store = LogStore::new(repo.clone());
    let logger = LoggerName::new("billing");

    let (a, b) = tokio::join!(
        store.get_or_create_record(&logger),
        store.get_or_create_record(&logger)
    );

    assert_eq!(a.unwrap().id, b.unwrap().id);
    assert_eq!(repo.list(LOG_RECORD_TYPE).await.unwrap().len(), 1);
}

#[tokio::test]
async fn records_survive_reopen() {
    let test_db = TestDatabase::new();
    let billing = record("billing");
    {
        let repo = test_db.repository();
        repo.create(&billing).await.unwrap();
        repo.update_body(&billing.id, "line one").await.unwrap();
    }

    // A second connection, as a second process would open
    let db = Database::open(test_db.db_path()).unwrap();
    let repo = SqliteLogRecordRepository::new(Arc::new(tokio::sync::Mutex::new(db)));
    let stored = repo
        .find_by_slug("logger-billing", LOG_RECORD_TYPE)
        .await
        .unwrap()
        .expect("record should persist");

    assert_eq!(stored.id, billing.id);
    assert_eq!(stored.title, "Logger: billing");
    assert_eq!(stored.body, "line one");
    assert_eq!(
        stored.created_at.timestamp(),
        billing.created_at.timestamp()
    );
}

#[tokio::test]
async fn append_body_round_trip() {
    let test_db = TestDatabase::in_memory();
    let repo: Arc<dyn LogRecordRepository> = test_db.repository();
    let store = LogStore::new(repo.clone());

    let record = store
        .get_or_create_record(&LoggerName::new("billing"))
        .await
        .unwrap();
    repo.update_body(&record.id, "previous").await.unwrap();

    let rid = devlogs_core::RequestId::from_digest("abcdef");
    let at = chrono::Utc::now();
    let lines = vec![
        devlogs_core::LogLine::format(at, &rid, "a"),
        devlogs_core::LogLine::format(at, &rid, "b"),
    ];
    store.append_body(&record, &lines).await.unwrap();

    let stored = repo.get(&record.id).await.unwrap().unwrap();
    assert_eq!(
        stored.body,
        format!("previous\n{}\n{}", lines[0].as_str(), lines[1].as_str())
    );
}

#[tokio::test]
async fn delete_missing_record_reports_false() {
    let test_db = TestDatabase::in_memory();
    let repo = test_db.repository();
    assert!(!repo.delete(&uuid::Uuid::new_v4()).await.unwrap());
}
