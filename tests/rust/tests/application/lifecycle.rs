//! Unit of work lifecycle against real and mock storage

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

use devlogs_core::{DevLogError, FlushState, LogRecordRepository, LOG_RECORD_TYPE};
use tests::db::TestDatabase;
use tests::fixtures::{development_devlogs, policy, request_snapshot};
use tests::capture::CapturedLogs;
use tests::lines::{messages, prefix_pattern};
use tests::mocks::{FlakyLogRecordRepository, RecordingLogRecordRepository, RepoCall};
use tests::{DevLogs, Environment, LogOverride};

#[tokio::test]
async fn order_scenario_persists_one_record() {
    tests::init_test_tracing();
    let test_db = TestDatabase::new();
    let repo: Arc<dyn LogRecordRepository> = test_db.repository();
    let devlogs = development_devlogs(repo.clone());

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/checkout"));
    assert!(unit.log("billing", "Order", &json!({"id": 42})));
    let report = devlogs.end_unit_of_work(&mut unit).await;
    assert!(report.is_success());

    let record = repo
        .find_by_slug("logger-billing", LOG_RECORD_TYPE)
        .await
        .unwrap()
        .expect("record should be created on flush");
    assert_eq!(record.title, "Logger: billing");

    let prefix = prefix_pattern();
    assert!(prefix.is_match(&record.body), "body: {:?}", record.body);
    assert!(record
        .body
        .contains(&format!(" {}] ", unit.request_id())));
    assert_eq!(
        prefix.replace(&record.body, ""),
        "Order = Array\n(\n    [id] => 42\n)\n"
    );
}

#[tokio::test]
async fn lines_are_persisted_in_order() {
    let test_db = TestDatabase::in_memory();
    let repo: Arc<dyn LogRecordRepository> = test_db.repository();
    let devlogs = development_devlogs(repo.clone());

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    for n in 1..=5 {
        unit.log_message("billing", &format!("step {}", n));
    }
    devlogs.end_unit_of_work(&mut unit).await;

    let record = repo
        .find_by_slug("logger-billing", LOG_RECORD_TYPE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        messages(&record.body),
        vec!["step 1", "step 2", "step 3", "step 4", "step 5"]
    );
}

#[tokio::test]
async fn consecutive_requests_append_to_the_same_record() {
    let test_db = TestDatabase::in_memory();
    let repo: Arc<dyn LogRecordRepository> = test_db.repository();
    let devlogs = development_devlogs(repo.clone());

    for uri in ["/first", "/second"] {
        let mut unit = devlogs.start_unit_of_work(&request_snapshot(uri));
        unit.log_message("billing", uri);
        devlogs.end_unit_of_work(&mut unit).await;
    }

    let records = repo.list(LOG_RECORD_TYPE).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(messages(&records[0].body), vec!["/first", "/second"]);
}

#[tokio::test]
async fn ending_twice_does_not_duplicate_lines() {
    let repo = RecordingLogRecordRepository::new();
    let devlogs = development_devlogs(repo.clone());

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    unit.log_message("billing", "once");
    devlogs.end_unit_of_work(&mut unit).await;
    let calls_after_first = repo.call_count();

    let report = devlogs.end_unit_of_work(&mut unit).await;
    assert!(report.is_empty());
    assert_eq!(repo.call_count(), calls_after_first);
    assert_eq!(unit.state(), FlushState::Flushed);

    let record = repo
        .inner
        .find_by_slug("logger-billing", LOG_RECORD_TYPE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(messages(&record.body), vec!["once"]);
}

#[tokio::test]
async fn idle_unit_of_work_never_touches_storage() {
    let repo = RecordingLogRecordRepository::new();
    let devlogs = development_devlogs(repo.clone());

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    let report = devlogs.end_unit_of_work(&mut unit).await;

    assert!(report.is_empty());
    assert_eq!(repo.calls(), Vec::<RepoCall>::new());
}

#[tokio::test]
async fn flush_resolves_then_appends_per_logger() {
    let repo = RecordingLogRecordRepository::new();
    let devlogs = development_devlogs(repo.clone());

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    unit.log_message("billing", "b");
    unit.log_message("shipping", "s");
    devlogs.end_unit_of_work(&mut unit).await;

    let lookups: Vec<_> = repo
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            RepoCall::FindBySlug(slug) => Some(slug),
            _ => None,
        })
        .collect();
    assert_eq!(lookups, vec!["logger-billing", "logger-shipping"]);
    assert_eq!(
        repo.calls()
            .iter()
            .filter(|c| matches!(c, RepoCall::UpdateBody(_)))
            .count(),
        2
    );
}

#[tokio::test]
async fn denied_logs_create_nothing() {
    let test_db = TestDatabase::in_memory();
    let repo: Arc<dyn LogRecordRepository> = test_db.repository();
    let devlogs = DevLogs::new(
        policy(Environment::Production, LogOverride::Disabled),
        repo.clone(),
    );

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    assert!(!unit.log("billing", "Order", &json!({"id": 42})));
    assert!(unit.buffer().is_empty());
    devlogs.end_unit_of_work(&mut unit).await;

    assert!(repo.list(LOG_RECORD_TYPE).await.unwrap().is_empty());
}

#[tokio::test]
async fn failing_logger_does_not_block_others() {
    let repo = Arc::new(
        FlakyLogRecordRepository::new()
            .fail_lookup("logger-billing")
            .fail_write("logger-audit"),
    );
    let devlogs = development_devlogs(repo.clone());

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    unit.log_message("billing", "lost on lookup");
    unit.log_message("audit", "lost on write");
    unit.log_message("shipping", "kept");
    let report = devlogs.end_unit_of_work(&mut unit).await;

    assert_eq!(report.failures.len(), 2);
    assert!(matches!(
        report.failures[0].error,
        DevLogError::StorageLookup { .. }
    ));
    assert!(matches!(
        report.failures[1].error,
        DevLogError::StorageWrite { .. }
    ));

    assert_eq!(report.persisted.len(), 1);
    assert_eq!(report.persisted[0].slug, "logger-shipping");
    let shipping = repo
        .inner
        .find_by_slug("logger-shipping", LOG_RECORD_TYPE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(messages(&shipping.body), vec!["kept"]);
}

#[tokio::test]
async fn request_ids_differ_between_requests() {
    let devlogs = development_devlogs(RecordingLogRecordRepository::new());
    let a = devlogs.start_unit_of_work(&request_snapshot("/a"));
    let b = devlogs.start_unit_of_work(&request_snapshot("/b"));
    let a_again = devlogs.start_unit_of_work(&request_snapshot("/a"));

    assert_ne!(a.request_id(), b.request_id());
    assert_eq!(a.request_id(), a_again.request_id());
}

#[tokio::test]
async fn first_flush_reports_record_creation() {
    let logs = CapturedLogs::start();
    let devlogs = development_devlogs(RecordingLogRecordRepository::new());

    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    unit.log_message("billing", "first");
    devlogs.end_unit_of_work(&mut unit).await;

    assert!(logs.contains("Created record logger-billing"));
}

#[tokio::test]
async fn record_inserted_by_concurrent_writer_is_reused() {
    let repo = Arc::new(FlakyLogRecordRepository::new().miss_lookup("logger-billing"));
    let existing = tests::fixtures::record("billing");
    repo.inner.create(&existing).await.unwrap();

    let logs = CapturedLogs::start();
    let devlogs = development_devlogs(repo.clone());
    let mut unit = devlogs.start_unit_of_work(&request_snapshot("/"));
    unit.log_message("billing", "late");
    let report = devlogs.end_unit_of_work(&mut unit).await;

    assert_eq!(report.persisted[0].record_id, existing.id);
    assert_eq!(repo.inner.len().await, 1);
    assert!(!logs.contains("Created record"));
    assert!(logs.contains("Resolved concurrent record logger-billing"));
}
