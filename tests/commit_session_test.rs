// ==========================================
// Commit coordinator integration tests
// ==========================================
// Session gate semantics across a flaky boundary: a failed commit
// must leave the validated working set intact for a retry, and a
// committed session must refuse a second submission.
// ==========================================


use academic_import::{
    logging, BatchImporter, BatchImporterImpl, CommitStatus, EntityType, ImportConfig,
    ImportError, ImportResult, ImportStore, SqliteStore,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_helpers::csv_upload;

/// Store adapter whose first N commit calls fail with a transport
/// error; snapshot fetches always pass through.
struct FlakyStore {
    inner: SqliteStore,
    failures_left: AtomicUsize,
}

impl FlakyStore {
    fn failing_once() -> Self {
        Self {
            inner: SqliteStore::in_memory().expect("in-memory store"),
            failures_left: AtomicUsize::new(1),
        }
    }
}

#[async_trait]
impl ImportStore for FlakyStore {
    async fn fetch_existing_keys(&self, entity: EntityType) -> ImportResult<HashSet<String>> {
        self.inner.fetch_existing_keys(entity).await
    }

    async fn commit_batch(
        &self,
        entity: EntityType,
        payloads: Vec<Value>,
    ) -> ImportResult<usize> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ImportError::CommitError("connection reset".to_string()));
        }
        self.inner.commit_batch(entity, payloads).await
    }
}

#[tokio::test]
async fn test_failed_commit_is_retryable_without_revalidation() {
    logging::init_test();
    let importer = BatchImporterImpl::new(FlakyStore::failing_once(), ImportConfig::default());

    let file = csv_upload(&[
        "Mã phòng,Tên phòng,Sức chứa",
        "P101,Phòng 101,40",
        "P102,Phòng 102,0",
    ]);

    let mut session = importer
        .preview_file(EntityType::Room, file.path())
        .await
        .unwrap();
    assert_eq!(session.result.valid_count(), 1);

    // first attempt hits the transport failure
    let first = importer.commit(&mut session).await;
    assert!(matches!(first, Err(ImportError::CommitError(_))));
    assert!(matches!(session.status(), CommitStatus::Failed(_)));

    // working set survived the failure
    assert_eq!(session.result.valid_count(), 1);
    assert_eq!(session.result.invalid_count(), 1);

    // retry goes through; nothing was re-parsed or re-validated
    let count = importer.commit(&mut session).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(*session.status(), CommitStatus::Committed(1));

    let keys = importer
        .store()
        .fetch_existing_keys(EntityType::Room)
        .await
        .unwrap();
    assert_eq!(keys, HashSet::from(["P101".to_string()]));
}

#[tokio::test]
async fn test_committed_session_cannot_be_resubmitted() {
    logging::init_test();
    let importer = BatchImporterImpl::new(
        SqliteStore::in_memory().expect("in-memory store"),
        ImportConfig::default(),
    );

    let file = csv_upload(&["Mã phòng,Tên phòng,Sức chứa", "P103,Phòng 103,80"]);

    let mut session = importer
        .preview_file(EntityType::Room, file.path())
        .await
        .unwrap();
    importer.commit(&mut session).await.unwrap();

    let second = importer.commit(&mut session).await;
    assert!(matches!(second, Err(ImportError::AlreadyCommitted(1))));

    // the store saw exactly one record
    let keys = importer
        .store()
        .fetch_existing_keys(EntityType::Room)
        .await
        .unwrap();
    assert_eq!(keys.len(), 1);
}
