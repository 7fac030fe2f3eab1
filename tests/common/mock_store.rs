/*!
 * Content store wrapper that injects failures
 *
 * Wraps a `MemoryStore` and fails selected operations so tests can check
 * which writes happened before an error surfaced.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lingolink::content::{ContentRecord, ContentStore, GroupMeta, MemoryStore, NewRecord, RecordId, RecordPatch};
use lingolink::errors::StoreError;

/// Memory store with switchable failures
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    fail_group_reads: AtomicBool,
    fail_group_writes_for: Mutex<HashSet<RecordId>>,
    writes: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Store the failures are injected into
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_group_reads(&self, fail: bool) {
        self.fail_group_reads.store(fail, Ordering::SeqCst);
    }

    /// Fail every group map write to `id`
    pub fn fail_group_writes_for(&self, id: RecordId) {
        self.fail_group_writes_for.lock().insert(id);
    }

    /// Number of successful writes of any kind
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn injected(operation: &str) -> StoreError {
        StoreError::Storage(format!("injected {} failure", operation))
    }

    fn counted<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if result.is_ok() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StoreError> {
        self.inner.get_record(id).await
    }

    async fn create_record(&self, record: NewRecord) -> Result<RecordId, StoreError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::injected("create"));
        }
        self.counted(self.inner.create_record(record).await)
    }

    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> Result<(), StoreError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::injected("update"));
        }
        self.counted(self.inner.update_record(id, patch).await)
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), StoreError> {
        self.counted(self.inner.delete_record(id).await)
    }

    async fn list_records(&self) -> Result<Vec<ContentRecord>, StoreError> {
        self.inner.list_records().await
    }

    async fn get_record_language(&self, id: RecordId) -> Result<Option<String>, StoreError> {
        self.inner.get_record_language(id).await
    }

    async fn set_record_language(&self, id: RecordId, locale: &str) -> Result<(), StoreError> {
        self.counted(self.inner.set_record_language(id, locale).await)
    }

    async fn get_group_meta(&self, id: RecordId) -> Result<Option<GroupMeta>, StoreError> {
        if self.fail_group_reads.load(Ordering::SeqCst) {
            return Err(Self::injected("group read"));
        }
        self.inner.get_group_meta(id).await
    }

    async fn set_group_meta(&self, id: RecordId, group: &GroupMeta) -> Result<(), StoreError> {
        let blocked = self.fail_group_writes_for.lock().contains(&id);
        if blocked {
            return Err(Self::injected("group write"));
        }
        self.counted(self.inner.set_group_meta(id, group).await)
    }
}
