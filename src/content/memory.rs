/*!
 * In-process content store.
 *
 * Keeps records, language tags and group maps behind a single lock. Used by
 * the test suite, the benchmarks and anywhere a throwaway store is enough.
 */

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ContentRecord, ContentStore, GroupMeta, NewRecord, RecordId, RecordPatch};
use crate::errors::StoreError;

#[derive(Debug, Default)]
struct MemoryState {
    next_id: RecordId,
    records: BTreeMap<RecordId, ContentRecord>,
    groups: BTreeMap<RecordId, GroupMeta>,
}

/// Content store held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Whether the store holds no record
    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StoreError> {
        Ok(self.state.read().records.get(&id).cloned())
    }

    async fn create_record(&self, record: NewRecord) -> Result<RecordId, StoreError> {
        let mut state = self.state.write();
        state.next_id += 1;
        let id = state.next_id;

        state.records.insert(
            id,
            ContentRecord {
                id,
                title: record.title,
                body: record.body,
                excerpt: record.excerpt,
                language: None,
                status: record.status,
                author: record.author,
                record_type: record.record_type,
                comments_open: record.comments_open,
                pings_open: record.pings_open,
            },
        );

        debug!("Created record {}", id);
        Ok(id)
    }

    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let record = state.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.title = patch.title;
        record.body = patch.body;
        record.excerpt = patch.excerpt;
        Ok(())
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.records.remove(&id).ok_or(StoreError::NotFound(id))?;
        state.groups.remove(&id);
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<ContentRecord>, StoreError> {
        Ok(self.state.read().records.values().cloned().collect())
    }

    async fn get_record_language(&self, id: RecordId) -> Result<Option<String>, StoreError> {
        let state = self.state.read();
        let record = state.records.get(&id).ok_or(StoreError::NotFound(id))?;
        Ok(record.language.clone())
    }

    async fn set_record_language(&self, id: RecordId, locale: &str) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let record = state.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.language = Some(locale.to_string());
        Ok(())
    }

    async fn get_group_meta(&self, id: RecordId) -> Result<Option<GroupMeta>, StoreError> {
        Ok(self.state.read().groups.get(&id).cloned())
    }

    async fn set_group_meta(&self, id: RecordId, group: &GroupMeta) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if !state.records.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        state.groups.insert(id, group.clone());
        Ok(())
    }
}
