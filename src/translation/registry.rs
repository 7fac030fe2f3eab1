/*!
 * Translation group registry.
 *
 * A translation group maps each locale to the record holding that locale's
 * version of the content. Every member record stores its own copy of the
 * whole map; the registry is the only place that reads or writes those
 * copies, so callers never see the redundancy.
 */

use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::content::{ContentStore, GroupMeta, RecordId};
use crate::errors::{StoreError, TranslationError};

/// Locale -> record map of one group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationGroup {
    entries: GroupMeta,
}

impl TranslationGroup {
    /// Empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Record holding `locale`, if any
    pub fn get(&self, locale: &str) -> Option<RecordId> {
        self.entries.get(locale).copied()
    }

    pub fn contains_locale(&self, locale: &str) -> bool {
        self.entries.contains_key(locale)
    }

    /// Locale under which `record_id` is listed
    pub fn locale_of(&self, record_id: RecordId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, id)| **id == record_id)
            .map(|(locale, _)| locale.as_str())
    }

    /// Insert or overwrite an entry
    pub fn insert(&mut self, locale: impl Into<String>, record_id: RecordId) {
        self.entries.insert(locale.into(), record_id);
    }

    /// Drop an entry, returning the record it pointed at
    pub fn remove(&mut self, locale: &str) -> Option<RecordId> {
        self.entries.remove(locale)
    }

    /// Distinct member records, in locale order
    pub fn members(&self) -> Vec<RecordId> {
        let mut members: Vec<RecordId> = Vec::with_capacity(self.entries.len());
        for id in self.entries.values() {
            if !members.contains(id) {
                members.push(*id);
            }
        }
        members
    }

    /// Iterate over `(locale, record)` pairs in locale order
    pub fn iter(&self) -> impl Iterator<Item = (&str, RecordId)> {
        self.entries.iter().map(|(locale, id)| (locale.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw map as persisted on each member
    pub fn as_meta(&self) -> &GroupMeta {
        &self.entries
    }
}

impl From<GroupMeta> for TranslationGroup {
    fn from(entries: GroupMeta) -> Self {
        Self { entries }
    }
}

/// One row of a record's translation overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationEntry {
    pub locale: String,
    pub record_id: RecordId,
    /// The entry is the record the overview was built for
    pub is_current: bool,
    /// The referenced record no longer exists
    pub is_stale: bool,
}

/// Reads and reconciles translation groups in the content store
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn ContentStore>,
}

impl Registry {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Group containing `record_id`, or an empty group
    ///
    /// Read failures are logged and treated as an empty group.
    pub async fn lookup(&self, record_id: RecordId) -> TranslationGroup {
        match self.store.get_group_meta(record_id).await {
            Ok(Some(meta)) => TranslationGroup::from(meta),
            Ok(None) => TranslationGroup::new(),
            Err(e) => {
                warn!("Could not read translation group of record {}: {}", record_id, e);
                TranslationGroup::new()
            }
        }
    }

    /// Link `target_id` into the group of `source_id` and write the merged
    /// map onto every member
    ///
    /// `source_id` is only added when `source_locale` has no entry yet;
    /// `target_id` always replaces whatever `target_locale` pointed at.
    /// Every member is attempted even when an earlier write failed, and
    /// writes already applied are kept. Members that no longer exist are
    /// skipped.
    pub async fn link(
        &self,
        guess: TranslationGroup,
        source_id: RecordId,
        source_locale: &str,
        target_id: RecordId,
        target_locale: &str,
    ) -> Result<TranslationGroup, TranslationError> {
        let mut group = guess;
        if !group.contains_locale(source_locale) {
            group.insert(source_locale, source_id);
        }
        group.insert(target_locale, target_id);

        let mut failed = Vec::new();
        for member in group.members() {
            debug!("Writing translation group of {} entries to record {}", group.len(), member);
            match self.store.set_group_meta(member, group.as_meta()).await {
                Ok(()) => {}
                // A stale entry has nobody to hold a copy
                Err(StoreError::NotFound(_)) => {
                    warn!("Skipping translation group copy for missing record {}", member);
                }
                Err(e) => {
                    warn!("Failed to write translation group to record {}: {}", member, e);
                    failed.push(member);
                }
            }
        }

        if !failed.is_empty() {
            let ids: Vec<String> = failed.iter().map(|id| id.to_string()).collect();
            return Err(TranslationError::Persistence(format!(
                "translation group written to {} of {} members, failed for record(s) {}",
                group.members().len() - failed.len(),
                group.members().len(),
                ids.join(", ")
            )));
        }

        Ok(group)
    }

    /// Whether the record listed under `locale` no longer exists
    ///
    /// Store errors count as "not stale", the entry is kept.
    pub async fn is_stale(&self, locale: &str, record_id: RecordId) -> bool {
        match self.store.record_exists(record_id).await {
            Ok(exists) => {
                if !exists {
                    warn!("Translation group entry '{}' points at missing record {}", locale, record_id);
                }
                !exists
            }
            Err(e) => {
                warn!("Could not check record {} for '{}': {}", record_id, locale, e);
                false
            }
        }
    }

    /// Entries of the group containing `record_id`, for display
    pub async fn translations_for(&self, record_id: RecordId) -> Vec<TranslationEntry> {
        let group = self.lookup(record_id).await;
        let mut entries = Vec::with_capacity(group.len());

        for (locale, id) in group.iter() {
            let is_stale = if id == record_id {
                false
            } else {
                self.is_stale(locale, id).await
            };
            entries.push(TranslationEntry {
                locale: locale.to_string(),
                record_id: id,
                is_current: id == record_id,
                is_stale,
            });
        }

        entries
    }
}
