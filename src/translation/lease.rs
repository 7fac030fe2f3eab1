/*!
 * Slot leases.
 *
 * A slot is one `(source record, target locale)` pair. Holding its lease is
 * required for the whole create-or-update decision so that two concurrent
 * requests cannot both take the create branch for the same slot. A second
 * request is rejected rather than queued.
 */

use log::debug;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::content::RecordId;
use crate::errors::TranslationError;

type SlotKey = (RecordId, String);

/// Set of slots currently being translated, shared between requests
#[derive(Debug, Clone, Default)]
pub struct SlotLeases {
    held: Arc<Mutex<HashSet<SlotKey>>>,
}

impl SlotLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lease for `(record_id, locale)`
    ///
    /// Fails with `SlotBusy` when another request holds it. The lease is
    /// released when the returned guard is dropped.
    pub fn try_acquire(&self, record_id: RecordId, locale: &str) -> Result<SlotLease, TranslationError> {
        let key = (record_id, locale.to_string());
        let mut held = self.held.lock();

        if !held.insert(key.clone()) {
            return Err(TranslationError::SlotBusy {
                record_id,
                locale: locale.to_string(),
            });
        }

        debug!("Acquired slot lease ({}, {})", record_id, locale);
        Ok(SlotLease {
            key,
            held: Arc::clone(&self.held),
        })
    }

    /// Whether `(record_id, locale)` is currently leased
    pub fn is_held(&self, record_id: RecordId, locale: &str) -> bool {
        self.held.lock().contains(&(record_id, locale.to_string()))
    }
}

/// Lease on one slot, released on drop
#[derive(Debug)]
pub struct SlotLease {
    key: SlotKey,
    held: Arc<Mutex<HashSet<SlotKey>>>,
}

impl Drop for SlotLease {
    fn drop(&mut self) {
        self.held.lock().remove(&self.key);
        debug!("Released slot lease ({}, {})", self.key.0, self.key.1);
    }
}
