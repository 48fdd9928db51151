//! Adoption state store: canonical merged log plus the sync outbox.
//!
//! This store is the single writer for the `tech-tree-states` namespace.
//! Every mutation goes through [`rehoboam_core::merge_states`], so the
//! persisted list is always in merged, timestamp-ordered form. Local
//! writes additionally land in an outbox namespace until a gateway flush
//! succeeds; a failed flush leaves them queued and never rolls back the
//! local write.

use std::sync::Arc;

use rehoboam_core::{merge_states, StateRecord};
use tracing::debug;

use crate::kv::{KvStore, OUTBOX_NAMESPACE, STATES_NAMESPACE};
use crate::StoreError;

/// Owns the canonical merged adoption state log.
pub struct StateStore {
    kv: Arc<KvStore>,
}

impl StateStore {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// The current merged log.
    pub fn records(&self) -> Result<Vec<StateRecord>, StoreError> {
        self.kv.get_or(STATES_NAMESPACE, Vec::new())
    }

    /// Merge one locally-written record into the log, persist, and queue
    /// it for replication. Returns the new merged log.
    pub fn apply_local(&self, record: StateRecord) -> Result<Vec<StateRecord>, StoreError> {
        let current = self.records()?;
        let merged = merge_states(&current, std::slice::from_ref(&record));
        self.kv.put(STATES_NAMESPACE, &merged)?;

        let mut pending: Vec<StateRecord> = self.kv.get_or(OUTBOX_NAMESPACE, Vec::new())?;
        pending.push(record);
        self.kv.put(OUTBOX_NAMESPACE, &pending)?;

        debug!(records = merged.len(), pending = pending.len(), "Applied local state write");
        Ok(merged)
    }

    /// Merge a batch pulled from the gateway into the log and persist.
    /// Remote records win only by recency, never by origin.
    pub fn absorb_remote(&self, remote: &[StateRecord]) -> Result<Vec<StateRecord>, StoreError> {
        let current = self.records()?;
        let merged = merge_states(&current, remote);
        self.kv.put(STATES_NAMESPACE, &merged)?;
        debug!(incoming = remote.len(), records = merged.len(), "Absorbed remote state batch");
        Ok(merged)
    }

    /// Records written locally but not yet confirmed by the gateway.
    pub fn pending(&self) -> Result<Vec<StateRecord>, StoreError> {
        self.kv.get_or(OUTBOX_NAMESPACE, Vec::new())
    }

    /// Drop records from the outbox after a successful flush.
    pub fn clear_pending(&self, flushed: &[StateRecord]) -> Result<(), StoreError> {
        let mut pending: Vec<StateRecord> = self.kv.get_or(OUTBOX_NAMESPACE, Vec::new())?;
        pending.retain(|record| !flushed.contains(record));
        self.kv.put(OUTBOX_NAMESPACE, &pending)
    }
}
