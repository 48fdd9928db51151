//! Checklist orchestration: the write path, the pull path, and the
//! queries the checklist view needs.
//!
//! Local-first throughout: every mutation lands in the local store before
//! any network traffic, remote failures degrade to notices, and the
//! outbox keeps unflushed writes queued for the next successful push.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rehoboam_core::{
    completion_stats, cumulative_nodes, resolve_status, AdoptionStatus, CompletionStats,
    StateRecord, TechTreeNode, YearMonth,
};
use rehoboam_store::{StateStore, StoreError};
use rehoboam_sync::{GatewayClient, SyncError};

use crate::notify::{Notice, Notifier};

/// One checklist line: a cumulative node and its resolved status.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistRow {
    pub node: &'static TechTreeNode,
    pub status: AdoptionStatus,
}

/// Remote side of the service, present only when a gateway is configured.
pub struct GatewayHandle {
    pub client: GatewayClient,
    pub user_id: String,
}

/// Drives the adoption checklist over the local store and, when
/// configured, the sync gateway.
pub struct ChecklistService {
    states: StateStore,
    gateway: Option<GatewayHandle>,
    notifier: Arc<dyn Notifier>,
    warned_local_only: AtomicBool,
}

impl ChecklistService {
    pub fn new(
        states: StateStore,
        gateway: Option<GatewayHandle>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            states,
            gateway,
            notifier,
            warned_local_only: AtomicBool::new(false),
        }
    }

    /// Pull the remote record set and merge it into the local log.
    ///
    /// Gateway failures surface as a notice and leave local state
    /// untouched; a missing backing table additionally carries its setup
    /// hint. Local store failures are real errors.
    pub async fn pull_remote(&self) -> Result<(), StoreError> {
        let Some(gateway) = &self.gateway else {
            return Ok(());
        };

        match gateway.client.fetch_states(&gateway.user_id).await {
            Ok(remote) => {
                self.states.absorb_remote(&remote)?;
            }
            Err(error) => {
                self.notifier.notify(Notice::error(
                    "Failed to load saved tech selections",
                    Some(describe(&error)),
                ));
            }
        }
        Ok(())
    }

    /// Record a status change effective at the given month, then push
    /// the outbox best-effort.
    ///
    /// The local write always sticks; a failed push leaves the record
    /// queued for the next flush and is reported, not retried.
    pub async fn set_status(
        &self,
        node_id: &str,
        status: AdoptionStatus,
        year: i32,
        month: u32,
    ) -> Result<(), StoreError> {
        let record = StateRecord::effective_at(node_id, status, YearMonth::new(year, month));
        self.states.apply_local(record)?;

        if self.gateway.is_none() {
            if !self.warned_local_only.swap(true, Ordering::Relaxed) {
                self.notifier.notify(Notice::info(
                    "Selections saved locally",
                    Some("No sync gateway is configured, so selections stay on this device.".into()),
                ));
            }
            return Ok(());
        }

        self.flush_pending().await
    }

    /// Push every queued record to the gateway. On success the outbox is
    /// drained; on failure it is left intact.
    pub async fn flush_pending(&self) -> Result<(), StoreError> {
        let Some(gateway) = &self.gateway else {
            return Ok(());
        };

        let pending = self.states.pending()?;
        if pending.is_empty() {
            return Ok(());
        }

        match gateway.client.upsert_states(&gateway.user_id, &pending).await {
            Ok(()) => {
                self.states.clear_pending(&pending)?;
            }
            Err(error) => {
                self.notifier.notify(Notice::error(
                    "Failed to store selection",
                    Some(describe(&error)),
                ));
            }
        }
        Ok(())
    }

    /// Resolved status of one node as of the given month.
    pub fn status_of(&self, node_id: &str, year: i32, month: u32) -> Result<AdoptionStatus, StoreError> {
        let records = self.states.records()?;
        Ok(resolve_status(
            &records,
            node_id,
            year,
            month,
            AdoptionStatus::NotStarted,
        ))
    }

    /// The cumulative checklist as of the given month, in window-start
    /// order.
    pub fn rows(&self, year: i32, month: u32) -> Result<Vec<ChecklistRow>, StoreError> {
        let records = self.states.records()?;
        Ok(cumulative_nodes(year, month)
            .into_iter()
            .map(|node| ChecklistRow {
                node,
                status: resolve_status(
                    &records,
                    &node.id,
                    year,
                    month,
                    AdoptionStatus::NotStarted,
                ),
            })
            .collect())
    }

    /// Completion summary over the cumulative node set.
    pub fn stats(&self, year: i32, month: u32) -> Result<CompletionStats, StoreError> {
        let records = self.states.records()?;
        let nodes = cumulative_nodes(year, month);
        Ok(completion_stats(&nodes, &records, year, month))
    }

    /// Current state log. Exposed for the narrative context builder.
    pub fn records(&self) -> Result<Vec<StateRecord>, StoreError> {
        self.states.records()
    }
}

fn describe(error: &SyncError) -> String {
    match error.setup_hint() {
        Some(hint) => hint.to_string(),
        None => error.to_string(),
    }
}
