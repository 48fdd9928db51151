//! Adoption state resolution and merge.
//!
//! The status history for a node is a sparse, possibly out-of-order,
//! possibly multi-sourced log of [`StateRecord`]s. Everything here reduces
//! to two operations: answering "what status applied as of month M" and
//! deterministically merging two logs (local + remote, or local + one new
//! write) by last-write-wins per effective slot.

use std::collections::BTreeMap;

use crate::types::{AdoptionStatus, StateRecord, TechTreeNode, YearMonth};

/// Merge key: one slot per (node, effective month), with `None` standing
/// in for floor records so they merge against each other.
type SlotKey = (String, Option<(i32, u32)>);

fn slot_key(record: &StateRecord) -> SlotKey {
    (
        record.node_id.clone(),
        record.effective.map(|e| (e.year, e.month)),
    )
}

/// Resolve the adoption status of a node as of a target month.
///
/// Records effective after the target are ignored. Floor records (no
/// effective date) are always applicable but sort below every dated
/// record. Among the survivors, the latest effective date wins, with the
/// update timestamp breaking ties so a correction entered later for the
/// same effective month dominates. With no applicable history the
/// caller-supplied fallback is returned.
pub fn resolve_status(
    records: &[StateRecord],
    node_id: &str,
    year: i32,
    month: u32,
    fallback: AdoptionStatus,
) -> AdoptionStatus {
    let target = YearMonth::new(year, month).index();

    let mut applicable: Vec<&StateRecord> = records
        .iter()
        .filter(|record| record.node_id == node_id)
        .filter(|record| match record.effective {
            Some(effective) => effective.index() <= target,
            None => true,
        })
        .collect();

    if applicable.is_empty() {
        return fallback;
    }

    applicable.sort_by_key(|record| {
        (
            record.effective.map_or(i64::MIN, |e| e.index()),
            record.updated_at,
        )
    });

    applicable
        .last()
        .map(|record| record.status)
        .unwrap_or(fallback)
}

/// Merge two state logs into one deduplicated, timestamp-ordered log.
///
/// For each (node, effective month) slot the record with the greater
/// update timestamp wins; on equal timestamps the existing side is kept.
/// The operation is idempotent and, per slot, commutative: which list is
/// "existing" only matters for exact-tie resolution. The result is sorted
/// ascending by update timestamp with slot order breaking exact ties, so
/// merged output is deterministic regardless of input order.
pub fn merge_states(existing: &[StateRecord], incoming: &[StateRecord]) -> Vec<StateRecord> {
    let mut by_slot: BTreeMap<SlotKey, StateRecord> = BTreeMap::new();

    for record in existing.iter().chain(incoming.iter()) {
        let key = slot_key(record);
        match by_slot.get(&key) {
            Some(current) if current.updated_at >= record.updated_at => {}
            _ => {
                by_slot.insert(key, record.clone());
            }
        }
    }

    let mut merged: Vec<StateRecord> = by_slot.into_values().collect();
    merged.sort_by_key(|record| record.updated_at);
    merged
}

/// Checklist completion summary for a cumulative node set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStats {
    pub total: usize,
    /// Nodes resolving to any status other than `not-started`.
    pub completed: usize,
    /// `completed / total` rounded to the nearest integer percent; an
    /// empty node set is 0%.
    pub percentage: u32,
}

/// Count how many of the given nodes have moved past `not-started` as of
/// the target month.
pub fn completion_stats(
    nodes: &[&TechTreeNode],
    records: &[StateRecord],
    year: i32,
    month: u32,
) -> CompletionStats {
    let total = nodes.len();
    let completed = nodes
        .iter()
        .filter(|node| {
            resolve_status(records, &node.id, year, month, AdoptionStatus::NotStarted)
                != AdoptionStatus::NotStarted
        })
        .count();

    let percentage = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    CompletionStats {
        total,
        completed,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LifeArea, TechCategory};
    use chrono::{TimeZone, Utc};

    fn record(
        node_id: &str,
        status: AdoptionStatus,
        effective: Option<(i32, u32)>,
        updated_ms: i64,
    ) -> StateRecord {
        StateRecord {
            node_id: node_id.to_string(),
            status,
            effective: effective.map(|(year, month)| YearMonth::new(year, month)),
            updated_at: Utc.timestamp_millis_opt(updated_ms).unwrap(),
        }
    }

    fn node(id: &str, start: (i32, u32)) -> TechTreeNode {
        TechTreeNode {
            id: id.to_string(),
            category: TechCategory::Individual,
            subcategory: "test".to_string(),
            title: id.to_string(),
            window_start: YearMonth::new(start.0, start.1),
            window_end: YearMonth::new(start.0 + 5, 11),
            depends_on: Vec::new(),
            indicators: Vec::new(),
            tags: vec![LifeArea::Work],
            description: None,
        }
    }

    #[test]
    fn empty_history_returns_fallback() {
        let status = resolve_status(&[], "X", 2030, 1, AdoptionStatus::NotStarted);
        assert_eq!(status, AdoptionStatus::NotStarted);
    }

    #[test]
    fn most_recent_effective_record_at_or_before_target_wins() {
        let records = vec![
            record("n", AdoptionStatus::Pilot, Some((2027, 0)), 1),
            record("n", AdoptionStatus::MassMarket, Some((2030, 0)), 2),
        ];

        assert_eq!(
            resolve_status(&records, "n", 2028, 6, AdoptionStatus::NotStarted),
            AdoptionStatus::Pilot
        );
        assert_eq!(
            resolve_status(&records, "n", 2031, 0, AdoptionStatus::NotStarted),
            AdoptionStatus::MassMarket
        );
        // Before any record became effective only the fallback applies.
        assert_eq!(
            resolve_status(&records, "n", 2026, 0, AdoptionStatus::NotStarted),
            AdoptionStatus::NotStarted
        );
    }

    #[test]
    fn floor_record_applies_everywhere_but_loses_to_dated_records() {
        let floor = record("n", AdoptionStatus::RAndD, None, 5);

        assert_eq!(
            resolve_status(&[floor.clone()], "n", 2026, 0, AdoptionStatus::NotStarted),
            AdoptionStatus::RAndD
        );

        let records = vec![floor, record("n", AdoptionStatus::Pilot, Some((2027, 0)), 1)];
        assert_eq!(
            resolve_status(&records, "n", 2028, 0, AdoptionStatus::NotStarted),
            AdoptionStatus::Pilot
        );
        // Before the dated record's effective month the floor still rules.
        assert_eq!(
            resolve_status(&records, "n", 2026, 5, AdoptionStatus::NotStarted),
            AdoptionStatus::RAndD
        );
    }

    #[test]
    fn later_correction_for_same_effective_month_wins() {
        let records = vec![
            record("n", AdoptionStatus::Pilot, Some((2027, 0)), 1),
            record("n", AdoptionStatus::EarlyAdopters, Some((2027, 0)), 2),
        ];
        assert_eq!(
            resolve_status(&records, "n", 2027, 0, AdoptionStatus::NotStarted),
            AdoptionStatus::EarlyAdopters
        );
    }

    #[test]
    fn records_for_other_nodes_are_ignored() {
        let records = vec![record("other", AdoptionStatus::Ubiquitous, None, 1)];
        assert_eq!(
            resolve_status(&records, "n", 2030, 0, AdoptionStatus::NotStarted),
            AdoptionStatus::NotStarted
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let list = vec![
            record("a", AdoptionStatus::Pilot, Some((2027, 0)), 1),
            record("b", AdoptionStatus::RAndD, None, 2),
        ];

        let merged_with_self = merge_states(&list, &list);
        let merged_with_empty = merge_states(&list, &[]);
        let remerged = merge_states(&merged_with_self, &merged_with_empty);

        assert_eq!(merged_with_self, merged_with_empty);
        assert_eq!(remerged, merged_with_self);
    }

    #[test]
    fn merge_keeps_greater_timestamp_per_slot() {
        let existing = vec![record("a", AdoptionStatus::Pilot, Some((2027, 0)), 1)];
        let incoming = vec![record("a", AdoptionStatus::MassMarket, Some((2027, 0)), 9)];

        let merged = merge_states(&existing, &incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, AdoptionStatus::MassMarket);

        // Commutative per slot: swapping sides picks the same winner.
        let swapped = merge_states(&incoming, &existing);
        assert_eq!(swapped, merged);
    }

    #[test]
    fn merge_keeps_existing_on_equal_timestamps() {
        let existing = vec![record("a", AdoptionStatus::Pilot, Some((2027, 0)), 5)];
        let incoming = vec![record("a", AdoptionStatus::Regulated, Some((2027, 0)), 5)];

        let merged = merge_states(&existing, &incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, AdoptionStatus::Pilot);
    }

    #[test]
    fn floor_records_share_one_slot_while_dated_records_do_not() {
        let existing = vec![
            record("a", AdoptionStatus::RAndD, None, 1),
            record("a", AdoptionStatus::Pilot, Some((2027, 0)), 2),
        ];
        let incoming = vec![
            record("a", AdoptionStatus::EarlyAdopters, None, 3),
            record("a", AdoptionStatus::MassMarket, Some((2028, 0)), 4),
        ];

        let merged = merge_states(&existing, &incoming);
        assert_eq!(merged.len(), 3);

        let floors: Vec<_> = merged.iter().filter(|r| r.effective.is_none()).collect();
        assert_eq!(floors.len(), 1);
        assert_eq!(floors[0].status, AdoptionStatus::EarlyAdopters);
    }

    #[test]
    fn merge_result_is_sorted_by_update_time() {
        let existing = vec![
            record("a", AdoptionStatus::Pilot, Some((2027, 0)), 7),
            record("b", AdoptionStatus::RAndD, Some((2026, 0)), 3),
        ];
        let incoming = vec![record("c", AdoptionStatus::Ubiquitous, Some((2030, 0)), 5)];

        let merged = merge_states(&existing, &incoming);
        let stamps: Vec<_> = merged.iter().map(|r| r.updated_at).collect();
        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted);
    }

    #[test]
    fn writing_never_deletes_history() {
        let history = vec![record("a", AdoptionStatus::Pilot, Some((2027, 0)), 1)];
        let write = vec![record("a", AdoptionStatus::MassMarket, Some((2030, 3)), 2)];

        let merged = merge_states(&history, &write);
        assert_eq!(merged.len(), 2);
        // The old slot is intact and still answers historical queries.
        assert_eq!(
            resolve_status(&merged, "a", 2028, 0, AdoptionStatus::NotStarted),
            AdoptionStatus::Pilot
        );
    }

    #[test]
    fn completion_stats_round_to_nearest_percent() {
        let nodes: Vec<TechTreeNode> = (0..10).map(|i| node(&format!("n{i}"), (2026, 0))).collect();
        let node_refs: Vec<&TechTreeNode> = nodes.iter().collect();

        // 7 of 10 nodes moved past not-started.
        let records: Vec<StateRecord> = (0..7)
            .map(|i| record(&format!("n{i}"), AdoptionStatus::Pilot, Some((2026, 0)), i))
            .collect();

        let stats = completion_stats(&node_refs, &records, 2030, 0);
        assert_eq!(stats.total, 10);
        assert_eq!(stats.completed, 7);
        assert_eq!(stats.percentage, 70);
    }

    #[test]
    fn empty_node_set_is_zero_percent() {
        let stats = completion_stats(&[], &[], 2030, 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage, 0);
    }
}
