//! Narrative context: the checklist and timeline inputs a summary is
//! built from, assembled once and shared by the prompt template and the
//! offline fallback.

use std::collections::BTreeMap;

use rehoboam_core::{
    cumulative_nodes, resolve_status, AdoptionStatus, LifeArea, MonthData, StateRecord, YearMonth,
};

/// A cumulative node that has moved past early research.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNode {
    pub title: String,
    pub status: AdoptionStatus,
    pub tags: Vec<LifeArea>,
}

/// Inputs for one month's lived-experience summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeContext {
    /// e.g. "March 2028".
    pub month_label: String,
    /// Nodes with a resolved status past `r-and-d`, in cumulative order.
    pub active_nodes: Vec<ActiveNode>,
    /// Count of active nodes per status, in progression order.
    pub status_breakdown: Vec<(AdoptionStatus, usize)>,
    /// Life areas most touched by active nodes, best first, at most ten.
    pub top_impacts: Vec<LifeArea>,
    /// Titles of the month's leading predictions, at most three.
    pub top_predictions: Vec<String>,
}

impl NarrativeContext {
    /// Assemble the context for a month from the adoption state log.
    ///
    /// Nodes with no history default to `pilot` here: the narrative
    /// assumes a node whose window has opened is quietly underway unless
    /// the user has explicitly marked it otherwise.
    pub fn build(month: &MonthData, records: &[StateRecord]) -> Self {
        let cumulative = cumulative_nodes(month.year, month.month);

        let active_nodes: Vec<ActiveNode> = cumulative
            .iter()
            .filter_map(|node| {
                let status = resolve_status(
                    records,
                    &node.id,
                    month.year,
                    month.month,
                    AdoptionStatus::Pilot,
                );
                if matches!(status, AdoptionStatus::NotStarted | AdoptionStatus::RAndD) {
                    return None;
                }
                Some(ActiveNode {
                    title: node.title.clone(),
                    status,
                    tags: node.tags.clone(),
                })
            })
            .collect();

        let mut impact_counts: BTreeMap<LifeArea, usize> = BTreeMap::new();
        for node in &active_nodes {
            for tag in &node.tags {
                *impact_counts.entry(*tag).or_default() += 1;
            }
        }
        let mut ranked: Vec<(LifeArea, usize)> = impact_counts.into_iter().collect();
        // Count descending; the BTreeMap ordering breaks ties so the
        // ranking is stable run to run.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top_impacts: Vec<LifeArea> = ranked.into_iter().take(10).map(|(tag, _)| tag).collect();

        let mut breakdown: BTreeMap<AdoptionStatus, usize> = BTreeMap::new();
        for node in &active_nodes {
            *breakdown.entry(node.status).or_default() += 1;
        }

        let top_predictions: Vec<String> = month
            .predictions
            .iter()
            .take(3)
            .map(|p| p.title.clone())
            .collect();

        Self {
            month_label: YearMonth::new(month.year, month.month).label(),
            active_nodes,
            status_breakdown: breakdown.into_iter().collect(),
            top_impacts,
            top_predictions,
        }
    }
}
