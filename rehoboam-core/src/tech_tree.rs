//! Tech tree catalog: embedded node data plus window-membership queries.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::types::{TechCategory, TechTreeNode, YearMonth};

const RAW_CATALOG: &str = include_str!("../data/tech_tree.json");

static CATALOG: OnceLock<Vec<TechTreeNode>> = OnceLock::new();

/// The full node catalog, in source order.
pub fn nodes() -> &'static [TechTreeNode] {
    CATALOG.get_or_init(|| {
        serde_json::from_str(RAW_CATALOG).expect("embedded tech tree catalog must parse")
    })
}

/// Nodes whose activation window contains the given month, inclusive on
/// both ends.
pub fn nodes_active_in(year: i32, month: u32) -> Vec<&'static TechTreeNode> {
    active_in(nodes(), year, month)
}

/// Window-membership filter over an explicit node list.
pub fn active_in(nodes: &[TechTreeNode], year: i32, month: u32) -> Vec<&TechTreeNode> {
    let at = YearMonth::new(year, month);
    nodes
        .iter()
        .filter(|node| node.window_start <= at && at <= node.window_end)
        .collect()
}

/// All nodes whose window has started on or before the given month,
/// sorted ascending by window start.
///
/// Nodes stay on this list forever once their start has passed: the
/// checklist tracks adoption status, not window membership, so there is
/// deliberately no expiry filtering here.
pub fn nodes_up_to(year: i32, month: u32) -> Vec<&'static TechTreeNode> {
    up_to(nodes(), year, month)
}

/// Cumulative filter over an explicit node list.
pub fn up_to(nodes: &[TechTreeNode], year: i32, month: u32) -> Vec<&TechTreeNode> {
    let at = YearMonth::new(year, month);
    let mut started: Vec<&TechTreeNode> = nodes
        .iter()
        .filter(|node| node.window_start <= at)
        .collect();
    started.sort_by_key(|node| node.window_start);
    started
}

/// Alias for [`nodes_up_to`]: everything that has at least begun by the
/// given point in time.
pub fn cumulative_nodes(year: i32, month: u32) -> Vec<&'static TechTreeNode> {
    nodes_up_to(year, month)
}

/// Partition the full catalog into the five category buckets, preserving
/// catalog order within each bucket.
pub fn nodes_by_category() -> BTreeMap<TechCategory, Vec<&'static TechTreeNode>> {
    let mut grouped: BTreeMap<TechCategory, Vec<&'static TechTreeNode>> = TechCategory::ALL
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();

    for node in nodes() {
        grouped
            .entry(node.category)
            .or_default()
            .push(node);
    }

    grouped
}
