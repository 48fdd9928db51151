//! rehoboam-core: domain model for the Rehoboam prediction timeline.
//!
//! Provides the immutable prediction and tech tree catalogs, the dense
//! month-by-month timeline aggregation the views consume, and the
//! adoption-state log with its date-scoped status resolution and
//! last-write-wins merge. No I/O lives here; persistence and sync are the
//! concern of `rehoboam-store` and `rehoboam-sync`.

pub mod predictions;
pub mod state;
pub mod tech_tree;
pub mod timeline;
pub mod types;

// Re-export main types for convenience
pub use predictions::{catalog, dedup_predictions, year_range, YearRange};
pub use state::{completion_stats, merge_states, resolve_status, CompletionStats};
pub use tech_tree::{cumulative_nodes, nodes, nodes_active_in, nodes_by_category, nodes_up_to};
pub use timeline::{average_probability, generate_timeline, NEUTRAL_PROBABILITY};
pub use types::{
    month_name, month_name_long, AdoptionStatus, Domain, Goal, Impact, LifeArea, MonthData,
    Prediction, PredictionSource, StateRecord, TechCategory, TechTreeNode, TimelineConfig,
    YearMonth,
};
