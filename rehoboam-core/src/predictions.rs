//! Prediction catalog: embedded data plus pure query functions.
//!
//! The catalog is compiled in as JSON, deduplicated once on first access,
//! and never mutated afterwards. Duplicates are a data-entry hazard in the
//! source tables, not a user-visible error, so they are resolved silently
//! here and logged at debug level.

use std::collections::HashSet;
use std::sync::OnceLock;

use tracing::debug;

use crate::types::Prediction;

const RAW_CATALOG: &str = include_str!("../data/predictions.json");

static CATALOG: OnceLock<Vec<Prediction>> = OnceLock::new();

/// The full deduplicated prediction catalog, in source order.
pub fn catalog() -> &'static [Prediction] {
    CATALOG.get_or_init(|| {
        let raw: Vec<Prediction> =
            serde_json::from_str(RAW_CATALOG).expect("embedded prediction catalog must parse");
        dedup_predictions(raw)
    })
}

/// Drop duplicate predictions, keeping the first occurrence.
///
/// A record is a duplicate if its id was already seen, or if its trimmed
/// content key (title, year, month, domain) was. Guards against
/// copy-paste duplication in the catalog tables.
pub fn dedup_predictions(raw: Vec<Prediction>) -> Vec<Prediction> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_content: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(raw.len());

    for prediction in raw {
        let id = prediction.id.trim().to_string();
        let content_key = format!(
            "{}|{}|{}|{}",
            prediction.title.trim(),
            prediction.year,
            prediction.month,
            prediction.domain.as_str(),
        );

        if seen_ids.contains(&id) || seen_content.contains(&content_key) {
            debug!(id = %prediction.id, "dropping duplicate prediction");
            continue;
        }

        seen_ids.insert(id);
        seen_content.insert(content_key);
        kept.push(prediction);
    }

    kept
}

/// Inclusive year bounds of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min_year: i32,
    pub max_year: i32,
}

/// Year span covered by the deduplicated catalog.
pub fn year_range() -> YearRange {
    year_range_of(catalog())
}

/// Year span covered by an arbitrary prediction list.
///
/// An empty list collapses to the degenerate range `[i32::MAX, i32::MIN]`;
/// the embedded catalog is never empty.
pub fn year_range_of(predictions: &[Prediction]) -> YearRange {
    let mut range = YearRange {
        min_year: i32::MAX,
        max_year: i32::MIN,
    };
    for prediction in predictions {
        range.min_year = range.min_year.min(prediction.year);
        range.max_year = range.max_year.max(prediction.year);
    }
    range
}
