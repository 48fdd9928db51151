//! Timeline aggregation: dense month-by-month view over the catalog.

use std::collections::BTreeMap;

use crate::predictions::catalog;
use crate::types::{Domain, MonthData, Prediction};

/// Neutral prior used for domains with no prediction in a given month.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Generate the dense timeline for an inclusive year range.
///
/// Returns exactly `(end_year - start_year + 1) * 12` entries in ascending
/// (year, month) order. A reversed range yields an empty sequence rather
/// than panicking.
pub fn generate_timeline(start_year: i32, end_year: i32) -> Vec<MonthData> {
    timeline_for(catalog(), start_year, end_year)
}

/// Generate the dense timeline from an explicit prediction list.
pub fn timeline_for(predictions: &[Prediction], start_year: i32, end_year: i32) -> Vec<MonthData> {
    if start_year > end_year {
        return Vec::new();
    }

    let months = (end_year - start_year + 1) as usize * 12;
    let mut data = Vec::with_capacity(months);

    for year in start_year..=end_year {
        for month in 0..12u32 {
            let month_predictions: Vec<Prediction> = predictions
                .iter()
                .filter(|p| p.year == year && p.month == month)
                .cloned()
                .collect();

            let mut probabilities: BTreeMap<Domain, f64> = Domain::ALL
                .iter()
                .map(|domain| (*domain, NEUTRAL_PROBABILITY))
                .collect();

            // Catalog order wins when two predictions share a domain in
            // the same month: the later insert overwrites.
            for prediction in &month_predictions {
                probabilities.insert(prediction.domain, prediction.probability);
            }

            data.push(MonthData {
                year,
                month,
                probabilities,
                predictions: month_predictions,
            });
        }
    }

    data
}

/// Unweighted mean probability over the requested domain subset.
///
/// With an empty subset the mean is taken over all domains, dividing by
/// the fixed [`Domain::COUNT`] rather than the live map size.
pub fn average_probability(probabilities: &BTreeMap<Domain, f64>, active: &[Domain]) -> f64 {
    if active.is_empty() {
        return probabilities.values().sum::<f64>() / Domain::COUNT as f64;
    }

    let sum: f64 = active
        .iter()
        .map(|domain| {
            probabilities
                .get(domain)
                .copied()
                .unwrap_or(NEUTRAL_PROBABILITY)
        })
        .sum();
    sum / active.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Impact, Prediction};

    fn prediction(id: &str, domain: Domain, year: i32, month: u32, probability: f64) -> Prediction {
        Prediction {
            id: id.to_string(),
            domain,
            month,
            year,
            probability,
            title: id.to_string(),
            description: String::new(),
            impact: Impact::Low,
            sources: Vec::new(),
        }
    }

    #[test]
    fn timeline_is_dense_and_ordered() {
        let data = generate_timeline(2026, 2028);
        assert_eq!(data.len(), 36);

        let mut previous = None;
        for entry in &data {
            let index = entry.year as i64 * 12 + entry.month as i64;
            if let Some(prev) = previous {
                assert_eq!(index, prev + 1, "gap at {}-{}", entry.year, entry.month);
            }
            previous = Some(index);
        }
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(generate_timeline(2030, 2026).is_empty());
    }

    #[test]
    fn single_year_has_twelve_months() {
        let data = generate_timeline(2027, 2027);
        assert_eq!(data.len(), 12);
        assert_eq!(data[0].month, 0);
        assert_eq!(data[11].month, 11);
    }

    #[test]
    fn unmatched_domains_default_to_neutral() {
        let preds = vec![prediction("p", Domain::Tech, 2026, 0, 0.78)];
        let data = timeline_for(&preds, 2026, 2026);

        assert_eq!(data[0].probabilities[&Domain::Tech], 0.78);
        for domain in Domain::ALL {
            if domain != Domain::Tech {
                assert_eq!(data[0].probabilities[&domain], NEUTRAL_PROBABILITY);
            }
        }
        assert_eq!(data[1].probabilities[&Domain::Tech], NEUTRAL_PROBABILITY);
    }

    #[test]
    fn later_catalog_entry_wins_a_shared_domain() {
        let preds = vec![
            prediction("first", Domain::Tech, 2026, 3, 0.2),
            prediction("second", Domain::Tech, 2026, 3, 0.9),
        ];
        let data = timeline_for(&preds, 2026, 2026);
        assert_eq!(data[3].probabilities[&Domain::Tech], 0.9);
        assert_eq!(data[3].predictions.len(), 2);
    }

    #[test]
    fn catalog_timeline_carries_known_prediction() {
        // The 2026-01 AI tutor prediction anchors the start of the catalog.
        let data = generate_timeline(2026, 2026);
        assert_eq!(data[0].probabilities[&Domain::Tech], 0.78);
    }

    #[test]
    fn average_over_subset_is_unweighted_mean() {
        let mut probabilities: BTreeMap<Domain, f64> = Domain::ALL
            .iter()
            .map(|d| (*d, NEUTRAL_PROBABILITY))
            .collect();
        probabilities.insert(Domain::Tech, 0.9);
        probabilities.insert(Domain::Social, 0.3);

        let avg = average_probability(&probabilities, &[Domain::Tech, Domain::Social]);
        assert!((avg - 0.6).abs() < 1e-9);
    }

    #[test]
    fn empty_subset_divides_by_fixed_domain_count() {
        let probabilities: BTreeMap<Domain, f64> =
            Domain::ALL.iter().map(|d| (*d, 0.6)).collect();
        let avg = average_probability(&probabilities, &[]);
        assert!((avg - 0.6).abs() < 1e-9);
    }
}
