//! Distance taxonomy
//!
//! The event's fixed set of race distances and their display labels. Only
//! these distances are offered as cohort choices; other distances present in
//! the data stay queryable by exact value but get no label.

use crate::cohort::CohortSummary;
use crate::normalizer::NormalizedTable;
use rayon::prelude::*;
use serde::Serialize;

/// Known distances in meters with their labels, shortest first
pub const DISTANCE_LABELS: [(u32, &str); 4] = [
    (2500, "2.5 км"),
    (5000, "5 км"),
    (10000, "10 км"),
    (16000, "16 км"),
];

/// Distance selected when a session starts
pub const DEFAULT_DISTANCE: u32 = 16000;

/// Label for a distance in meters, if it belongs to the taxonomy
pub fn label_for(distance: f64) -> Option<&'static str> {
    DISTANCE_LABELS
        .iter()
        .find(|(meters, _)| f64::from(*meters) == distance)
        .map(|(_, label)| *label)
}

/// Meters for a label, or for a plain number of meters
pub fn parse_label(input: &str) -> Option<u32> {
    let input = input.trim();
    DISTANCE_LABELS
        .iter()
        .find(|(_, label)| *label == input)
        .map(|(meters, _)| *meters)
        .or_else(|| {
            input
                .parse::<u32>()
                .ok()
                .filter(|meters| is_known(f64::from(*meters)))
        })
}

pub fn is_known(distance: f64) -> bool {
    label_for(distance).is_some()
}

pub fn known_distances() -> impl Iterator<Item = u32> {
    DISTANCE_LABELS.iter().map(|(meters, _)| *meters)
}

/// One selectable cohort
#[derive(Debug, Clone, Serialize)]
pub struct CohortChoice {
    pub distance: u32,
    pub label: &'static str,
    pub finishers: usize,
    /// `None` when the distance has no finishers
    pub summary: Option<CohortSummary>,
}

/// Cohort choices for every known distance, in taxonomy order
///
/// Summaries are computed in parallel; the table is only read.
pub fn cohort_choices(table: &NormalizedTable) -> Vec<CohortChoice> {
    DISTANCE_LABELS
        .par_iter()
        .map(|&(distance, label)| {
            let cohort = table.cohort(f64::from(distance));
            CohortChoice {
                distance,
                label,
                finishers: cohort.len(),
                summary: cohort.summary().ok(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup() {
        assert_eq!(label_for(2500.0), Some("2.5 км"));
        assert_eq!(label_for(16000.0), Some("16 км"));
        assert_eq!(label_for(21097.0), None);
        assert_eq!(label_for(0.0), None);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("10 км"), Some(10000));
        assert_eq!(parse_label("5000"), Some(5000));
        assert_eq!(parse_label("21097"), None);
        assert_eq!(parse_label("marathon"), None);
    }

    #[test]
    fn test_default_is_known() {
        assert!(is_known(f64::from(DEFAULT_DISTANCE)));
        assert_eq!(known_distances().collect::<Vec<_>>(), vec![2500, 5000, 10000, 16000]);
    }
}
