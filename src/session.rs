//! Per-user interaction state
//!
//! A `Session` holds what one user has chosen (distance, query text,
//! disambiguation pick). The finisher table is shared and read-only; every
//! interaction re-runs `Session::evaluate` over it in one blocking pass.

use crate::cohort::CohortSummary;
use crate::distances::{label_for, DEFAULT_DISTANCE};
use crate::error::ResultsError;
use crate::normalizer::NormalizedTable;
use crate::resolver::{resolve, Resolution, Selection};
use crate::scorer::{CohortScorer, RunnerStanding};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    distance: f64,
    query: String,
    selection: Option<Selection>,
}

/// Everything the presentation layer needs after one interaction
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    pub distance: f64,
    pub label: Option<&'static str>,
    /// `None` when the cohort has no finishers
    pub summary: Option<CohortSummary>,
    pub resolution: Resolution<'a>,
    pub standing: Option<RunnerStanding>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(f64::from(DEFAULT_DISTANCE))
    }
}

impl Session {
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            query: String::new(),
            selection: None,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Switch cohort; a pick made in the old cohort no longer applies
    pub fn set_distance(&mut self, distance: f64) {
        if distance != self.distance {
            self.distance = distance;
            self.selection = None;
        }
    }

    /// New query text; clears any previous pick
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.selection = None;
        }
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    /// Recompute the view for the current state
    pub fn evaluate<'a>(&self, table: &'a NormalizedTable, scorer: &CohortScorer) -> SessionView<'a> {
        let cohort = table.cohort(self.distance);

        let summary = match cohort.summary() {
            Ok(summary) => Some(summary),
            Err(ResultsError::EmptyCohort { distance }) => {
                tracing::debug!("no finishers at {} m", distance);
                None
            }
            Err(e) => {
                tracing::warn!("summary failed for {} m: {}", self.distance, e);
                None
            }
        };

        let resolution = resolve(&cohort, &self.query).with_selection(self.selection.as_ref());

        let standing = resolution.record().and_then(|record| {
            scorer
                .score(&cohort, record)
                .map_err(|e| tracing::warn!("scoring bib {} failed: {}", record.bib, e))
                .ok()
        });

        SessionView {
            distance: self.distance,
            label: label_for(self.distance),
            summary,
            resolution,
            standing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use polars::prelude::*;

    fn table() -> NormalizedTable {
        let raw = df![
            "bib" => &[1i64, 2, 3, 4],
            "name" => &["Ivanov Ivan", "Ivanov Petr", "Smirnova Elena", "Popov Ivan"],
            "gender" => &["male", "male", "female", "male"],
            "status" => &["Q", "Q", "Q", "Q"],
            "result_time" => &[1000.0, 1200.0, 1400.0, 2400.0],
            "result" => &["0:16:40", "0:20:00", "0:23:20", "0:40:00"],
            "result_distance" => &[5000i64, 5000, 5000, 10000],
            "rank_abs" => &[1i64, 2, 3, 1],
            "rank_gender" => &[1i64, 2, 1, 1],
        ]
        .unwrap();
        normalize(&raw).unwrap()
    }

    #[test]
    fn test_two_step_disambiguation() {
        let table = table();
        let scorer = CohortScorer::default();
        let mut session = Session::new(5000.0);

        session.set_query("ivanov");
        let view = session.evaluate(&table, &scorer);
        assert!(matches!(view.resolution, Resolution::Ambiguous(ref a) if a.len() == 2));
        assert!(view.standing.is_none());
        assert_eq!(view.summary.as_ref().unwrap().median_seconds, 1200.0);

        session.select(Selection::Bib("2".to_string()));
        let view = session.evaluate(&table, &scorer);
        let standing = view.standing.unwrap();
        assert_eq!(standing.name, "Ivanov Petr");
        assert_eq!(standing.cohort_size, 3);
    }

    #[test]
    fn test_changing_query_or_distance_clears_selection() {
        let mut session = Session::default();
        assert_eq!(session.distance(), 16000.0);

        session.set_query("ivanov");
        session.select(Selection::Row(0));
        session.set_distance(5000.0);
        assert!(session.selection().is_none());

        session.select(Selection::Row(0));
        session.set_query("popov");
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_empty_cohort_view() {
        let table = table();
        let mut session = Session::new(2500.0);
        session.set_query("1");

        let view = session.evaluate(&table, &CohortScorer::default());
        assert!(view.summary.is_none());
        assert!(matches!(view.resolution, Resolution::NotFound { .. }));
        assert_eq!(view.label, Some("2.5 км"));
    }
}
