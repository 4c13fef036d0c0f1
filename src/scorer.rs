//! Cohort Scorer - standing of one runner within a distance cohort
//!
//! Reports the source ranks as supplied by the timing provider and the
//! "faster than P%" figure computed against the cohort's finish times.
//!
//! Source ranks (`rank_abs`, `rank_gender`) are scoped however the provider
//! computed them, which may be the whole event rather than this cohort. The
//! standing therefore also carries ranks recomputed inside the cohort and a
//! flag saying whether the two agree.

use crate::cohort::Cohort;
use crate::error::{Result, ResultsError};
use crate::types::{Gender, RunnerRecord};
use crate::utils::{faster_than_percent, PercentileKind};
use serde::Serialize;

/// Scores resolved runners against their cohort
#[derive(Debug, Clone, Copy, Default)]
pub struct CohortScorer {
    kind: PercentileKind,
}

/// Runner standing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerStanding {
    pub row_id: usize,
    pub bib: String,
    pub name: String,
    pub gender: Gender,
    pub result: String,
    pub result_time: f64,
    pub pace_str: Option<String>,
    pub distance: f64,
    pub cohort_size: usize,

    /// Overall rank as supplied
    pub rank_abs: i64,
    /// Within-gender rank as supplied
    pub rank_gender: i64,

    /// 1 + finishers in the cohort strictly faster
    pub cohort_rank: usize,
    /// 1 + same-gender finishers in the cohort strictly faster
    pub cohort_gender_rank: usize,
    pub source_ranks_consistent: bool,

    /// Share of the cohort this runner beat, rounded to 2 decimals
    pub faster_than_percent: f64,
    pub percentile_kind: PercentileKind,
}

impl CohortScorer {
    pub fn new(kind: PercentileKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PercentileKind {
        self.kind
    }

    /// Standing of `record` within `cohort`
    ///
    /// # Errors
    /// `EmptyCohort` if the cohort has no finishers. The percentile is never
    /// computed on an empty sample.
    pub fn score(&self, cohort: &Cohort<'_>, record: &RunnerRecord) -> Result<RunnerStanding> {
        cohort.ensure_not_empty()?;

        let times = cohort.times();
        let faster_than = faster_than_percent(&times, record.result_time, self.kind).ok_or(
            ResultsError::EmptyCohort {
                distance: cohort.distance(),
            },
        )?;

        let cohort_rank = 1 + times.iter().filter(|&&t| t < record.result_time).count();
        let cohort_gender_rank = 1 + cohort
            .rows()
            .iter()
            .filter(|r| r.gender == record.gender && r.result_time < record.result_time)
            .count();

        let source_ranks_consistent = record.rank_abs == cohort_rank as i64
            && record.rank_gender == cohort_gender_rank as i64;

        Ok(RunnerStanding {
            row_id: record.row_id,
            bib: record.bib.clone(),
            name: record.name.clone(),
            gender: record.gender,
            result: record.result.clone(),
            result_time: record.result_time,
            pace_str: record.pace_str.clone(),
            distance: cohort.distance(),
            cohort_size: cohort.len(),
            rank_abs: record.rank_abs,
            rank_gender: record.rank_gender,
            cohort_rank,
            cohort_gender_rank,
            source_ranks_consistent,
            faster_than_percent: faster_than,
            percentile_kind: self.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImputedFields;
    use approx::assert_relative_eq;

    fn runner(row_id: usize, gender: Gender, time: f64, rank_abs: i64, rank_gender: i64) -> RunnerRecord {
        RunnerRecord {
            row_id,
            bib: (300 + row_id).to_string(),
            name: format!("Runner {}", row_id),
            gender,
            status: "Q".to_string(),
            result_time: time,
            result: String::new(),
            result_distance: 5000.0,
            rank_abs,
            rank_gender,
            pace_seconds: Some(time / 5.0),
            pace_str: None,
            imputed: ImputedFields::default(),
        }
    }

    fn three_runners() -> Vec<RunnerRecord> {
        vec![
            runner(0, Gender::Male, 1000.0, 1, 1),
            runner(1, Gender::Female, 1200.0, 2, 1),
            runner(2, Gender::Male, 1400.0, 3, 2),
        ]
    }

    #[test]
    fn test_faster_runner_scores_higher() {
        let records = three_runners();
        let cohort = Cohort::new(5000.0, records.iter().collect());
        let scorer = CohortScorer::default();

        let fast = scorer.score(&cohort, &records[0]).unwrap();
        let slow = scorer.score(&cohort, &records[2]).unwrap();

        assert!(fast.faster_than_percent > slow.faster_than_percent);
        assert_relative_eq!(fast.faster_than_percent, 66.67, epsilon = 1e-9);
        assert_relative_eq!(slow.faster_than_percent, 0.0, epsilon = 1e-9);
        assert_eq!(fast.percentile_kind, PercentileKind::Weak);
    }

    #[test]
    fn test_rank_kind_matches_average_rank() {
        let records = three_runners();
        let cohort = Cohort::new(5000.0, records.iter().collect());

        let standing = CohortScorer::new(PercentileKind::Rank)
            .score(&cohort, &records[1])
            .unwrap();
        // rank 2 of 3 → 66.67%, beats 33.33%
        assert_relative_eq!(standing.faster_than_percent, 33.33, epsilon = 1e-9);
    }

    #[test]
    fn test_source_ranks_are_reported_and_checked() {
        let records = three_runners();
        let cohort = Cohort::new(5000.0, records.iter().collect());
        let scorer = CohortScorer::default();

        let slow = scorer.score(&cohort, &records[2]).unwrap();
        assert_eq!(slow.rank_abs, 3);
        assert_eq!(slow.rank_gender, 2);
        assert_eq!(slow.cohort_rank, 3);
        assert_eq!(slow.cohort_gender_rank, 2);
        assert!(slow.source_ranks_consistent);

        // Ranks computed over the whole event disagree with the cohort
        let global = runner(3, Gender::Female, 1300.0, 57, 20);
        let mut with_global = records.iter().collect::<Vec<_>>();
        with_global.push(&global);
        let cohort = Cohort::new(5000.0, with_global);

        let standing = scorer.score(&cohort, &global).unwrap();
        assert_eq!(standing.rank_abs, 57);
        assert_eq!(standing.cohort_rank, 3);
        assert_eq!(standing.cohort_gender_rank, 2);
        assert!(!standing.source_ranks_consistent);
    }

    #[test]
    fn test_zero_time_is_scored_numerically() {
        let records = vec![
            runner(0, Gender::Male, 0.0, 0, 0),
            runner(1, Gender::Male, 1200.0, 1, 1),
        ];
        let cohort = Cohort::new(5000.0, records.iter().collect());

        let standing = CohortScorer::default().score(&cohort, &records[0]).unwrap();
        assert_relative_eq!(standing.faster_than_percent, 50.0, epsilon = 1e-9);
        assert_eq!(standing.cohort_rank, 1);
    }

    #[test]
    fn test_empty_cohort_is_rejected() {
        let records = three_runners();
        let cohort = Cohort::new(2500.0, Vec::new());

        assert!(matches!(
            CohortScorer::default().score(&cohort, &records[0]),
            Err(ResultsError::EmptyCohort { .. })
        ));
    }
}
