//! Cohort Scoring Integration Tests
//!
//! Loads the sample export in tests/fixtures and runs the full pipeline:
//! load → normalize → cohort → resolve → score.

use approx::assert_relative_eq;
use race_results_rust::distances::cohort_choices;
use race_results_rust::{
    normalize, resolve, CohortScorer, Gender, ImputedFields, NormalizedTable, PercentileKind,
    RaceData, Resolution, ResultsError, Selection, Session,
};
use std::path::Path;

fn load_table() -> NormalizedTable {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/all_runners_sample.csv");
    RaceData::load(path).expect("fixture should load").table
}

// =========================================================================
// Section 1: Normalization
// =========================================================================

#[test]
fn test_fixture_report() {
    let table = load_table();
    let report = table.report();

    assert_eq!(report.input_rows, 15);
    assert_eq!(report.dropped_status, 2);
    assert_eq!(report.dropped_gender, 1);
    assert_eq!(report.retained, 12);
    assert_eq!(report.imputed_rows, 1);
    assert_eq!(report.undefined_pace, 1);
}

#[test]
fn test_gender_counts_cover_every_cohort() {
    let table = load_table();

    for distance in table.distances() {
        let cohort = table.cohort(distance);
        let counts = cohort.gender_counts();
        assert_eq!(counts.male + counts.female, cohort.len(), "distance {}", distance);
    }
}

#[test]
fn test_pace_for_every_row() {
    let table = load_table();

    for r in table.records() {
        if r.result_distance > 0.0 {
            assert_relative_eq!(
                r.pace_seconds.unwrap(),
                r.result_time / (r.result_distance / 1000.0),
                epsilon = 1e-9
            );
        } else {
            assert!(r.pace_seconds.is_none(), "bib {} should have no pace", r.bib);
        }
    }

    let ivanov = table.records().iter().find(|r| r.bib == "101").unwrap();
    assert_eq!(ivanov.pace_str.as_deref(), Some("03:45"));
}

#[test]
fn test_missing_time_is_zero_and_flagged() {
    let table = load_table();
    let kozlova = table.records().iter().find(|r| r.bib == "204").unwrap();

    assert_eq!(kozlova.result_time, 0.0);
    assert!(kozlova.imputed.contains(ImputedFields::RESULT_TIME));
    assert_eq!(kozlova.gender, Gender::Female);
}

#[test]
fn test_renormalizing_changes_nothing() {
    let table = load_table();
    let again = normalize(&table.to_frame().unwrap()).unwrap();

    assert_eq!(table.records(), again.records());
    assert_eq!(again.report().retained, table.len());
}

// =========================================================================
// Section 2: Cohorts and taxonomy
// =========================================================================

#[test]
fn test_cohort_choices_only_known_distances() {
    let table = load_table();
    let choices = cohort_choices(&table);

    let distances: Vec<u32> = choices.iter().map(|c| c.distance).collect();
    assert_eq!(distances, vec![2500, 5000, 10000, 16000]);

    let short = &choices[0];
    assert_eq!(short.finishers, 0);
    assert!(short.summary.is_none());

    let long = &choices[3];
    assert_eq!(long.label, "16 км");
    assert_eq!(long.finishers, 4);
    assert_eq!(long.summary.as_ref().unwrap().median_clock, "1:03:45");

    // Unlabelled distances stay in the table
    assert_eq!(table.cohort(21097.0).len(), 1);
}

#[test]
fn test_median_of_three() {
    let table = load_table();
    let summary = table.cohort(5000.0).summary().unwrap();

    assert_eq!(summary.finishers, 3);
    assert_eq!(summary.median_seconds, 1200.0);
    assert_eq!(summary.male, 2);
    assert_eq!(summary.female, 1);
}

#[test]
fn test_empty_cohort_statistics_fail_fast() {
    let table = load_table();
    let cohort = table.cohort(2500.0);

    assert!(matches!(cohort.summary(), Err(ResultsError::EmptyCohort { .. })));
    assert!(matches!(resolve(&cohort, "101"), Resolution::NotFound { .. }));
}

// =========================================================================
// Section 3: Resolution and scoring
// =========================================================================

#[test]
fn test_ivanov_disambiguation() {
    let table = load_table();
    let cohort = table.cohort(16000.0);

    let Resolution::Ambiguous(ambiguity) = resolve(&cohort, "ivanov") else {
        panic!("expected two Ivanovs");
    };
    assert_eq!(ambiguity.candidates.len(), 2);

    for candidate in &ambiguity.candidates {
        let picked = ambiguity.select_bib(&candidate.bib);
        assert_eq!(picked.record().unwrap().bib, candidate.bib);
    }
}

#[test]
fn test_unknown_bib_and_empty_query() {
    let table = load_table();
    let cohort = table.cohort(16000.0);

    assert!(matches!(resolve(&cohort, "999999"), Resolution::NotFound { .. }));
    assert!(matches!(resolve(&cohort, ""), Resolution::Empty));
    // Bib 301 exists, but in the 5 km cohort
    assert!(matches!(resolve(&cohort, "301"), Resolution::NotFound { .. }));
}

#[test]
fn test_faster_runner_has_higher_percentile() {
    let table = load_table();
    let cohort = table.cohort(5000.0);
    let scorer = CohortScorer::default();

    let fast = resolve(&cohort, "301").record().unwrap();
    let slow = resolve(&cohort, "303").record().unwrap();

    let fast = scorer.score(&cohort, fast).unwrap();
    let slow = scorer.score(&cohort, slow).unwrap();

    assert!(fast.faster_than_percent > slow.faster_than_percent);
    assert_relative_eq!(fast.faster_than_percent, 66.67, epsilon = 1e-9);
    assert!(fast.source_ranks_consistent);
}

#[test]
fn test_percentile_monotonic_within_cohort() {
    let table = load_table();

    for kind in [PercentileKind::Weak, PercentileKind::Rank] {
        let scorer = CohortScorer::new(kind);
        for distance in table.distances() {
            let cohort = table.cohort(distance);
            for a in cohort.rows() {
                for b in cohort.rows() {
                    if a.result_time < b.result_time {
                        let pa = scorer.score(&cohort, a).unwrap().faster_than_percent;
                        let pb = scorer.score(&cohort, b).unwrap().faster_than_percent;
                        assert!(pa >= pb);
                    }
                }
            }
        }
    }
}

#[test]
fn test_zero_time_runner_flags_rank_mismatch() {
    let table = load_table();
    let cohort = table.cohort(10000.0);
    let kozlova = resolve(&cohort, "204").record().unwrap();

    let standing = CohortScorer::default().score(&cohort, kozlova).unwrap();
    assert_eq!(standing.rank_abs, 3);
    assert_eq!(standing.cohort_rank, 1);
    assert!(!standing.source_ranks_consistent);
}

#[test]
fn test_session_round_trip() {
    let table = load_table();
    let scorer = CohortScorer::default();
    let mut session = Session::default();

    session.set_query("Ivanov");
    let view = session.evaluate(&table, &scorer);
    let Resolution::Ambiguous(ambiguity) = &view.resolution else {
        panic!("expected Ambiguous");
    };
    let row = ambiguity.candidates[1].row_id;

    session.select(Selection::Row(row));
    let view = session.evaluate(&table, &scorer);
    let standing = view.standing.expect("selection should resolve");

    assert_eq!(standing.name, "Ivanov Petr");
    assert_eq!(standing.rank_gender, 3);
    assert_relative_eq!(standing.faster_than_percent, 0.0, epsilon = 1e-9);
}
