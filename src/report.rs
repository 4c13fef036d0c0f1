//! Plain-text rendering for terminal output

use crate::cohort::CohortSummary;
use crate::distances::CohortChoice;
use crate::resolver::{Ambiguity, Resolution};
use crate::scorer::RunnerStanding;
use crate::session::SessionView;
use crate::types::Gender;
use crate::utils::format_clock;
use std::fmt::Write;

pub fn render_summary(summary: &CohortSummary) -> String {
    let distance = summary
        .label
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} m", summary.distance));

    let mut out = String::new();
    let _ = writeln!(out, "{} finishers at {}", summary.finishers, distance);
    let _ = writeln!(out, "  incl. {} men and {} women", summary.male, summary.female);
    let _ = writeln!(out, "  median time: {}", summary.median_clock);
    let _ = writeln!(
        out,
        "  range: {} - {}",
        format_clock(summary.fastest_seconds),
        format_clock(summary.slowest_seconds)
    );
    out
}

pub fn render_candidates(ambiguity: &Ambiguity<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} runners match '{}', pick one by bib or row:",
        ambiguity.len(),
        ambiguity.query
    );
    for candidate in &ambiguity.candidates {
        let _ = writeln!(out, "  [row {}] {}", candidate.row_id, candidate.label);
    }
    out
}

pub fn render_standing(standing: &RunnerStanding) -> String {
    let group = match standing.gender {
        Gender::Male => "men",
        Gender::Female => "women",
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} (№{}), {}:", standing.name, standing.bib, standing.result);
    let _ = writeln!(out, "  - place {} among all runners", standing.rank_abs);
    let _ = writeln!(out, "  - place {} among {}", standing.rank_gender, group);
    let _ = writeln!(
        out,
        "  - faster than {}% of {} finishers",
        standing.faster_than_percent, standing.cohort_size
    );
    if let Some(pace) = &standing.pace_str {
        let _ = writeln!(out, "  - pace {} per km", pace);
    }
    if !standing.source_ranks_consistent {
        let _ = writeln!(
            out,
            "  note: within this distance the runner places {} overall and {} among {}",
            standing.cohort_rank, standing.cohort_gender_rank, group
        );
    }
    out
}

pub fn render_choices(choices: &[CohortChoice]) -> String {
    let mut out = String::new();
    for choice in choices {
        let median = choice
            .summary
            .as_ref()
            .map(|s| s.median_clock.clone())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:>8}  {:>5} finishers  median {}",
            choice.label, choice.finishers, median
        );
    }
    out
}

pub fn render_view(view: &SessionView<'_>) -> String {
    let mut out = match &view.summary {
        Some(summary) => render_summary(summary),
        None => format!("No finishers at {} m\n", view.distance),
    };

    match &view.resolution {
        Resolution::Empty => {}
        Resolution::Resolved(_) => {
            if let Some(standing) = &view.standing {
                out.push_str(&render_standing(standing));
            }
        }
        Resolution::Ambiguous(ambiguity) => out.push_str(&render_candidates(ambiguity)),
        Resolution::NotFound { reason } => {
            let _ = writeln!(out, "Not found: {}", reason);
        }
    }
    out
}
