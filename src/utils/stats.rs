//! Cohort Statistics
//!
//! Order statistics over finish times: median, percentile of a score within
//! a sample, and the rounding used for display.
//!
//! All functions take the cohort's `result_time` values as a slice and never
//! look outside it. Callers guard against empty cohorts before calling
//! (`Cohort` returns `ResultsError::EmptyCohort`); the functions here return
//! `None` for an empty sample instead of producing NaN.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ranking convention for `percentile_of_score`
///
/// With `left` = values strictly below the score and `right` = values at or
/// below it, over `n` values:
/// - `Weak`:   right / n × 100 (percentage of values <= score)
/// - `Strict`: left / n × 100 (percentage of values < score)
/// - `Mean`:   (left + right) / 2n × 100
/// - `Rank`:   average rank of the score among ties, scaled to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentileKind {
    #[default]
    Weak,
    Strict,
    Mean,
    Rank,
}

impl FromStr for PercentileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weak" => Ok(Self::Weak),
            "strict" => Ok(Self::Strict),
            "mean" => Ok(Self::Mean),
            "rank" => Ok(Self::Rank),
            other => Err(format!(
                "unknown percentile kind '{}' (expected weak, strict, mean or rank)",
                other
            )),
        }
    }
}

/// Percentage of `values` that `score` is at or above, under `kind`
///
/// Returns `None` for an empty sample.
pub fn percentile_of_score(values: &[f64], score: f64, kind: PercentileKind) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let left = values.iter().filter(|&&v| v < score).count() as f64;
    let right = values.iter().filter(|&&v| v <= score).count() as f64;

    let pct = match kind {
        PercentileKind::Weak => right / n * 100.0,
        PercentileKind::Strict => left / n * 100.0,
        PercentileKind::Mean => (left + right) / n * 50.0,
        PercentileKind::Rank => {
            // Ties share the mean of their 1-based ranks; an absent score
            // sits just above the values below it.
            let plus1 = if right > left { 1.0 } else { 0.0 };
            (left + right + plus1) * 50.0 / n
        }
    };

    Some(pct)
}

/// "Faster than P% of the cohort" figure for a runner's time
///
/// P = round(100 - percentile_of_score(times, time), 2). Smaller times are
/// faster, so a smaller share of values at or below the score means a larger
/// share of the cohort beaten.
pub fn faster_than_percent(values: &[f64], score: f64, kind: PercentileKind) -> Option<f64> {
    percentile_of_score(values, score, kind).map(|pct| round_to(100.0 - pct, 2))
}

/// Median of the sample, averaging the two middle values for even sizes
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Round to `digits` decimal places
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
