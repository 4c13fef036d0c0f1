//! Dataset Normalizer
//!
//! Turns the raw results table into typed finisher records:
//! 1. Project the required columns (extraneous ones such as `category`,
//!    `status_message`, `race_name`, `rank_category` are dropped) and cast
//!    them to their working types
//! 2. Keep only finishers (`status == "Q"`) with a recognized gender
//! 3. Substitute zero for missing numeric values and flag the substitution
//! 4. Derive pace (seconds per km and `MM:SS`), left undefined for zero
//!    distance
//!
//! The output is immutable and partitioned by `result_distance`. Feeding
//! `NormalizedTable::to_frame()` back through `normalize` reproduces the same
//! records.

use crate::cohort::Cohort;
use crate::error::Result;
use crate::types::{Gender, ImputedFields, RunnerRecord};
use crate::utils::{format_pace, materialize_with_columns};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Status code of a qualified finisher
pub const FINISHED_STATUS: &str = "Q";

/// Columns the normalizer reads; any other column is dropped
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "bib",
    "name",
    "gender",
    "status",
    "result_time",
    "result",
    "result_distance",
    "rank_abs",
    "rank_gender",
];

/// Optional diagnostics column written by `to_frame`
pub const IMPUTED_COLUMN: &str = "imputed_fields";

/// Counts describing what normalization kept, dropped and substituted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub input_rows: usize,
    pub retained: usize,
    pub dropped_status: usize,
    pub dropped_gender: usize,
    /// Retained rows with at least one substituted field
    pub imputed_rows: usize,
    /// Retained rows whose distance is zero, so pace is undefined
    pub undefined_pace: usize,
}

/// Normalized, distance-partitioned finisher table
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    records: Vec<RunnerRecord>,
    /// Distance key → indices into `records`, in table order
    cohorts: FxHashMap<u64, Vec<usize>>,
    report: NormalizeReport,
}

/// Hash key for an exact distance value (-0.0 and 0.0 share a cohort)
fn distance_key(distance: f64) -> u64 {
    (distance + 0.0).to_bits()
}

/// Canonical string form of a bib: integral floats lose their ".0"
pub fn normalize_bib(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(int_part) = trimmed.strip_suffix(".0") {
        if !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit()) {
            return int_part.to_string();
        }
    }
    trimmed.to_string()
}

/// Missing or NaN becomes 0 and sets `flag`
fn fill_zero(value: Option<f64>, flag: u8, imputed: &mut ImputedFields) -> f64 {
    match value {
        Some(v) if !v.is_nan() => v,
        _ => {
            imputed.insert(flag);
            0.0
        }
    }
}

fn fill_empty(value: Option<&str>, flag: u8, imputed: &mut ImputedFields) -> String {
    match value {
        Some(v) => v.to_string(),
        None => {
            imputed.insert(flag);
            String::new()
        }
    }
}

/// Seconds per km, undefined for non-positive distance
pub fn pace_seconds(result_time: f64, result_distance: f64) -> Option<f64> {
    if result_distance > 0.0 {
        Some(result_time / (result_distance / 1000.0))
    } else {
        None
    }
}

fn typed_projection(with_imputed: bool) -> Vec<Expr> {
    let mut exprs = vec![
        col("bib").cast(DataType::String),
        col("name").cast(DataType::String),
        col("gender").cast(DataType::String),
        col("status").cast(DataType::String),
        col("result").cast(DataType::String),
        col("result_time").cast(DataType::Float64),
        col("result_distance").cast(DataType::Float64),
        col("rank_abs").cast(DataType::Float64),
        col("rank_gender").cast(DataType::Float64),
    ];
    if with_imputed {
        exprs.push(col(IMPUTED_COLUMN).cast(DataType::UInt8));
    }
    exprs
}

/// Normalize a raw results table
///
/// # Errors
/// `ResultsError::MissingColumns` when the schema lacks a required column;
/// Polars errors from projection. Malformed cells never fail.
pub fn normalize(raw: &DataFrame) -> Result<NormalizedTable> {
    let with_imputed = raw.get_column_index(IMPUTED_COLUMN).is_some();
    let typed = materialize_with_columns(
        raw,
        &REQUIRED_COLUMNS,
        &typed_projection(with_imputed),
        "normalize",
    )?;

    let bib = typed.column("bib")?.str()?;
    let name = typed.column("name")?.str()?;
    let gender = typed.column("gender")?.str()?;
    let status = typed.column("status")?.str()?;
    let result = typed.column("result")?.str()?;
    let result_time = typed.column("result_time")?.f64()?;
    let result_distance = typed.column("result_distance")?.f64()?;
    let rank_abs = typed.column("rank_abs")?.f64()?;
    let rank_gender = typed.column("rank_gender")?.f64()?;
    let prior_imputed = if with_imputed {
        Some(typed.column(IMPUTED_COLUMN)?.u8()?)
    } else {
        None
    };

    let mut report = NormalizeReport {
        input_rows: typed.height(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(typed.height());

    for idx in 0..typed.height() {
        if status.get(idx).map(str::trim) != Some(FINISHED_STATUS) {
            report.dropped_status += 1;
            continue;
        }

        let Some(gender) = gender.get(idx).and_then(Gender::parse) else {
            report.dropped_gender += 1;
            continue;
        };

        let mut imputed = ImputedFields::from_bits(
            prior_imputed.and_then(|c| c.get(idx)).unwrap_or(0),
        );

        let bib = match bib.get(idx) {
            Some(raw_bib) => normalize_bib(raw_bib),
            None => {
                imputed.insert(ImputedFields::BIB);
                String::new()
            }
        };
        let name = fill_empty(name.get(idx), ImputedFields::NAME, &mut imputed);
        let result = fill_empty(result.get(idx), ImputedFields::RESULT, &mut imputed);
        let time = fill_zero(result_time.get(idx), ImputedFields::RESULT_TIME, &mut imputed);
        let distance = fill_zero(
            result_distance.get(idx),
            ImputedFields::RESULT_DISTANCE,
            &mut imputed,
        );
        let rank_abs = fill_zero(rank_abs.get(idx), ImputedFields::RANK_ABS, &mut imputed) as i64;
        let rank_gender =
            fill_zero(rank_gender.get(idx), ImputedFields::RANK_GENDER, &mut imputed) as i64;

        let pace = pace_seconds(time, distance);
        if pace.is_none() {
            report.undefined_pace += 1;
        }
        if !imputed.is_empty() {
            report.imputed_rows += 1;
        }

        records.push(RunnerRecord {
            row_id: records.len(),
            bib,
            name,
            gender,
            status: FINISHED_STATUS.to_string(),
            result_time: time,
            result,
            result_distance: distance,
            rank_abs,
            rank_gender,
            pace_seconds: pace,
            pace_str: pace.and_then(format_pace),
            imputed,
        });
    }

    report.retained = records.len();
    tracing::debug!("normalize: {:?}", report);

    Ok(NormalizedTable::from_records(records, report))
}

impl NormalizedTable {
    fn from_records(records: Vec<RunnerRecord>, report: NormalizeReport) -> Self {
        let mut cohorts: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
        for (idx, record) in records.iter().enumerate() {
            cohorts
                .entry(distance_key(record.result_distance))
                .or_default()
                .push(idx);
        }

        Self {
            records,
            cohorts,
            report,
        }
    }

    pub fn records(&self) -> &[RunnerRecord] {
        &self.records
    }

    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct distances present in the table, ascending
    pub fn distances(&self) -> Vec<f64> {
        let mut distances: Vec<f64> = self
            .cohorts
            .values()
            .filter_map(|rows| rows.first())
            .map(|&idx| self.records[idx].result_distance)
            .collect();
        distances.sort_by(|a, b| a.total_cmp(b));
        distances
    }

    /// Finishers whose `result_distance` equals `distance` exactly
    ///
    /// A distance with no finishers yields an empty cohort, not an error.
    pub fn cohort(&self, distance: f64) -> Cohort<'_> {
        let rows = self
            .cohorts
            .get(&distance_key(distance))
            .map(|indices| indices.iter().map(|&idx| &self.records[idx]).collect())
            .unwrap_or_default();
        Cohort::new(distance, rows)
    }

    /// Fastest and slowest finite `result_time` across all distances
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.records
            .iter()
            .map(|r| r.result_time)
            .filter(|t| t.is_finite())
            .fold(None, |acc, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }

    /// Project back to a DataFrame with normalized and derived columns
    ///
    /// Includes `status` and the `imputed_fields` mask so that the frame can
    /// be normalized again without losing rows or diagnostics.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let n = self.records.len();
        let mut bib = Vec::with_capacity(n);
        let mut name = Vec::with_capacity(n);
        let mut gender = Vec::with_capacity(n);
        let mut status = Vec::with_capacity(n);
        let mut result_time = Vec::with_capacity(n);
        let mut result = Vec::with_capacity(n);
        let mut result_distance = Vec::with_capacity(n);
        let mut rank_abs = Vec::with_capacity(n);
        let mut rank_gender = Vec::with_capacity(n);
        let mut pace = Vec::with_capacity(n);
        let mut pace_str = Vec::with_capacity(n);
        let mut imputed = Vec::with_capacity(n);

        for r in &self.records {
            bib.push(r.bib.clone());
            name.push(r.name.clone());
            gender.push(r.gender.as_str());
            status.push(r.status.clone());
            result_time.push(r.result_time);
            result.push(r.result.clone());
            result_distance.push(r.result_distance);
            rank_abs.push(r.rank_abs);
            rank_gender.push(r.rank_gender);
            pace.push(r.pace_seconds);
            pace_str.push(r.pace_str.clone());
            imputed.push(r.imputed.bits());
        }

        let df = df!(
            "bib" => bib,
            "name" => name,
            "gender" => gender,
            "status" => status,
            "result_time" => result_time,
            "result" => result,
            "result_distance" => result_distance,
            "rank_abs" => rank_abs,
            "rank_gender" => rank_gender,
            "pace_seconds" => pace,
            "pace_str" => pace_str,
            IMPUTED_COLUMN => imputed,
        )?;

        Ok(df)
    }
}
