//! Distance cohorts and their summary statistics
//!
//! A cohort is a borrowed view over the finishers of one exact distance.
//! Every statistic in the crate is computed on a single cohort.

use crate::distances::label_for;
use crate::error::{Result, ResultsError};
use crate::types::{Gender, RunnerRecord};
use crate::utils::{format_clock, median};
use serde::Serialize;

/// Finishers sharing one nominal distance
#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    distance: f64,
    rows: Vec<&'a RunnerRecord>,
}

/// Finisher counts by gender
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
}

/// Cohort-level figures shown above the distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub distance: f64,
    pub label: Option<&'static str>,
    pub finishers: usize,
    pub male: usize,
    pub female: usize,
    pub median_seconds: f64,
    /// `H:MM:SS`
    pub median_clock: String,
    pub fastest_seconds: f64,
    pub slowest_seconds: f64,
}

impl<'a> Cohort<'a> {
    pub fn new(distance: f64, rows: Vec<&'a RunnerRecord>) -> Self {
        Self { distance, rows }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn rows(&self) -> &[&'a RunnerRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fails fast before any statistic touches an empty sample
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(ResultsError::EmptyCohort {
                distance: self.distance,
            });
        }
        Ok(())
    }

    /// `result_time` of every finisher, in table order
    pub fn times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.result_time).collect()
    }

    pub fn gender_counts(&self) -> GenderCounts {
        self.rows.iter().fold(GenderCounts::default(), |mut counts, r| {
            match r.gender {
                Gender::Male => counts.male += 1,
                Gender::Female => counts.female += 1,
            }
            counts
        })
    }

    /// Finisher count, gender split, median and range of finish times
    ///
    /// # Errors
    /// `ResultsError::EmptyCohort` when there are no finishers.
    pub fn summary(&self) -> Result<CohortSummary> {
        self.ensure_not_empty()?;

        let times = self.times();
        let median_seconds = median(&times).ok_or(ResultsError::EmptyCohort {
            distance: self.distance,
        })?;
        let fastest_seconds = times.iter().copied().fold(f64::INFINITY, f64::min);
        let slowest_seconds = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let counts = self.gender_counts();

        Ok(CohortSummary {
            distance: self.distance,
            label: label_for(self.distance),
            finishers: self.rows.len(),
            male: counts.male,
            female: counts.female,
            median_seconds,
            median_clock: format_clock(median_seconds),
            fastest_seconds,
            slowest_seconds,
        })
    }
}
