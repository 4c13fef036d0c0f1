//! Library error type
//!
//! Recoverable lookup outcomes (ambiguous query, runner not found) are not
//! errors; they are `Resolution` variants. This enum covers conditions that
//! stop a computation: schema problems at load time and statistics requested
//! on a cohort that has no finishers.

use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResultsError>;

#[derive(Error, Debug)]
pub enum ResultsError {
    /// Input table lacks columns the normalizer needs
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Median/percentile/histogram requested on a cohort with zero rows
    #[error("no finishers at distance {distance} m")]
    EmptyCohort { distance: f64 },

    #[error("distance {0} m is not part of the event taxonomy")]
    UnknownDistance(f64),

    #[error("histogram needs at least one bin")]
    InvalidBins,

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
