//! Utility modules for result scoring
//!
//! Contains shared functionality used across the normalizer and scorer:
//! - Stats: Median, percentile of score, rounding
//! - Time formatting: Pace and clock strings
//! - LazyFrame helpers: Safe materialization with column validation

pub mod stats;
pub mod time_format;
pub mod lazy_helpers;

// Re-export commonly used types
pub use stats::{PercentileKind, percentile_of_score, faster_than_percent, median, round_to};
pub use time_format::{format_pace, format_clock};
pub use lazy_helpers::{materialize_with_columns, missing_columns};
