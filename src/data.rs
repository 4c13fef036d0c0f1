//! Data Loading
//!
//! Reads the finisher export with Polars and hands it to the normalizer.
//! CSV and Parquet are both accepted, chosen by file extension.
//!
//! A missing file or a schema without the required columns aborts startup;
//! everything after that is recoverable.

use crate::normalizer::{normalize, NormalizedTable};
use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Normalized results plus where they came from
pub struct RaceData {
    pub table: NormalizedTable,
    pub source: PathBuf,
}

impl RaceData {
    /// Load and normalize a results export
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading results from {}", path.display());

        let raw = Self::read_frame(path)?;
        let table = normalize(&raw)
            .with_context(|| format!("Failed to normalize {}", path.display()))?;

        let report = table.report();
        tracing::info!(
            "  Rows: {} read, {} finishers kept",
            report.input_rows,
            report.retained
        );
        tracing::info!(
            "  Dropped: {} by status, {} by gender",
            report.dropped_status,
            report.dropped_gender
        );
        if report.imputed_rows > 0 {
            tracing::warn!(
                "  {} finisher rows had missing values substituted",
                report.imputed_rows
            );
        }
        if report.undefined_pace > 0 {
            tracing::warn!("  {} finisher rows have no distance, pace undefined", report.undefined_pace);
        }

        Ok(RaceData {
            table,
            source: path.to_path_buf(),
        })
    }

    /// Read the raw table without normalizing it
    pub fn read_frame(path: &Path) -> Result<DataFrame> {
        let is_parquet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

        if is_parquet {
            Self::load_parquet(path)
        } else {
            Self::load_csv(path)
        }
    }

    /// Load results CSV
    ///
    /// The whole file is scanned for schema inference so a column that turns
    /// alphanumeric late in the file (bibs like "A12") does not fail parsing.
    fn load_csv(path: &Path) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
            .finish()
            .with_context(|| format!("Failed to load results CSV: {}", path.display()))
    }

    fn load_parquet(path: &Path) -> Result<DataFrame> {
        LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to scan parquet: {}", path.display()))?
            .collect()
            .with_context(|| format!("Failed to load results parquet: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/all_runners_sample.csv")
    }

    #[test]
    fn test_load_fixture() {
        let data = RaceData::load(fixture()).expect("Failed to load fixture");
        assert_eq!(data.table.report().input_rows, 15);
        assert_eq!(data.table.len(), 12);
    }

    #[test]
    fn test_missing_file_fails() {
        let err = RaceData::load("does/not/exist.csv").err().unwrap();
        assert!(format!("{:#}", err).contains("does/not/exist.csv"));
    }
}
