//! LazyFrame materialization helpers with column validation
//!
//! Provides safe, explicit patterns for projecting raw result tables so that
//! a renamed or absent column fails loudly at load time instead of surfacing
//! as an empty cohort later.

use crate::error::{Result, ResultsError};
use polars::prelude::*;

/// Names from `columns` that are absent from `df`, in the order given
pub fn missing_columns(df: &DataFrame, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .filter(|&&name| df.get_column_index(name).is_none())
        .map(|&name| name.to_string())
        .collect()
}

/// Materialize LazyFrame with an explicit projection and validation
///
/// # Arguments
/// * `df` - Source table
/// * `required` - Column names that must exist before projecting
/// * `projection` - Expressions to select (one output column each)
/// * `context` - Context for log messages (e.g., "normalize")
///
/// # Errors
/// Returns `ResultsError::MissingColumns` listing every absent required
/// column, or the Polars error if the projection fails.
pub fn materialize_with_columns(
    df: &DataFrame,
    required: &[&str],
    projection: &[Expr],
    context: &str,
) -> Result<DataFrame> {
    let missing = missing_columns(df, required);
    if !missing.is_empty() {
        tracing::warn!("{}: missing columns {:?}", context, missing);
        return Err(ResultsError::MissingColumns(missing));
    }

    let projected = df.clone().lazy().select(projection).collect()?;

    tracing::debug!(
        "{}: materialized {} rows x {} columns",
        context,
        projected.height(),
        projected.width()
    );

    Ok(projected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_with_columns_success() {
        let df = df![
            "bib" => &[101i64, 102],
            "name" => &["Ivanov Ivan", "Petrova Anna"],
            "race_name" => &["Garden Ring", "Garden Ring"],
        ]
        .unwrap();

        let projected = materialize_with_columns(
            &df,
            &["bib", "name"],
            &[col("bib").cast(DataType::String), col("name")],
            "test",
        )
        .unwrap();

        assert_eq!(projected.width(), 2);
        assert_eq!(projected.height(), 2);
        assert_eq!(projected.column("bib").unwrap().str().unwrap().get(0), Some("101"));
    }

    #[test]
    fn test_materialize_with_columns_missing() {
        let df = df![
            "bib" => &[101i64],
        ]
        .unwrap();

        let result = materialize_with_columns(
            &df,
            &["bib", "result_time", "gender"],
            &[col("bib")],
            "test",
        );

        match result {
            Err(ResultsError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["result_time".to_string(), "gender".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|df| df.height())),
        }
    }

    #[test]
    fn test_missing_columns_empty_when_all_present() {
        let df = df![
            "bib" => &["1"],
            "name" => &["A"],
        ]
        .unwrap();

        assert!(missing_columns(&df, &["name", "bib"]).is_empty());
    }
}
