//! Runtime configuration from environment variables
//!
//! | Variable           | Default                 |
//! |--------------------|-------------------------|
//! | `RESULTS_PATH`     | `data/all_runners.csv`  |
//! | `PORT`             | `3000`                  |
//! | `DEFAULT_DISTANCE` | `16000`                 |
//! | `PERCENTILE_KIND`  | `weak`                  |
//! | `HISTOGRAM_BINS`   | `50`                    |

use crate::distances::{self, DEFAULT_DISTANCE};
use crate::distribution::DEFAULT_BINS;
use crate::utils::PercentileKind;
use anyhow::{bail, Context, Result};

pub const DEFAULT_RESULTS_PATH: &str = "data/all_runners.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub results_path: String,
    pub port: u16,
    pub default_distance: u32,
    pub percentile_kind: PercentileKind,
    pub histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            results_path: DEFAULT_RESULTS_PATH.to_string(),
            port: 3000,
            default_distance: DEFAULT_DISTANCE,
            percentile_kind: PercentileKind::default(),
            histogram_bins: DEFAULT_BINS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the environment)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup("RESULTS_PATH") {
            config.results_path = path;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(distance) = lookup("DEFAULT_DISTANCE") {
            config.default_distance = distances::parse_label(&distance)
                .with_context(|| format!("DEFAULT_DISTANCE '{}' is not a known distance", distance))?;
        }
        if let Some(kind) = lookup("PERCENTILE_KIND") {
            config.percentile_kind = kind.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(bins) = lookup("HISTOGRAM_BINS") {
            config.histogram_bins = bins
                .parse()
                .with_context(|| format!("HISTOGRAM_BINS must be a number, got '{}'", bins))?;
            if config.histogram_bins == 0 {
                bail!("HISTOGRAM_BINS must be at least 1");
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_distance, 16000);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DEFAULT_DISTANCE", "5 км"),
            ("PERCENTILE_KIND", "rank"),
            ("HISTOGRAM_BINS", "20"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.default_distance, 5000);
        assert_eq!(config.percentile_kind, PercentileKind::Rank);
        assert_eq!(config.histogram_bins, 20);
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::from_lookup(lookup(&[("PORT", "abc")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("DEFAULT_DISTANCE", "42195")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("PERCENTILE_KIND", "median")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("HISTOGRAM_BINS", "0")])).is_err());
    }
}
