//! Race Results Scorer
//!
//! Result derivation and ranking for a static race-results snapshot.
//!
//! - `data`: Loading the results export with Polars
//! - `normalizer`: Finisher filtering, zero substitution, pace derivation
//! - `cohort` / `distribution`: Per-distance summaries and histograms
//! - `resolver`: Bib/name lookup with explicit disambiguation
//! - `scorer`: Rank and "faster than P%" standing within a cohort
//! - `session`: Per-user state evaluated against the shared table
//!
//! The optional `api` feature adds an Axum JSON server (`api_server`).

pub mod error;
pub mod types;
pub mod utils;
pub mod config;
pub mod data;
pub mod normalizer;
pub mod distances;
pub mod cohort;
pub mod distribution;
pub mod resolver;
pub mod scorer;
pub mod session;
pub mod report;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use error::{Result, ResultsError};
pub use types::{Gender, ImputedFields, RunnerRecord};
pub use utils::PercentileKind;
pub use config::AppConfig;
pub use data::RaceData;
pub use normalizer::{normalize, NormalizeReport, NormalizedTable};
pub use cohort::{Cohort, CohortSummary};
pub use resolver::{resolve, Ambiguity, Candidate, Resolution, Selection};
pub use scorer::{CohortScorer, RunnerStanding};
pub use session::{Session, SessionView};

#[cfg(feature = "api")]
pub use api_server::{AppState, create_router};
