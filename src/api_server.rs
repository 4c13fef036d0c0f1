// Axum API Server Module
//
// Purpose: JSON API over the normalized results table for the browser front end.
// The table is loaded once and shared read-only; each request is one
// recomputation pass over a single cohort.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::data::RaceData;
use crate::distances::{self, cohort_choices};
use crate::distribution::{time_ticks, DEFAULT_TICK_INTERVAL};
use crate::error::ResultsError;
use crate::normalizer::NormalizedTable;
use crate::resolver::Selection;
use crate::scorer::CohortScorer;
use crate::session::Session;

/// Upper bound on requested histogram bins
const MAX_BINS: usize = 500;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<NormalizedTable>,
    pub scorer: CohortScorer,
    pub cache: Cache<String, serde_json::Value>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Load the results file named by the config
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let data = RaceData::load(&config.results_path)?;
        Ok(Self::from_table(data.table, config))
    }

    pub fn from_table(table: NormalizedTable, config: AppConfig) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(300))
            .build();

        Self {
            table: Arc::new(table),
            scorer: CohortScorer::new(config.percentile_kind),
            cache,
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/distances", get(list_distances))
        .route("/api/cohorts/:distance/summary", get(cohort_summary))
        .route("/api/cohorts/:distance/histogram", get(cohort_histogram))
        .route("/api/cohorts/:distance/lookup", get(lookup_runner))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "finishers": state.table.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_distances(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = "distances".to_string();
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for distance list");
        return Ok(Json(cached));
    }

    let result = serde_json::json!({
        "default": state.config.default_distance,
        "distances": cohort_choices(&state.table),
    });

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn cohort_summary(
    State(state): State<AppState>,
    Path(distance): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let distance = known_distance(distance)?;

    let cache_key = format!("summary:{}", distance);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let summary = state.table.cohort(distance).summary()?;
    let result = serde_json::to_value(&summary)
        .map_err(|e| AppError::Internal(format!("JSON encode error: {}", e)))?;

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

#[derive(Debug, serde::Deserialize)]
struct HistogramQuery {
    bins: Option<usize>,
}

async fn cohort_histogram(
    State(state): State<AppState>,
    Path(distance): Path<u32>,
    Query(params): Query<HistogramQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let distance = known_distance(distance)?;
    let bins = params.bins.unwrap_or(state.config.histogram_bins).min(MAX_BINS);

    let cache_key = format!("histogram:{}:{}", distance, bins);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let cohort = state.table.cohort(distance);
    let histogram = cohort.histogram(bins)?;
    let median = cohort.summary()?.median_seconds;

    // Axis spans the whole event so switching distance keeps the scale
    let ticks = state
        .table
        .time_range()
        .map(|(lo, hi)| time_ticks(lo, hi, DEFAULT_TICK_INTERVAL))
        .unwrap_or_default();

    let result = serde_json::json!({
        "histogram": histogram,
        "median_seconds": median,
        "ticks": ticks,
    });

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

#[derive(Debug, serde::Deserialize)]
struct LookupQuery {
    q: Option<String>,
    /// Disambiguation pick by bib
    bib: Option<String>,
    /// Disambiguation pick by row id
    row: Option<usize>,
}

async fn lookup_runner(
    State(state): State<AppState>,
    Path(distance): Path<u32>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let distance = known_distance(distance)?;

    let mut session = Session::new(distance);
    session.set_query(params.q.unwrap_or_default());
    match (params.row, params.bib) {
        (Some(row), _) => session.select(Selection::Row(row)),
        (None, Some(bib)) => session.select(Selection::Bib(bib)),
        (None, None) => {}
    }

    let view = session.evaluate(&state.table, &state.scorer);
    tracing::debug!("lookup '{}' at {} m", session.query(), distance);

    let result = serde_json::to_value(&view)
        .map_err(|e| AppError::Internal(format!("JSON encode error: {}", e)))?;
    Ok(Json(result))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Only taxonomy distances are exposed as cohorts
fn known_distance(distance: u32) -> Result<f64, AppError> {
    let meters = f64::from(distance);
    if distances::is_known(meters) {
        Ok(meters)
    } else {
        Err(ResultsError::UnknownDistance(meters).into())
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<ResultsError> for AppError {
    fn from(err: ResultsError) -> Self {
        match err {
            ResultsError::EmptyCohort { .. } | ResultsError::UnknownDistance(_) => {
                AppError::NotFound(err.to_string())
            }
            ResultsError::InvalidBins => AppError::BadRequest(err.to_string()),
            ResultsError::MissingColumns(_) | ResultsError::Polars(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
