//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use orcamento_shared::CacheBackend;
use serde::Serialize;

use crate::AppState;

/// Which configured source files are present on disk.
#[derive(Debug, Serialize)]
pub struct SourceStatus {
    /// Revenue workbook.
    pub revenue: bool,
    /// Expenditure workbook.
    pub expenditure: bool,
    /// Classification workbook; reports still run without it.
    pub classification: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when a report source is missing.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Configured snapshot cache.
    pub cache_backend: CacheBackend,
    /// Current fiscal year used when a request names none.
    pub current_year: i32,
    /// Source availability.
    pub sources: SourceStatus,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let data = &state.config.data;
    let sources = SourceStatus {
        revenue: data.revenue_path.is_file(),
        expenditure: data.expenditure_path.is_file(),
        classification: data.classification_path.is_file(),
    };
    let status = if sources.revenue && sources.expenditure {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        cache_backend: state.config.cache.backend,
        current_year: state.config.report.current_year,
        sources,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
