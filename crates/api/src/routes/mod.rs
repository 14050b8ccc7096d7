//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orcamento_core::dataset::IngestError;
use orcamento_shared::AppError;
use serde_json::json;

use crate::AppState;

pub mod cache;
pub mod health;
pub mod reports;
pub mod units;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(units::routes())
        .merge(reports::routes())
        .merge(cache::routes())
}

/// Renders an error as `{"error": code, "message": text}`.
pub fn error_response(error: &AppError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": error.to_string(),
        })),
    )
        .into_response()
}

/// Maps an ingestion failure to an API error.
pub fn ingest_error(error: &IngestError) -> AppError {
    match error {
        IngestError::NotFound(_) | IngestError::Spreadsheet(_) | IngestError::NoSheets(_) => {
            AppError::DataSource(error.to_string())
        }
        IngestError::MissingColumn { .. } => AppError::Internal(error.to_string()),
    }
}
