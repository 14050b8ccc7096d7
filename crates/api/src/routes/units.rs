//! Managing unit listing.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use orcamento_core::dataset::{ALL_UNITS, DatasetKind, load_dataset};
use orcamento_shared::AppError;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::{error_response, ingest_error};
use crate::AppState;

/// Creates the unit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/units", get(list_units))
}

/// Query parameters for the unit listing.
#[derive(Debug, Deserialize)]
pub struct UnitsQuery {
    /// Source to list units from.
    #[serde(default = "default_source")]
    pub source: DatasetKind,
}

const fn default_source() -> DatasetKind {
    DatasetKind::Revenue
}

/// Units available for filtering.
#[derive(Debug, Serialize)]
pub struct UnitsResponse {
    /// Source the units were read from.
    pub source: DatasetKind,
    /// Value selecting every unit.
    pub all: &'static str,
    /// Distinct unit names, sorted.
    pub units: Vec<String>,
}

async fn list_units(State(state): State<AppState>, Query(query): Query<UnitsQuery>) -> Response {
    let source = query.source;
    let path = match source {
        DatasetKind::Revenue => state.config.data.revenue_path.clone(),
        DatasetKind::Expenditure => state.config.data.expenditure_path.clone(),
    };

    let task = tokio::task::spawn_blocking(move || load_dataset(state.cache.as_ref(), &path, source));
    match task.await {
        Ok(Ok(dataset)) => Json(UnitsResponse {
            source,
            all: ALL_UNITS,
            units: dataset.units(),
        })
        .into_response(),
        Ok(Err(e)) => {
            error!(error = %e, %source, "Failed to load units");
            error_response(&ingest_error(&e))
        }
        Err(e) => {
            error!(error = %e, "Unit listing task failed");
            error_response(&AppError::Internal("unit listing failed".to_string()))
        }
    }
}
