//! Report routes.
//!
//! Every report is served as JSON. `format=table` returns the text rows
//! used for PDF and spreadsheet export instead of the structured report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use orcamento_core::dataset::{Dataset, DatasetKind, UnitFilter, load_classification, load_dataset};
use orcamento_core::reports::{
    CompositionReport, Report, ReportError, ReportParams, ReportService, TableExport, VariationMode,
};
use orcamento_shared::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{error_response, ingest_error};
use crate::AppState;

/// Oldest fiscal year accepted in queries.
pub const MIN_YEAR: i32 = 2000;
/// Newest fiscal year accepted in queries.
pub const MAX_YEAR: i32 = 2100;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/revenue/balance", get(revenue_balance))
        .route("/reports/revenue/estimate", get(revenue_estimate))
        .route("/reports/revenue/by-administration", get(revenue_by_administration))
        .route("/reports/revenue/updated-vs-initial", get(revenue_updated_vs_initial))
        .route("/reports/revenue/composition", get(revenue_composition))
        .route("/reports/revenue/current-account", get(revenue_by_current_account))
        .route("/reports/revenue/variation", get(revenue_variation))
        .route("/reports/expenditure/balance", get(expenditure_balance))
        .route("/reports/expenditure/by-nature", get(expenditure_by_nature))
        .route("/reports/expenditure/by-modality", get(expenditure_by_modality))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Output shape of a report response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Structured report.
    #[default]
    Json,
    /// Header and body text rows.
    Table,
}

/// Query parameters shared by every report.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Managing unit, or `todos` for all.
    #[serde(alias = "unidade")]
    pub unit: Option<String>,
    /// Current fiscal year; defaults to the configured one.
    pub year: Option<i32>,
    /// Output shape.
    #[serde(default)]
    pub format: ReportFormat,
}

impl ReportQuery {
    fn params(&self, default_year: i32) -> AppResult<ReportParams> {
        let year = self.year.unwrap_or(default_year);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(AppError::Validation(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
            )));
        }
        Ok(ReportParams::new(UnitFilter::from_query(self.unit.as_deref()), year))
    }
}

/// Query parameters of the variation analysis.
#[derive(Debug, Default, Deserialize)]
pub struct VariationQuery {
    /// `annual` (or `anual`) or `forecast_vs_realized` (or `previsao`).
    #[serde(default)]
    pub mode: VariationMode,
}

// ============================================================================
// Response Types
// ============================================================================

/// Anything a report route can return.
pub trait Exportable: Serialize {
    /// Text rows for export.
    fn table(&self) -> TableExport;
}

impl Exportable for Report {
    fn table(&self) -> TableExport {
        self.export()
    }
}

impl Exportable for CompositionReport {
    fn table(&self) -> TableExport {
        self.report.export()
    }
}

struct RouteError(AppError);

impl From<AppError> for RouteError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<ReportError> for RouteError {
    fn from(e: ReportError) -> Self {
        Self(AppError::Internal(e.to_string()))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn source_path(state: &AppState, kind: DatasetKind) -> PathBuf {
    match kind {
        DatasetKind::Revenue => state.config.data.revenue_path.clone(),
        DatasetKind::Expenditure => state.config.data.expenditure_path.clone(),
    }
}

/// Loads the source and builds a report off the async runtime.
async fn run_report<T, F>(
    state: AppState,
    query: ReportQuery,
    kind: DatasetKind,
    name: &'static str,
    build: F,
) -> Response
where
    T: Exportable + Send + 'static,
    F: FnOnce(&Dataset, &AppState, &ReportParams) -> Result<T, ReportError> + Send + 'static,
{
    let params = match query.params(state.config.report.current_year) {
        Ok(params) => params,
        Err(e) => return error_response(&e),
    };
    let format = query.format;

    let task = tokio::task::spawn_blocking(move || -> Result<T, RouteError> {
        let started = Instant::now();
        let path = source_path(&state, kind);
        let dataset: Arc<Dataset> =
            load_dataset(state.cache.as_ref(), &path, kind).map_err(|e| ingest_error(&e))?;
        let report = build(&dataset, &state, &params)?;
        info!(
            report = name,
            year = params.years.current,
            elapsed_ms = started.elapsed().as_millis(),
            "Generated report"
        );
        Ok(report)
    });

    match task.await {
        Ok(Ok(report)) => match format {
            ReportFormat::Json => Json(report).into_response(),
            ReportFormat::Table => Json(report.table()).into_response(),
        },
        Ok(Err(RouteError(e))) => {
            error!(error = %e, report = name, "Failed to generate report");
            error_response(&e)
        }
        Err(e) => {
            error!(error = %e, report = name, "Report task failed");
            error_response(&AppError::Internal("report task failed".to_string()))
        }
    }
}

// ============================================================================
// Revenue Handlers
// ============================================================================

async fn revenue_balance(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    run_report(state, query, DatasetKind::Revenue, "revenue_balance", |dataset, state, params| {
        let revenue = ReportService::revenue(dataset)?;
        Ok(ReportService::generate_revenue_balance(revenue, &state.catalog, params))
    })
    .await
}

async fn revenue_estimate(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    run_report(state, query, DatasetKind::Revenue, "revenue_estimate", |dataset, state, params| {
        let revenue = ReportService::revenue(dataset)?;
        Ok(ReportService::generate_revenue_estimate(revenue, &state.catalog, params))
    })
    .await
}

async fn revenue_by_administration(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    run_report(
        state,
        query,
        DatasetKind::Revenue,
        "revenue_by_administration",
        |dataset, state, params| {
            let revenue = ReportService::revenue(dataset)?;
            Ok(ReportService::generate_revenue_by_administration(revenue, &state.catalog, params))
        },
    )
    .await
}

async fn revenue_updated_vs_initial(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    run_report(
        state,
        query,
        DatasetKind::Revenue,
        "revenue_updated_vs_initial",
        |dataset, state, params| {
            let revenue = ReportService::revenue(dataset)?;
            Ok(ReportService::generate_revenue_updated_vs_initial(revenue, &state.catalog, params))
        },
    )
    .await
}

async fn revenue_composition(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    run_report(state, query, DatasetKind::Revenue, "revenue_composition", |dataset, state, params| {
        let revenue = ReportService::revenue(dataset)?;
        Ok(ReportService::generate_revenue_composition(revenue, &state.catalog, params))
    })
    .await
}

async fn revenue_by_current_account(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    run_report(
        state,
        query,
        DatasetKind::Revenue,
        "revenue_by_current_account",
        |dataset, state, params| {
            let revenue = ReportService::revenue(dataset)?;
            let names = load_classification(&state.config.data.classification_path);
            Ok(ReportService::generate_revenue_by_current_account(revenue, names.as_ref(), params))
        },
    )
    .await
}

async fn revenue_variation(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    Query(variation): Query<VariationQuery>,
) -> Response {
    let mode = variation.mode;
    run_report(state, query, DatasetKind::Revenue, "revenue_variation", move |dataset, state, params| {
        let revenue = ReportService::revenue(dataset)?;
        Ok(ReportService::generate_revenue_variation(revenue, &state.catalog, params, mode))
    })
    .await
}

// ============================================================================
// Expenditure Handlers
// ============================================================================

async fn expenditure_balance(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    run_report(state, query, DatasetKind::Expenditure, "expenditure_balance", |dataset, _, params| {
        let expenditure = ReportService::expenditure(dataset)?;
        Ok(ReportService::generate_expenditure_balance(expenditure, params))
    })
    .await
}

async fn expenditure_by_nature(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    run_report(state, query, DatasetKind::Expenditure, "expenditure_by_nature", |dataset, _, params| {
        let expenditure = ReportService::expenditure(dataset)?;
        Ok(ReportService::generate_expenditure_by_nature(expenditure, params))
    })
    .await
}

async fn expenditure_by_modality(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    run_report(
        state,
        query,
        DatasetKind::Expenditure,
        "expenditure_by_modality",
        |dataset, _, params| {
            let expenditure = ReportService::expenditure(dataset)?;
            Ok(ReportService::generate_expenditure_by_modality(expenditure, params))
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_defaults_to_configured() {
        let params = ReportQuery::default().params(2025).unwrap();
        assert_eq!(params.years.current, 2025);
        assert_eq!(params.years.previous, 2024);
        assert_eq!(params.unit, UnitFilter::All);
    }

    #[test]
    fn test_year_out_of_range_is_rejected() {
        let query = ReportQuery {
            year: Some(1999),
            ..ReportQuery::default()
        };
        assert!(matches!(query.params(2025), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_variation_mode_accepts_portuguese_names() {
        let annual: VariationQuery = serde_json::from_str(r#"{"mode":"anual"}"#).unwrap();
        assert_eq!(annual.mode, VariationMode::Annual);
        let forecast: VariationQuery = serde_json::from_str(r#"{"mode":"previsao"}"#).unwrap();
        assert_eq!(forecast.mode, VariationMode::ForecastVsRealized);
        assert_eq!(VariationQuery::default().mode, VariationMode::Annual);
    }

    #[test]
    fn test_unit_is_passed_through() {
        let query = ReportQuery {
            unit: Some("SEFAZ".to_string()),
            ..ReportQuery::default()
        };
        assert_eq!(
            query.params(2025).unwrap().unit,
            UnitFilter::Unit("SEFAZ".to_string())
        );
    }
}
