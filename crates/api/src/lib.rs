//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for every report
//! - Unit listing and cache administration
//! - JSON error responses

pub mod routes;

use std::sync::Arc;

use axum::Router;
use orcamento_core::cache::SnapshotCache;
use orcamento_core::hierarchy::HierarchyCatalog;
use orcamento_shared::AppConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Snapshot cache for the source spreadsheets.
    pub cache: Arc<dyn SnapshotCache>,
    /// Revenue classification tree.
    pub catalog: Arc<HierarchyCatalog>,
}

impl AppState {
    /// Creates state with the standard revenue tree.
    #[must_use]
    pub fn new(config: AppConfig, cache: Arc<dyn SnapshotCache>) -> Self {
        Self {
            config: Arc::new(config),
            cache,
            catalog: Arc::new(HierarchyCatalog::revenue()),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
