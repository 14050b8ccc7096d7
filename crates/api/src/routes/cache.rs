//! Cache administration routes.

use axum::{Json, Router, extract::State, routing::{get, post}};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::AppState;

/// Creates the cache routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cache/info", get(cache_info))
        .route("/cache/clear", post(clear_cache))
}

/// Cache usage.
#[derive(Debug, Serialize)]
pub struct CacheInfoResponse {
    /// Number of entries.
    pub total_files: u64,
    /// Total size in bytes.
    pub total_bytes: u64,
    /// Total size in megabytes.
    pub total_size_mb: Decimal,
}

/// Result of clearing the cache.
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    /// Entries removed.
    pub removed: u64,
}

async fn cache_info(State(state): State<AppState>) -> Json<CacheInfoResponse> {
    let info = state.cache.info();
    Json(CacheInfoResponse {
        total_files: info.total_files,
        total_bytes: info.total_bytes,
        total_size_mb: info.total_megabytes(),
    })
}

async fn clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let removed = state.cache.info().total_files;
    state.cache.clear();
    info!(removed, "Cache cleared via API");
    Json(ClearCacheResponse { removed })
}
