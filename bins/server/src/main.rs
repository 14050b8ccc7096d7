//! Budget report server.
//!
//! Main entry point for the report engine HTTP service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orcamento_api::{AppState, create_router};
use orcamento_core::cache::{DEFAULT_CACHE_CAPACITY, DiskCache, MemoryCache, SnapshotCache};
use orcamento_shared::{AppConfig, CacheBackend};

fn build_cache(config: &AppConfig) -> Arc<dyn SnapshotCache> {
    let ttl = Duration::from_secs(config.cache.ttl_secs);
    match config.cache.backend {
        CacheBackend::Disk => {
            info!(dir = %config.cache.dir.display(), ttl_secs = config.cache.ttl_secs, "Using disk cache");
            Arc::new(DiskCache::with_ttl(config.cache.dir.clone(), ttl))
        }
        CacheBackend::Memory => {
            info!(ttl_secs = config.cache.ttl_secs, "Using memory cache");
            Arc::new(MemoryCache::with_config(DEFAULT_CACHE_CAPACITY, ttl))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orcamento=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(
        revenue = %config.data.revenue_path.display(),
        expenditure = %config.data.expenditure_path.display(),
        current_year = config.report.current_year,
        "Configuration loaded"
    );

    // Create application state
    let cache = build_cache(&config);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, cache);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_backend_creates_cache_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.cache.dir = tmp.path().join("cache");

        let cache = build_cache(&config);

        assert!(config.cache.dir.is_dir());
        assert_eq!(cache.info().total_files, 0);
    }

    #[test]
    fn test_memory_backend_starts_empty() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackend::Memory;
        config.cache.dir = std::path::PathBuf::from("/nonexistent/cache");

        let cache = build_cache(&config);

        assert_eq!(cache.info().total_files, 0);
        assert!(!config.cache.dir.exists());
    }
}
