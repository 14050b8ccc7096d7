//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Source spreadsheet locations.
    #[serde(default)]
    pub data: DataConfig,
    /// Snapshot cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Report parameters.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Locations of the source spreadsheets.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Revenue workbook.
    #[serde(default = "default_revenue_path")]
    pub revenue_path: PathBuf,
    /// Expenditure workbook.
    #[serde(default = "default_expenditure_path")]
    pub expenditure_path: PathBuf,
    /// Budget classification workbook (code to name).
    #[serde(default = "default_classification_path")]
    pub classification_path: PathBuf,
}

fn default_revenue_path() -> PathBuf {
    PathBuf::from("dados/RECEITA.xlsx")
}

fn default_expenditure_path() -> PathBuf {
    PathBuf::from("dados/DESPESA.xlsx")
}

fn default_classification_path() -> PathBuf {
    PathBuf::from("dados/CLASSIFICACAO_ORCAMENTARIA.xlsx")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            revenue_path: default_revenue_path(),
            expenditure_path: default_expenditure_path(),
            classification_path: default_classification_path(),
        }
    }
}

/// Which snapshot cache implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Files under `cache.dir`, shared between processes.
    #[default]
    Disk,
    /// In-process cache, lost on restart.
    Memory,
}

/// Snapshot cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding cache entries.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    /// Entry time-to-live in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// Cache implementation.
    #[serde(default)]
    pub backend: CacheBackend,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_cache_ttl() -> u64 {
    7200 // 2 hours
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_secs: default_cache_ttl(),
            backend: CacheBackend::default(),
        }
    }
}

/// Report parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Fiscal year being reported; the comparison year is the one before.
    #[serde(default = "default_current_year")]
    pub current_year: i32,
}

fn default_current_year() -> i32 {
    2025
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            current_year: default_current_year(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ORCAMENTO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
