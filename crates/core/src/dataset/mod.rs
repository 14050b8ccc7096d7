//! Source data: typed records, spreadsheet ingestion and cached loading.
//!
//! The revenue and expenditure spreadsheets are read once into typed
//! records. Missing measure columns read as zero and missing text columns
//! read as empty, so downstream reports can treat absence as "no data".

pub mod error;
pub mod ingest;
pub mod loader;
pub mod types;

pub use error::IngestError;
pub use ingest::{read_classification, read_expenditure, read_revenue};
pub use loader::{load_classification, load_dataset};
pub use types::*;
