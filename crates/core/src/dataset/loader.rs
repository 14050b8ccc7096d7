//! Cached dataset loading.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::error::IngestError;
use super::ingest::{read_classification, read_expenditure, read_revenue};
use super::types::{Dataset, DatasetKind};
use crate::cache::SnapshotCache;
use crate::names::NameMap;

/// Loads a source through the cache.
///
/// A fresh cache entry for the file as it is now is returned as-is;
/// otherwise the workbook is parsed and the result stored for next time.
pub fn load_dataset(
    cache: &dyn SnapshotCache,
    path: &Path,
    kind: DatasetKind,
) -> Result<Arc<Dataset>, IngestError> {
    let key = kind.cache_key();
    if let Some(snapshot) = cache.get(path, key) {
        return Ok(snapshot);
    }

    let started = Instant::now();
    let dataset = Arc::new(match kind {
        DatasetKind::Revenue => Dataset::Revenue(read_revenue(path)?),
        DatasetKind::Expenditure => Dataset::Expenditure(read_expenditure(path)?),
    });
    info!(
        source = %kind,
        records = dataset.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "Loaded dataset from spreadsheet"
    );

    cache.put(&dataset, path, key);
    Ok(dataset)
}

/// Loads the classification name table, or `None` if it cannot be read.
pub fn load_classification(path: &Path) -> Option<NameMap> {
    match read_classification(path) {
        Ok(map) => Some(map),
        Err(e) => {
            warn!(error = %e, "Classification table unavailable");
            None
        }
    }
}
