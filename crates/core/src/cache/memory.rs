//! In-process snapshot cache using Moka.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::{debug, info};

use super::fingerprint::{entry_name, fingerprint};
use super::{CacheInfo, DEFAULT_TTL, SnapshotCache};
use crate::dataset::Dataset;

/// Default cache capacity (number of snapshots).
pub const DEFAULT_CACHE_CAPACITY: u64 = 16;

#[derive(Debug)]
struct Entry {
    snapshot: Arc<Dataset>,
    bytes: u64,
}

/// Snapshot cache held in memory. Entries are lost on restart.
///
/// Thread-safe and cheap to clone; clones share the same storage.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Arc<Entry>>,
}

impl MemoryCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 16 snapshots max, 2 hour TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL)
    }

    /// Creates a cache with custom configuration.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache for MemoryCache {
    fn get(&self, source: &Path, key: &str) -> Option<Arc<Dataset>> {
        let name = entry_name(key, &fingerprint(source));
        let hit = self.cache.get(&name).map(|e| Arc::clone(&e.snapshot));
        debug!(key, hit = hit.is_some(), "Memory cache lookup");
        hit
    }

    fn put(&self, snapshot: &Arc<Dataset>, source: &Path, key: &str) {
        let name = entry_name(key, &fingerprint(source));
        // Size is only used for reporting.
        let bytes = serde_json::to_vec(snapshot.as_ref()).map_or(0, |b| b.len() as u64);
        self.cache.insert(
            name,
            Arc::new(Entry {
                snapshot: Arc::clone(snapshot),
                bytes,
            }),
        );
    }

    fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        info!("Memory cache cleared");
    }

    fn info(&self) -> CacheInfo {
        self.cache.run_pending_tasks();
        self.cache
            .iter()
            .fold(CacheInfo::default(), |acc, (_, entry)| CacheInfo {
                total_files: acc.total_files + 1,
                total_bytes: acc.total_bytes + entry.bytes,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ExpenditureDataset, ExpenditureRecord};
    use std::io::Write;

    fn snapshot() -> Arc<Dataset> {
        Arc::new(Dataset::Expenditure(ExpenditureDataset::new(vec![
            ExpenditureRecord::default(),
        ])))
    }

    #[test]
    fn test_put_then_get() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"workbook").unwrap();
        let cache = MemoryCache::new();

        let stored = snapshot();
        cache.put(&stored, file.path(), "despesa");
        let hit = cache.get(file.path(), "despesa").unwrap();

        assert!(Arc::ptr_eq(&hit, &stored));
    }

    #[test]
    fn test_source_change_misses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"workbook").unwrap();
        let cache = MemoryCache::new();
        cache.put(&snapshot(), file.path(), "despesa");

        file.write_all(b" edited").unwrap();
        file.flush().unwrap();

        assert!(cache.get(file.path(), "despesa").is_none());
    }

    #[test]
    fn test_clear_and_info() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"workbook").unwrap();
        let cache = MemoryCache::new();
        cache.put(&snapshot(), file.path(), "despesa");

        let info = cache.info();
        assert_eq!(info.total_files, 1);
        assert!(info.total_bytes > 0);

        cache.clear();
        assert_eq!(cache.info().total_files, 0);
        assert!(cache.get(file.path(), "despesa").is_none());
    }
}
