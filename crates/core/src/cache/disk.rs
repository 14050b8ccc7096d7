//! File-backed snapshot cache.
//!
//! Each entry is one JSON file named `{key}_{fingerprint}.json`. Freshness
//! is judged by the entry file's own modification time, so entries survive
//! restarts and can be shared by several processes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

use super::error::CacheError;
use super::fingerprint::{entry_name, fingerprint};
use super::{CacheInfo, DEFAULT_TTL, SnapshotCache};
use crate::dataset::Dataset;

const ENTRY_EXTENSION: &str = "json";

/// Snapshot cache stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
    ttl: Duration,
}

impl DiskCache {
    /// Creates a cache in `dir` with the default 2 hour TTL.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_ttl(dir, DEFAULT_TTL)
    }

    /// Creates a cache in `dir` with a custom TTL.
    #[must_use]
    pub fn with_ttl(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!(error = %e, dir = %dir.display(), "Failed to create cache directory");
        }
        Self { dir, ttl }
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `source` under `key`, given the file as it is
    /// now.
    #[must_use]
    pub fn entry_path(&self, source: &Path, key: &str) -> PathBuf {
        self.dir
            .join(entry_name(key, &fingerprint(source)))
            .with_extension(ENTRY_EXTENSION)
    }

    fn is_fresh(&self, entry: &Path) -> bool {
        let Ok(modified) = fs::metadata(entry).and_then(|m| m.modified()) else {
            return false;
        };
        // An mtime in the future counts as age zero.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        age < self.ttl
    }

    fn entries(&self) -> Vec<PathBuf> {
        let Ok(read_dir) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        read_dir
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == ENTRY_EXTENSION))
            .collect()
    }
}

fn read_entry(path: &Path) -> Result<Dataset, CacheError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_entry(path: &Path, snapshot: &Dataset) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec(snapshot)?;
    fs::write(path, bytes)?;
    Ok(())
}

impl SnapshotCache for DiskCache {
    fn get(&self, source: &Path, key: &str) -> Option<Arc<Dataset>> {
        let path = self.entry_path(source, key);
        if !self.is_fresh(&path) {
            debug!(key, "Cache miss");
            return None;
        }

        match read_entry(&path) {
            Ok(snapshot) => {
                debug!(key, records = snapshot.len(), "Cache hit");
                Some(Arc::new(snapshot))
            }
            Err(e) => {
                warn!(error = %e, entry = %path.display(), "Discarding unreadable cache entry");
                if let Err(e) = fs::remove_file(&path) {
                    warn!(error = %e, entry = %path.display(), "Failed to remove cache entry");
                }
                None
            }
        }
    }

    fn put(&self, snapshot: &Arc<Dataset>, source: &Path, key: &str) {
        let path = self.entry_path(source, key);
        match write_entry(&path, snapshot) {
            Ok(()) => debug!(key, entry = %path.display(), "Cached snapshot"),
            Err(e) => warn!(error = %e, entry = %path.display(), "Failed to write cache entry"),
        }
    }

    fn clear(&self) {
        let mut removed = 0usize;
        for path in self.entries() {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(error = %e, entry = %path.display(), "Failed to remove cache entry"),
            }
        }
        info!(removed, dir = %self.dir.display(), "Cache cleared");
    }

    fn info(&self) -> CacheInfo {
        self.entries()
            .iter()
            .filter_map(|p| fs::metadata(p).ok())
            .fold(CacheInfo::default(), |acc, m| CacheInfo {
                total_files: acc.total_files + 1,
                total_bytes: acc.total_bytes + m.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RevenueDataset, RevenueRecord};
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn snapshot() -> Arc<Dataset> {
        Arc::new(Dataset::Revenue(RevenueDataset::new(vec![RevenueRecord {
            exercise: 2025,
            category: "1".to_string(),
            realized: dec!(1234.56),
            ..RevenueRecord::default()
        }])))
    }

    fn source(dir: &Path) -> PathBuf {
        let path = dir.join("RECEITA.xlsx");
        fs::write(&path, b"workbook").unwrap();
        path
    }

    #[test]
    fn test_put_then_get_returns_equal_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source(tmp.path());
        let cache = DiskCache::new(tmp.path().join("cache"));

        cache.put(&snapshot(), &source, "receita");
        let hit = cache.get(&source, "receita").unwrap();

        assert_eq!(*hit, *snapshot());
    }

    #[test]
    fn test_source_change_misses() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source(tmp.path());
        let cache = DiskCache::new(tmp.path().join("cache"));
        cache.put(&snapshot(), &source, "receita");

        let mut file = fs::OpenOptions::new().append(true).open(&source).unwrap();
        file.write_all(b" edited").unwrap();
        drop(file);

        assert!(cache.get(&source, "receita").is_none());
    }

    #[test]
    fn test_expired_entry_misses() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source(tmp.path());
        let cache = DiskCache::with_ttl(tmp.path().join("cache"), Duration::ZERO);

        cache.put(&snapshot(), &source, "receita");

        assert!(cache.get(&source, "receita").is_none());
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source(tmp.path());
        let cache = DiskCache::new(tmp.path().join("cache"));
        let entry = cache.entry_path(&source, "receita");
        fs::write(&entry, b"{not json").unwrap();

        assert!(cache.get(&source, "receita").is_none());
        assert!(!entry.exists());
    }

    #[test]
    fn test_keys_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source(tmp.path());
        let cache = DiskCache::new(tmp.path().join("cache"));
        cache.put(&snapshot(), &source, "receita");

        assert!(cache.get(&source, "despesa").is_none());
    }

    #[test]
    fn test_clear_and_info() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source(tmp.path());
        let cache = DiskCache::new(tmp.path().join("cache"));
        cache.put(&snapshot(), &source, "receita");
        cache.put(&snapshot(), &source, "despesa");

        let info = cache.info();
        assert_eq!(info.total_files, 2);
        assert!(info.total_bytes > 0);

        cache.clear();
        assert_eq!(cache.info(), CacheInfo::default());
        assert!(cache.get(&source, "receita").is_none());
    }
}
