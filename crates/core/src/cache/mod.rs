//! Snapshot caching for loaded datasets.
//!
//! Reading a large workbook is slow, so parsed snapshots are cached under a
//! logical key plus a fingerprint of the source file. Editing the source
//! changes the fingerprint, which makes the old entry unreachable. Entries
//! also expire after a fixed time-to-live.
//!
//! Cache failures never surface to callers: a corrupt or unreadable entry
//! is a miss, and a failed write only logs a warning.

pub mod disk;
pub mod error;
pub mod fingerprint;
pub mod memory;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::dataset::Dataset;

pub use disk::DiskCache;
pub use error::CacheError;
pub use fingerprint::{entry_name, fingerprint};
pub use memory::{DEFAULT_CACHE_CAPACITY, MemoryCache};

/// Default time-to-live for cache entries (2 hours).
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Storage for parsed dataset snapshots.
pub trait SnapshotCache: Send + Sync {
    /// Returns the snapshot stored for `source` under `key`, if it is fresh
    /// and was taken from the file as it is now.
    fn get(&self, source: &Path, key: &str) -> Option<Arc<Dataset>>;

    /// Stores a snapshot of `source` under `key`.
    fn put(&self, snapshot: &Arc<Dataset>, source: &Path, key: &str);

    /// Removes every entry.
    fn clear(&self);

    /// Entry count and total size.
    fn info(&self) -> CacheInfo;
}

/// Cache usage summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheInfo {
    /// Number of entries.
    pub total_files: u64,
    /// Total size of the entries in bytes.
    pub total_bytes: u64,
}

impl CacheInfo {
    /// Total size in megabytes, rounded to 2 places.
    #[must_use]
    pub fn total_megabytes(&self) -> Decimal {
        (Decimal::from(self.total_bytes) / Decimal::from(1024 * 1024)).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_megabytes() {
        let info = CacheInfo {
            total_files: 2,
            total_bytes: 3 * 1024 * 1024 / 2,
        };
        assert_eq!(info.total_megabytes(), dec!(1.5));
        assert_eq!(CacheInfo::default().total_megabytes(), Decimal::ZERO);
    }
}
