//! Cache error types.

use thiserror::Error;

/// Errors reading or writing a cache entry.
///
/// These never reach callers of [`SnapshotCache`](super::SnapshotCache):
/// a failed read is a miss and a failed write is logged.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem failure.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded or decoded.
    #[error("Cache entry is not a valid snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}
