//! Report error types.

use thiserror::Error;

use crate::dataset::DatasetKind;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A report was asked for with the wrong source.
    #[error("Expected a {expected} dataset, got {actual}")]
    DatasetMismatch {
        /// Source the report reads.
        expected: DatasetKind,
        /// Source that was supplied.
        actual: DatasetKind,
    },
}
