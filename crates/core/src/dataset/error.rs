//! Ingestion error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a source spreadsheet.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The workbook could not be opened or parsed.
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The workbook has no worksheets.
    #[error("Workbook has no sheets: {}", .0.display())]
    NoSheets(PathBuf),

    /// A column needed to build the result is absent from the header.
    #[error("Missing column {column} in {}", path.display())]
    MissingColumn {
        /// Header text of the missing column.
        column: &'static str,
        /// Source file.
        path: PathBuf,
    },
}
