//! Error types for tile-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tile-core
///
/// Unrecognized, ignored and duplicate files are not errors; they are
/// reported as [`crate::ScanEvent`] values.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid JSON for the catalog schema
    #[error("failed to parse catalog '{path}': {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Catalog parsed but its tables are inconsistent
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Requested category suffix is not in the catalog
    #[error("unknown category suffix '{0}'")]
    UnknownCategory(String),

    /// Scan target is missing or not a directory
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Two grids with different dimensions cannot be merged
    #[error("grid dimensions differ: expected {expected:?}, found {found:?}")]
    GridMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
