//! tile-core: Core library for cataloging texture tiles
//!
//! This library provides functionality to:
//! - Load a reference catalog of known tiles, aliases and category suffixes
//! - Resolve on-disk filenames to a (category, tile) cell
//! - Track found files in a dense grid with per-category counts
//! - Scan directories and report duplicate, ignored and unrecognized files
//! - Export the grid as JSON or CSV

pub mod catalog;
pub mod error;
pub mod grid;
pub mod name;
pub mod report;
pub mod resolver;
pub mod scanner;

pub use catalog::{AliasEntry, Catalog, TileEntry};
pub use error::{Error, Result};
pub use grid::{FileGrid, FileRecord, InsertOutcome, MergeSummary};
pub use report::{CategorySummary, GridReport, ReportEntry};
pub use resolver::{AlternateLevel, Resolution, Resolver};
pub use scanner::{
    scan_directory, scan_file, FsImageSource, ImageSource, ScanEvent, ScanOptions, ScanReport,
};
