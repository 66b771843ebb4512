//! Directory scanner: feeds image files through the resolver into a grid

use crate::error::{Error, Result};
use crate::grid::{FileGrid, InsertOutcome};
use crate::name::is_image_file;
use crate::resolver::{AlternateLevel, Resolution, Resolver};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Source of candidate image filenames for a directory
pub trait ImageSource {
    /// Filenames (not paths) in `dir` ending in `extension`
    fn image_files(&self, dir: &Path, extension: &str) -> Result<Vec<String>>;

    /// Check whether `dir` exists and is a directory
    fn is_dir(&self, dir: &Path) -> bool;
}

/// [`ImageSource`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn image_files(&self, dir: &Path, extension: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                // the directory itself could not be read
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            // Non UTF-8 names still go through the resolver so they are reported
            let name = entry.file_name().to_string_lossy();
            if is_image_file(&name, extension) {
                names.push(name.into_owned());
            }
        }

        // Directory order is platform dependent
        names.sort();
        Ok(names)
    }

    fn is_dir(&self, dir: &Path) -> bool {
        dir.is_dir()
    }
}

/// Options for a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Log every file tested and include directories in duplicate warnings
    pub verbose: bool,
    /// Matching tier for the resolver
    pub alternate: AlternateLevel,
    /// Warn about files that match nothing
    pub warn_unused: bool,
}

/// What happened to one candidate file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Stored in the grid
    Accepted {
        filename: String,
        category: usize,
        tile: usize,
    },
    /// Known to be unused
    Ignored { filename: String },
    /// Matches neither the catalog nor the ignore list
    Unrecognized { filename: String },
    /// Resolves to a cell that already holds another file
    Duplicate {
        filename: String,
        existing_filename: String,
        existing_path: PathBuf,
        same_directory: bool,
    },
}

/// Result of scanning one directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Directory that was scanned
    pub path: PathBuf,
    /// Number of files newly stored in the grid
    pub accepted: usize,
    /// One event per candidate file, in scan order
    pub events: Vec<ScanEvent>,
}

impl ScanReport {
    /// Number of ignored files
    pub fn ignored(&self) -> usize {
        self.count(|e| matches!(e, ScanEvent::Ignored { .. }))
    }

    /// Number of unrecognized files
    pub fn unrecognized(&self) -> usize {
        self.count(|e| matches!(e, ScanEvent::Unrecognized { .. }))
    }

    /// Number of rejected duplicates
    pub fn duplicates(&self) -> usize {
        self.count(|e| matches!(e, ScanEvent::Duplicate { .. }))
    }

    fn count(&self, pred: impl Fn(&ScanEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

/// Scan a directory and store every usable tile in the grid
pub fn scan_directory<S: ImageSource>(
    grid: &mut FileGrid,
    resolver: &Resolver,
    source: &S,
    path: &Path,
    options: &ScanOptions,
) -> Result<ScanReport> {
    if !source.is_dir(path) {
        return Err(Error::DirectoryNotFound(path.to_path_buf()));
    }

    let extension = &resolver.catalog().image_extension;
    let mut report = ScanReport {
        path: path.to_path_buf(),
        accepted: 0,
        events: Vec::new(),
    };

    for filename in source.image_files(path, extension)? {
        let event = scan_file(grid, resolver, path, &filename, options);
        if matches!(event, ScanEvent::Accepted { .. }) {
            report.accepted += 1;
        }
        report.events.push(event);
    }

    info!(
        path = %path.display(),
        accepted = report.accepted,
        ignored = report.ignored(),
        unrecognized = report.unrecognized(),
        duplicates = report.duplicates(),
        "scanned directory"
    );
    Ok(report)
}

/// Resolve a single file and store it in the grid if it is new
pub fn scan_file(
    grid: &mut FileGrid,
    resolver: &Resolver,
    dir: &Path,
    filename: &str,
    options: &ScanOptions,
) -> ScanEvent {
    if options.verbose {
        debug!(file = filename, "testing file");
    }

    match resolver.resolve(filename, options.alternate) {
        Resolution::Found {
            category,
            index,
            flat_index,
            root_name,
        } => match grid.insert(category, flat_index, &root_name, filename, dir) {
            InsertOutcome::Inserted => ScanEvent::Accepted {
                filename: filename.to_string(),
                category,
                tile: index,
            },
            InsertOutcome::Duplicate {
                existing_filename,
                existing_path,
            } => {
                let same_directory = existing_path == dir;
                if options.verbose {
                    warn!(
                        "duplicate file ignored: '{}' in '{}' is a different name for the same texture '{}' in '{}'",
                        filename,
                        dir.display(),
                        existing_filename,
                        existing_path.display()
                    );
                } else {
                    warn!(
                        "duplicate file ignored: '{}' is a different name for the same texture '{}'",
                        filename, existing_filename
                    );
                }
                ScanEvent::Duplicate {
                    filename: filename.to_string(),
                    existing_filename,
                    existing_path,
                    same_directory,
                }
            }
        },
        Resolution::Ignored { .. } => ScanEvent::Ignored {
            filename: filename.to_string(),
        },
        Resolution::NotFound => {
            if options.warn_unused {
                warn!("the file '{}' is not recognized and so is not used", filename);
            }
            ScanEvent::Unrecognized {
                filename: filename.to_string(),
            }
        }
    }
}
